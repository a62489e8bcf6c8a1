//! CLI configuration: resolves the workspace from `--workdir` and loads
//! the layered settings for it.

use std::path::{Path, PathBuf};

use frpctl_config::{EnvStore, load_settings};
use frpctl_core::{ProcessController, ToolConfig, TunnelRepository, WorkspaceLayout};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a command handler needs, built once per invocation.
#[derive(Debug, Clone)]
pub struct Context {
    pub layout: WorkspaceLayout,
    pub tool: ToolConfig,
}

impl Context {
    pub fn resolve(global: &GlobalOpts) -> Result<Self, CliError> {
        let root = absolute_workdir(&global.workdir);
        let layout = WorkspaceLayout::new(root);
        let settings = load_settings(&layout)?;
        tracing::debug!(workdir = %layout.root().display(), ?settings, "resolved context");

        Ok(Self {
            tool: settings.to_tool_config(),
            layout,
        })
    }

    pub fn env_store(&self) -> EnvStore {
        EnvStore::new(self.layout.env_file())
    }

    pub fn repository(&self) -> TunnelRepository {
        self.layout.repository()
    }

    pub fn controller(&self) -> ProcessController {
        self.tool.controller(&self.layout)
    }
}

fn absolute_workdir(workdir: &Path) -> PathBuf {
    std::path::absolute(workdir).unwrap_or_else(|_| workdir.to_path_buf())
}
