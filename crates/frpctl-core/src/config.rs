// ── Runtime configuration ──
//
// Values a command needs from outside the tunnel document. The config
// crate builds these from `.env`, settings, and flags; core never reads
// those sources itself.

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::compose::ComposeDescriptor;
use crate::engine::{DEFAULT_ENGINE, ProcessController};
use crate::model::DEFAULT_SERVER_PORT;
use crate::probe::{HTTPS_PROBE_TIMEOUT, PORT_PROBE_TIMEOUT};
use crate::repository::TunnelRepository;

/// Server domain and token as recorded in the workspace `.env`.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Public domain of the frp server; tunnels live at `<name>.<domain>`.
    pub domain: String,
    pub token: SecretString,
}

impl Environment {
    pub fn new(domain: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            token: SecretString::from(token.into()),
        }
    }

    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    pub fn has_domain(&self) -> bool {
        !self.domain.trim().is_empty()
    }
}

/// Files that make up a client workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn env_file(&self) -> PathBuf {
        self.root.join(".env")
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("frpc.toml")
    }

    pub fn compose_file(&self) -> PathBuf {
        self.root.join("docker-compose.yaml")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn repository(&self) -> TunnelRepository {
        TunnelRepository::new(self.config_file())
    }
}

/// Tunables for the engine, the descriptor, and the probes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub engine: String,
    pub descriptor: ComposeDescriptor,
    pub server_port: u16,
    /// Run the port and certificate probes at all.
    pub probes: bool,
    pub port_probe_timeout: Duration,
    pub https_probe_timeout: Duration,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            engine: DEFAULT_ENGINE.into(),
            descriptor: ComposeDescriptor::default(),
            server_port: DEFAULT_SERVER_PORT,
            probes: true,
            port_probe_timeout: PORT_PROBE_TIMEOUT,
            https_probe_timeout: HTTPS_PROBE_TIMEOUT,
        }
    }
}

impl ToolConfig {
    pub fn controller(&self, layout: &WorkspaceLayout) -> ProcessController {
        ProcessController::new(&self.engine, &self.descriptor.service, layout.root())
    }
}
