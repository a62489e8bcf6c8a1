//! Configuration sources for `frpctl`.
//!
//! The workspace `.env` store ([`EnvStore`]) plus layered tool settings:
//! built-in defaults, then `<workdir>/frpctl.toml`, then `FRPCTL_*`
//! environment variables. Everything resolves into the plain structs
//! `frpctl_core` consumes.

pub mod env_file;

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use frpctl_core::compose::{DEFAULT_IMAGE, DEFAULT_SERVICE};
use frpctl_core::engine::DEFAULT_ENGINE;
use frpctl_core::model::DEFAULT_SERVER_PORT;
use frpctl_core::{ComposeDescriptor, ToolConfig, WorkspaceLayout};

pub use env_file::{DOMAIN_ENV_VAR, EnvStore, FALLBACK_DOMAIN};

/// Prefix for settings overrides in the process environment.
pub const ENV_PREFIX: &str = "FRPCTL_";

/// Name of the optional settings file inside the workspace.
pub const SETTINGS_FILE: &str = "frpctl.toml";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Tool settings, overridable per workspace or per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Container engine executable (name on PATH or a path).
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Compose service (and container) name.
    #[serde(default = "default_service")]
    pub service: String,

    /// frpc image written into the compose descriptor.
    #[serde(default = "default_image")]
    pub image: String,

    /// frps control port written by `init`.
    #[serde(default = "default_server_port")]
    pub server_port: u16,

    /// Run the local port and certificate probes on `add`.
    #[serde(default = "default_probes")]
    pub probes: bool,

    #[serde(default = "default_port_probe_timeout_ms")]
    pub port_probe_timeout_ms: u64,

    #[serde(default = "default_https_probe_timeout_secs")]
    pub https_probe_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            service: default_service(),
            image: default_image(),
            server_port: default_server_port(),
            probes: default_probes(),
            port_probe_timeout_ms: default_port_probe_timeout_ms(),
            https_probe_timeout_secs: default_https_probe_timeout_secs(),
        }
    }
}

fn default_engine() -> String {
    DEFAULT_ENGINE.into()
}
fn default_service() -> String {
    DEFAULT_SERVICE.into()
}
fn default_image() -> String {
    DEFAULT_IMAGE.into()
}
fn default_server_port() -> u16 {
    DEFAULT_SERVER_PORT
}
fn default_probes() -> bool {
    true
}
fn default_port_probe_timeout_ms() -> u64 {
    1000
}
fn default_https_probe_timeout_secs() -> u64 {
    3
}

impl Settings {
    pub fn to_tool_config(&self) -> ToolConfig {
        ToolConfig {
            engine: self.engine.clone(),
            descriptor: ComposeDescriptor {
                service: self.service.clone(),
                image: self.image.clone(),
            },
            server_port: self.server_port,
            probes: self.probes,
            port_probe_timeout: Duration::from_millis(self.port_probe_timeout_ms),
            https_probe_timeout: Duration::from_secs(self.https_probe_timeout_secs),
        }
    }
}

// ── Loading ─────────────────────────────────────────────────────────

pub fn settings_path(layout: &WorkspaceLayout) -> PathBuf {
    layout.root().join(SETTINGS_FILE)
}

/// Merge defaults, the workspace settings file, and `FRPCTL_*` variables.
pub fn load_settings(layout: &WorkspaceLayout) -> Result<Settings, ConfigError> {
    let path = settings_path(layout);
    tracing::debug!(path = %path.display(), "loading settings");

    let settings = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()?;
    Ok(settings)
}
