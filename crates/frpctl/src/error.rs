//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text. Every handled failure exits with code 1.

use miette::Diagnostic;
use thiserror::Error;

use frpctl_config::ConfigError;
use frpctl_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Workspace state ──────────────────────────────────────────────

    #[error("Workspace is not initialized")]
    #[diagnostic(
        code(frpctl::not_initialized),
        help("{reason}\nRun: frpctl init --server <domain> --token <token>")
    )]
    NotInitialized { reason: String },

    // ── Input ────────────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(frpctl::invalid_argument))]
    InvalidArgument { field: String, reason: String },

    #[error("Tunnel '{name}' already exists")]
    #[diagnostic(
        code(frpctl::duplicate_name),
        help("Pick another name, or remove the old one first: frpctl rm {name}")
    )]
    DuplicateName { name: String },

    #[error("Tunnel '{name}' not found")]
    #[diagnostic(
        code(frpctl::not_found),
        help("Run: frpctl ls to see configured tunnels")
    )]
    NotFound { name: String },

    // ── Container engine ─────────────────────────────────────────────

    #[error("Container engine '{tool}' not found")]
    #[diagnostic(
        code(frpctl::tool_missing),
        help(
            "Install Docker and make sure `{tool}` is on your PATH,\n\
             or point FRPCTL_ENGINE at another compose-capable engine."
        )
    )]
    ToolMissing { tool: String },

    #[error("Failed to apply tunnel changes: `{action}` exited with {status}")]
    #[diagnostic(
        code(frpctl::apply_failed),
        help("{diagnostic}\nThe config file was saved; re-run once the engine problem is fixed.")
    )]
    ApplyFailed {
        action: String,
        status: String,
        diagnostic: String,
    },

    // ── Filesystem / configuration ───────────────────────────────────

    #[error("Could not write {path}")]
    #[diagnostic(code(frpctl::write_error), help("Check permissions and free space in the workspace directory."))]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read {path}")]
    #[diagnostic(code(frpctl::read_error))]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(frpctl::config), help("Check frpctl.toml in the workspace and FRPCTL_* variables."))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Prompt for {field} failed: {reason}")]
    #[diagnostic(
        code(frpctl::prompt),
        help("Pass the value as a flag when running without a terminal.")
    )]
    Prompt { field: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        exit_code::GENERAL
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotInitialized { reason, .. } => CliError::NotInitialized { reason },
            CoreError::InvalidArgument { field, reason } => CliError::InvalidArgument { field, reason },
            CoreError::DuplicateName { name } => CliError::DuplicateName { name },
            CoreError::NotFound { name } => CliError::NotFound { name },
            CoreError::ToolMissing { tool } => CliError::ToolMissing { tool },
            CoreError::ApplyFailed {
                action,
                status,
                diagnostic,
            } => CliError::ApplyFailed {
                action,
                status,
                diagnostic,
            },
            CoreError::WriteError { path, source } => CliError::WriteError {
                path: path.display().to_string(),
                source,
            },
            CoreError::Io { path, source } => CliError::ReadError {
                path: path.display().to_string(),
                source,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Figment(inner) => CliError::Config(inner),
            ConfigError::Io { path, source } => CliError::ReadError {
                path: path.display().to_string(),
                source,
            },
            ConfigError::Write { path, source } => CliError::WriteError {
                path: path.display().to_string(),
                source,
            },
        }
    }
}
