// ── Core error types ──
//
// Every failure a command can end in. All of them are terminal for the
// current invocation; the CLI maps them to diagnostics and exit code 1.
// Probe failures never show up here; they are logged and dropped.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── State errors ─────────────────────────────────────────────────
    #[error("Workspace is not initialized: {reason}")]
    NotInitialized { path: PathBuf, reason: String },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Tunnel '{name}' already exists")]
    DuplicateName { name: String },

    #[error("Tunnel '{name}' not found")]
    NotFound { name: String },

    // ── Engine errors ────────────────────────────────────────────────
    #[error("Container engine '{tool}' was not found on PATH")]
    ToolMissing { tool: String },

    #[error("`{action}` exited with {status}")]
    ApplyFailed {
        action: String,
        status: String,
        /// Whatever the engine wrote to stderr.
        diagnostic: String,
    },

    // ── Filesystem errors ────────────────────────────────────────────
    #[error("Failed to write {}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteError {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
