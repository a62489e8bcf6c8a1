// ── Tunnel config repository ──
//
// Loads and stores the `frpc.toml` document. Every command reads a fresh
// copy and writes the whole file back; nothing is cached between runs and
// nothing guards against two invocations writing at once.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CoreError;
use crate::model::ClientDocument;

/// File-backed store for the client document.
#[derive(Debug, Clone)]
pub struct TunnelRepository {
    path: PathBuf,
}

impl TunnelRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read and parse the document.
    ///
    /// A missing or unparsable file means `init` has not been run (or its
    /// output was mangled), so both surface as `NotInitialized`.
    pub fn load(&self) -> Result<ClientDocument, CoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CoreError::NotInitialized {
                    path: self.path.clone(),
                    reason: format!("{} does not exist", self.path.display()),
                });
            }
            Err(e) => return Err(CoreError::read(&self.path, e)),
        };

        let doc: ClientDocument =
            toml::from_str(&raw).map_err(|e| CoreError::NotInitialized {
                path: self.path.clone(),
                reason: format!("{} is not a valid frpc config: {}", self.path.display(), e.message()),
            })?;

        debug!(path = %self.path.display(), tunnels = doc.proxies.len(), "loaded client document");
        Ok(doc)
    }

    /// Serialize and overwrite the document.
    pub fn save(&self, doc: &ClientDocument) -> Result<(), CoreError> {
        let rendered = toml::to_string_pretty(doc).map_err(|e| {
            CoreError::write(&self.path, std::io::Error::new(ErrorKind::InvalidData, e))
        })?;
        std::fs::write(&self.path, rendered).map_err(|e| CoreError::write(&self.path, e))?;

        debug!(path = %self.path.display(), tunnels = doc.proxies.len(), "saved client document");
        Ok(())
    }
}
