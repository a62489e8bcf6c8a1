//! Workspace `.env` file: `DOMAIN` and `TOKEN` for the frp server.
//!
//! Format is one `KEY=VALUE` per line. Blank lines and `#` comments are
//! skipped, values may be wrapped in single or double quotes, unknown keys
//! are ignored.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use frpctl_core::Environment;

use crate::ConfigError;

/// Environment variable consulted when no `.env` exists yet.
pub const DOMAIN_ENV_VAR: &str = "DOMAIN";

/// Domain used when neither `.env` nor `DOMAIN` provide one.
pub const FALLBACK_DOMAIN: &str = "test.mydomain.com";

#[derive(Debug, Clone)]
pub struct EnvStore {
    path: PathBuf,
}

impl EnvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load using the process environment for the `DOMAIN` fallback.
    pub fn load(&self) -> Result<Environment, ConfigError> {
        self.load_with(|key| std::env::var(key).ok())
    }

    /// Load with a caller-supplied variable lookup.
    ///
    /// A missing file is the normal pre-`init` state, not an error.
    pub fn load_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<Environment, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                debug!(path = %self.path.display(), "read env file");
                Ok(parse(&contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let domain = lookup(DOMAIN_ENV_VAR)
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| FALLBACK_DOMAIN.into());
                debug!(%domain, "no env file, using fallback domain");
                Ok(Environment::new(domain, String::new()))
            }
            Err(source) => Err(ConfigError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Rewrite the whole file.
    pub fn save(&self, env: &Environment) -> Result<(), ConfigError> {
        let contents = format!("DOMAIN={}\nTOKEN={}\n", env.domain, env.token());
        std::fs::write(&self.path, contents).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

fn parse(contents: &str) -> Environment {
    let mut domain = String::new();
    let mut token = String::new();

    for line in contents.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = unquote(value.trim());
        match key.trim() {
            "DOMAIN" => value.clone_into(&mut domain),
            "TOKEN" => value.clone_into(&mut token),
            _ => {}
        }
    }

    Environment::new(domain, token)
}

fn unquote(value: &str) -> &str {
    value.trim_matches(|c| c == '"' || c == '\'')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_keys_comments_and_quotes() {
        let env = parse(
            "# frp server\n\
             \n\
             DOMAIN = \"example.com\"\n\
             TOKEN='s3cr=t'\n\
             OTHER=ignored\n\
             garbage line\n",
        );
        assert_eq!(env.domain, "example.com");
        assert_eq!(env.token(), "s3cr=t");
    }

    #[test]
    fn missing_keys_stay_empty() {
        let env = parse("# nothing here\n");
        assert!(!env.has_domain());
        assert_eq!(env.token(), "");
    }

    #[test]
    fn missing_file_uses_domain_variable() {
        let dir = tempfile::tempdir().unwrap();
        let store = EnvStore::new(dir.path().join(".env"));

        let env = store
            .load_with(|key| (key == DOMAIN_ENV_VAR).then(|| "tunnels.example.org".into()))
            .unwrap();

        assert_eq!(env.domain, "tunnels.example.org");
        assert_eq!(env.token(), "");
    }

    #[test]
    fn missing_file_without_variable_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let store = EnvStore::new(dir.path().join(".env"));

        let env = store.load_with(|_| None).unwrap();

        assert_eq!(env.domain, FALLBACK_DOMAIN);
    }

    #[test]
    fn file_wins_over_variable() {
        let dir = tempfile::tempdir().unwrap();
        let store = EnvStore::new(dir.path().join(".env"));
        std::fs::write(store.path(), "DOMAIN=from-file.example\n").unwrap();

        let env = store.load_with(|_| Some("from-var.example".into())).unwrap();

        assert_eq!(env.domain, "from-file.example");
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = EnvStore::new(dir.path().join(".env"));

        store.save(&Environment::new("example.com", "abc")).unwrap();

        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "DOMAIN=example.com\nTOKEN=abc\n"
        );
        let env = store.load_with(|_| None).unwrap();
        assert_eq!(env.domain, "example.com");
        assert_eq!(env.token(), "abc");
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = EnvStore::new(dir.path().join("missing").join(".env"));

        let err = store.save(&Environment::new("example.com", "abc")).unwrap_err();
        assert!(matches!(err, ConfigError::Write { .. }));
    }
}
