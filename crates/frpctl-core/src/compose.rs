//! `docker-compose.yaml` descriptor for the frpc container.
//!
//! The file is regenerated from scratch by every `init`; hand edits do not
//! survive.

use std::path::Path;

use crate::error::CoreError;

pub const DEFAULT_SERVICE: &str = "frpc";
pub const DEFAULT_IMAGE: &str = "snowdreamtech/frpc:latest";

/// Service definition that mounts `frpc.toml` and `logs/` into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeDescriptor {
    pub service: String,
    pub image: String,
}

impl Default for ComposeDescriptor {
    fn default() -> Self {
        Self {
            service: DEFAULT_SERVICE.into(),
            image: DEFAULT_IMAGE.into(),
        }
    }
}

impl ComposeDescriptor {
    pub fn render(&self) -> String {
        let Self { service, image } = self;
        format!(
            "services:
  {service}:
    image: {image}
    container_name: {service}
    restart: always
    network_mode: \"host\"
    volumes:
      - ./frpc.toml:/etc/frp/frpc.toml
      - ./logs:/var/log/frp
"
        )
    }

    pub fn write(&self, path: &Path) -> Result<(), CoreError> {
        std::fs::write(path, self.render()).map_err(|e| CoreError::write(path, e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_descriptor_matches_frpc_layout() {
        let expected = "services:
  frpc:
    image: snowdreamtech/frpc:latest
    container_name: frpc
    restart: always
    network_mode: \"host\"
    volumes:
      - ./frpc.toml:/etc/frp/frpc.toml
      - ./logs:/var/log/frp
";
        assert_eq!(ComposeDescriptor::default().render(), expected);
    }

    #[test]
    fn write_overwrites_previous_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docker-compose.yaml");
        std::fs::write(&path, "services: {}\n").unwrap();

        ComposeDescriptor::default().write(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, ComposeDescriptor::default().render());
    }
}
