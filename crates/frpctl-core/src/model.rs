// ── frpc client document ──
//
// Mirrors the `frpc.toml` layout the frp client reads: a server section
// followed by an ordered `[[proxies]]` array. Field names follow frp's
// camelCase keys so the file stays readable by frpc itself.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Port frps listens on for client control connections.
pub const DEFAULT_SERVER_PORT: u16 = 7000;

/// Proxy type written for every tunnel.
pub const PROXY_TYPE_HTTP: &str = "http";

/// Local address every tunnel forwards to.
pub const LOCAL_IP: &str = "127.0.0.1";

/// How frpc authenticates against the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    #[default]
    Token,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
    pub token: String,
}

/// A single named tunnel (`[[proxies]]` entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TunnelEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub proxy_type: String,
    #[serde(rename = "localIP")]
    pub local_ip: String,
    /// Stored as given; see `parse_port` for the accepted range.
    pub local_port: i64,
    #[serde(default)]
    pub custom_domains: Vec<String>,
}

impl TunnelEntry {
    /// Public HTTPS URL of the tunnel, taken from its first custom domain.
    pub fn public_url(&self) -> Option<String> {
        self.custom_domains
            .first()
            .map(|domain| format!("https://{domain}"))
    }
}

/// The whole `frpc.toml` document: server connection plus tunnels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDocument {
    pub server_addr: String,
    pub server_port: u16,
    pub auth: AuthConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proxies: Vec<TunnelEntry>,
}

impl ClientDocument {
    /// Fresh document with no tunnels, as written by `init`.
    pub fn new(server_addr: impl Into<String>, server_port: u16, token: impl Into<String>) -> Self {
        Self {
            server_addr: server_addr.into(),
            server_port,
            auth: AuthConfig {
                method: AuthMethod::Token,
                token: token.into(),
            },
            proxies: Vec::new(),
        }
    }

    /// Tunnels in insertion order.
    pub fn entries(&self) -> &[TunnelEntry] {
        &self.proxies
    }

    pub fn find(&self, name: &str) -> Option<&TunnelEntry> {
        self.proxies.iter().find(|p| p.name == name)
    }

    /// Append a tunnel exposed as `<name>.<domain>`.
    ///
    /// Names are compared exactly (case-sensitive). On `DuplicateName` the
    /// document is left untouched.
    pub fn add_entry(&mut self, name: &str, port: i64, domain: &str) -> Result<TunnelEntry, CoreError> {
        if self.find(name).is_some() {
            return Err(CoreError::DuplicateName { name: name.into() });
        }

        let entry = TunnelEntry {
            name: name.into(),
            proxy_type: PROXY_TYPE_HTTP.into(),
            local_ip: LOCAL_IP.into(),
            local_port: port,
            custom_domains: vec![format!("{name}.{domain}")],
        };
        self.proxies.push(entry.clone());
        Ok(entry)
    }

    /// Drop the tunnel called `name`, keeping the others in order.
    pub fn remove_entry(&mut self, name: &str) -> Result<TunnelEntry, CoreError> {
        let index = self
            .proxies
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| CoreError::NotFound { name: name.into() })?;
        Ok(self.proxies.remove(index))
    }
}

/// Parse a local port argument.
///
/// Any integer is accepted; values outside 1-65535 are kept as given and
/// left for the caller to warn about.
pub fn parse_port(raw: &str) -> Result<i64, CoreError> {
    let port: i64 = raw.trim().parse().map_err(|_| CoreError::InvalidArgument {
        field: "port".into(),
        reason: format!("'{raw}' must be a number"),
    })?;
    if !matches!(u16::try_from(port), Ok(p) if p != 0) {
        tracing::debug!(port, "port is outside 1-65535; storing it as given");
    }
    Ok(port)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc() -> ClientDocument {
        ClientDocument::new("example.com", DEFAULT_SERVER_PORT, "abc")
    }

    #[test]
    fn add_entry_derives_hostname_from_domain() {
        let mut doc = doc();
        let entry = doc.add_entry("web", 8080, "example.com").unwrap();

        assert_eq!(entry.custom_domains, vec!["web.example.com".to_string()]);
        assert_eq!(entry.proxy_type, "http");
        assert_eq!(entry.local_ip, "127.0.0.1");
        assert_eq!(doc.entries(), &[entry]);
    }

    #[test]
    fn add_entry_rejects_duplicate_and_keeps_document() {
        let mut doc = doc();
        doc.add_entry("web", 8080, "example.com").unwrap();
        let before = doc.clone();

        let err = doc.add_entry("web", 9090, "example.com").unwrap_err();

        assert!(matches!(err, CoreError::DuplicateName { ref name } if name == "web"));
        assert_eq!(doc, before);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut doc = doc();
        doc.add_entry("web", 8080, "example.com").unwrap();
        doc.add_entry("Web", 8081, "example.com").unwrap();
        assert_eq!(doc.entries().len(), 2);
    }

    #[test]
    fn remove_entry_preserves_order_of_the_rest() {
        let mut doc = doc();
        for (name, port) in [("a", 1), ("b", 2), ("c", 3)] {
            doc.add_entry(name, port, "example.com").unwrap();
        }

        let removed = doc.remove_entry("b").unwrap();

        assert_eq!(removed.name, "b");
        let names: Vec<_> = doc.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn remove_missing_entry_is_not_found() {
        let mut doc = doc();
        doc.add_entry("web", 8080, "example.com").unwrap();
        let before = doc.clone();

        let err = doc.remove_entry("api").unwrap_err();

        assert!(matches!(err, CoreError::NotFound { ref name } if name == "api"));
        assert_eq!(doc, before);
    }

    #[test]
    fn public_url_uses_first_domain() {
        let mut doc = doc();
        let entry = doc.add_entry("web", 8080, "example.com").unwrap();
        assert_eq!(entry.public_url().as_deref(), Some("https://web.example.com"));

        let bare = TunnelEntry {
            custom_domains: Vec::new(),
            ..entry
        };
        assert_eq!(bare.public_url(), None);
    }

    #[test]
    fn parse_port_is_permissive_about_range() {
        assert_eq!(parse_port("8080").unwrap(), 8080);
        assert_eq!(parse_port("70000").unwrap(), 70000);
        assert_eq!(parse_port("-1").unwrap(), -1);
    }

    #[test]
    fn parse_port_rejects_non_numeric() {
        let err = parse_port("http").unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { ref field, .. } if field == "port"));
    }
}
