use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Host (and port) used in returned bin URIs. Defaults to
    /// `localhost:<bind port>`.
    pub public_host: Option<String>,
    pub protocol: String,
    pub max_body_bytes: usize,
    pub storage: StorageConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            public_host: None,
            protocol: "https".into(),
            max_body_bytes: 1024 * 1024,
            storage: StorageConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn to_toml(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn public_host(&self) -> String {
        self.public_host
            .clone()
            .unwrap_or_else(|| format!("localhost:{}", self.bind_addr.port()))
    }

    /// Prefix of every bin URI, e.g. `https://localhost:8080`.
    pub fn base_uri(&self) -> String {
        format!("{}://{}", self.protocol, self.public_host())
    }
}

/// Which [`BinStore`](ourjson_store::BinStore) backs the server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    #[default]
    Memory,
    Directory {
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(c.protocol, "https");
        assert_eq!(c.max_body_bytes, 1024 * 1024);
        assert_eq!(c.storage, StorageConfig::Memory);
        assert_eq!(c.base_uri(), "https://localhost:8080");
    }

    #[test]
    fn public_host_overrides_bind_port() {
        let c = ServerConfig {
            public_host: Some("api.ourjson.dev".into()),
            ..ServerConfig::default()
        };
        assert_eq!(c.base_uri(), "https://api.ourjson.dev");
    }

    #[test]
    fn parse_partial_toml() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "0.0.0.0:9000"
            protocol = "http"

            [storage]
            backend = "directory"
            path = "/var/lib/ourjson"
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 9000);
        assert_eq!(c.base_uri(), "http://localhost:9000");
        assert_eq!(
            c.storage,
            StorageConfig::Directory {
                path: PathBuf::from("/var/lib/ourjson")
            }
        );
        assert_eq!(c.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = ServerConfig::from_toml_str("[storage]\nbackend = \"mongo\"\n").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let c = ServerConfig {
            storage: StorageConfig::Directory { path: "data".into() },
            ..ServerConfig::default()
        };
        let text = c.to_toml().unwrap();
        let back = ServerConfig::from_toml_str(&text).unwrap();
        assert_eq!(back.storage, c.storage);
        assert_eq!(back.bind_addr, c.bind_addr);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ourjson.toml");
        std::fs::write(&path, "protocol = \"http\"\n").unwrap();
        let c = ServerConfig::load(&path).unwrap();
        assert_eq!(c.protocol, "http");
        assert!(matches!(
            ServerConfig::load(&dir.path().join("missing.toml")),
            Err(ServerError::Io(_))
        ));
    }
}
