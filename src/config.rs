//! Startup configuration, read once from a TOML file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "instance/config.toml";
pub const CONFIG_PATH_VAR: &str = "CORREIO_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Unix socket tried before falling back to `host:port`.
    #[serde(default)]
    pub socket: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Shown in the footer of every page.
    pub responsavel: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// One store file per collection lives here.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Served under `/static/img`.
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("instance/store")
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("instance/img")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            images_dir: default_images_dir(),
        }
    }
}

impl Config {
    /// Path from `CORREIO_CONFIG` (environment or `.env`), else the default.
    pub fn path() -> PathBuf {
        dotenv::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Fails when the file is absent or malformed.
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("config file {} does not exist", path.display()))?;

        Self::parse(&content).with_context(|| format!("config file {} is malformed", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Config> {
        Ok(toml::from_str(content)?)
    }
}

impl StorageConfig {
    pub fn ensure_dirs(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("could not create {}", self.data_dir.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[server]
socket = "instance/correio.sock"
host = "0.0.0.0"
port = 8080
log_level = "debug"
responsavel = "Fábrica do Futuro"

[storage]
data_dir = "/var/lib/correio"
"#;

    #[test]
    fn parses_server_and_storage() {
        let config = Config::parse(FULL).unwrap();

        assert_eq!(config.server.socket, Some(PathBuf::from("instance/correio.sock")));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.responsavel, "Fábrica do Futuro");
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/correio"));
        assert_eq!(config.storage.images_dir, PathBuf::from("instance/img"));
    }

    #[test]
    fn storage_and_socket_are_optional() {
        let config = Config::parse(
            r#"
[server]
host = "127.0.0.1"
port = 8000
log_level = "info"
responsavel = "Responsável"
"#,
        )
        .unwrap();

        assert!(config.server.socket.is_none());
        assert_eq!(config.storage.data_dir, PathBuf::from("instance/store"));
    }

    #[test]
    fn missing_key_is_malformed() {
        let err = Config::parse("[server]\nhost = \"127.0.0.1\"\n").unwrap_err();
        assert!(err.to_string().contains("port"), "{err}");
    }

    #[test]
    fn missing_file_is_refused() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Config::load(&tmp.path().join("config.toml")).unwrap_err();
        assert!(err.to_string().contains("does not exist"), "{err}");
    }
}
