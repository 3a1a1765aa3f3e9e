//! CLI command implementations
//!
//! Both commands load the JSON configuration file first, then act on the
//! ledger store. `start` is the only long-running command; it owns the
//! tokio runtime.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::Logger;
use crate::store::LedgerStore;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory holding the snapshot file (required)
    pub data_dir: String,

    /// Host to bind the HTTP server to (default "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP port (default 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (default: empty, which allows any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }
        if self.port == 0 {
            return Err(CliError::config_error("port must be non-zero"));
        }
        Ok(())
    }

    /// Path of the durable snapshot file
    pub fn snapshot_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("envelopes.json")
    }

    /// HTTP server settings derived from this config
    pub fn http_config(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
        }
    }
}

/// Parse arguments and dispatch to the selected command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Command::Init { config } => init(&config),
        Command::Start { config, port } => start(&config, port),
    }
}

/// Seed a fresh data file. Fails if one already exists.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let snapshot_path = config.snapshot_path();

    if snapshot_path.exists() {
        return Err(CliError::already_initialized(&snapshot_path));
    }

    LedgerStore::initialize(&snapshot_path)
        .map_err(|e| CliError::boot_failed(format!("Failed to seed data file: {}", e)))?;

    let path_str = snapshot_path.display().to_string();
    Logger::info("init_complete", &[("path", path_str.as_str())]);

    Ok(())
}

/// Boot the store and serve the HTTP API until terminated.
pub fn start(config_path: &Path, port_override: Option<u16>) -> CliResult<()> {
    let config = Config::load(config_path)?;

    let store = LedgerStore::initialize(&config.snapshot_path())
        .map_err(|e| CliError::boot_failed(format!("Failed to open ledger store: {}", e)))?;

    let mut http_config = config.http_config();
    if let Some(port) = port_override {
        http_config.port = port;
    }

    let server = HttpServer::with_config(Arc::new(store), http_config);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("budgetd.json");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_config_defaults() {
        let config: Config = serde_json::from_str(r#"{"data_dir": "./data"}"#).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_config_rejects_empty_data_dir() {
        let config: Config = serde_json::from_str(r#"{"data_dir": "  "}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_port_zero() {
        let config: Config =
            serde_json::from_str(r#"{"data_dir": "./data", "port": 0}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_snapshot_path_is_under_data_dir() {
        let config: Config = serde_json::from_str(r#"{"data_dir": "/var/budgetd"}"#).unwrap();
        assert_eq!(
            config.snapshot_path(),
            Path::new("/var/budgetd/envelopes.json")
        );
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "not json at all");
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_init_seeds_then_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("data");
        let config_json = format!(r#"{{"data_dir": "{}"}}"#, data_dir.display());
        let path = write_config(&dir, &config_json);

        init(&path).unwrap();
        assert!(data_dir.join("envelopes.json").exists());

        let second = init(&path);
        assert!(second.is_err());
    }
}
