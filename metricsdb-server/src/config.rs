use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Configuration for the metricsdb server process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Directory holding the storage workspace
    pub storage_data_path: PathBuf,

    /// Address to bind the front-end HTTP listener to
    pub http_listen_addr: String,

    /// Address to bind the Graphite plaintext listener to
    pub graphite_listen_addr: String,

    /// Maximum accepted request body in bytes
    pub max_request_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            storage_data_path: PathBuf::from("metricsdb-data"),
            http_listen_addr: "0.0.0.0:8428".to_string(),
            graphite_listen_addr: "0.0.0.0:2003".to_string(),
            max_request_size: 32 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = env::var("METRICSDB_STORAGE_DATA_PATH") {
            config.storage_data_path = PathBuf::from(path);
        }

        if let Ok(addr) = env::var("METRICSDB_HTTP_LISTEN_ADDR") {
            config.http_listen_addr = addr;
        }

        if let Ok(addr) = env::var("METRICSDB_GRAPHITE_LISTEN_ADDR") {
            config.graphite_listen_addr = addr;
        }

        if let Ok(size) = env::var("METRICSDB_MAX_REQUEST_SIZE") {
            config.max_request_size = size
                .parse()
                .with_context(|| format!("Invalid METRICSDB_MAX_REQUEST_SIZE '{}'", size))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage_data_path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Storage data path cannot be empty"));
        }

        if self.http_listen_addr.is_empty() {
            return Err(anyhow::anyhow!("HTTP listen address cannot be empty"));
        }

        if self.graphite_listen_addr.is_empty() {
            return Err(anyhow::anyhow!("Graphite listen address cannot be empty"));
        }

        if self.max_request_size == 0 {
            return Err(anyhow::anyhow!("Max request size must be greater than 0"));
        }

        Ok(())
    }
}
