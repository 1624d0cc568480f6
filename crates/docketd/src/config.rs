//! Configuration for docketd.
//!
//! Loads settings from /etc/docket/config.toml or falls back to
//! defaults.

use docket_common::DEFAULT_DB_PATH;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/docket/config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_bind_addr() -> String {
    // Localhost only; TLS termination is someone else's job.
    "127.0.0.1:7810".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model used for both summarization and priority prediction.
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds; summaries over long case texts can
    /// take a while.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// How long the model stays loaded after a request.
    #[serde(default = "default_keep_alive")]
    pub keep_alive: String,
}

fn default_model() -> String {
    "qwen2.5:7b-instruct".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_keep_alive() -> String {
    "5m".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            timeout_secs: default_timeout(),
            keep_alive: default_keep_alive(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocketConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl DocketConfig {
    /// Load config from the standard path, defaulting on any problem.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {:?}: {} - using defaults", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config at {:?}, using defaults", path);
                Self::default()
            }
        }
    }
}
