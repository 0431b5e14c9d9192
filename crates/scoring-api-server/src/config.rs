//! Server configuration
//!
//! Loaded from an optional TOML file, then overridden by command-line flags
//! and environment variables (see [`crate::cli`]).
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 8080
//!
//! [logging]
//! format = "json"
//! file = "/var/log/scoring-api.log"
//!
//! [auth]
//! salt = "Otus"
//! admin_salt = "42"
//!
//! [interests]
//! "1" = ["cars", "pets"]
//! ```

use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use scoring_api_core::{AuthSecrets, MemoryStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or applying configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request bodies above this many bytes are rejected
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthSecrets,
    /// Seed interests for the in-memory store, keyed by client id
    #[serde(default)]
    pub interests: BTreeMap<String, Vec<String>>,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_size() -> usize {
    1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_size: default_max_body_size(),
            logging: LoggingConfig::default(),
            auth: AuthSecrets::default(),
            interests: BTreeMap::new(),
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("host '{}' is not an IP address", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Build the in-memory scoring store from the `[interests]` table
    pub fn build_store(&self) -> Result<MemoryStore, ConfigError> {
        self.interests
            .iter()
            .try_fold(MemoryStore::new(), |store, (key, interests)| {
                let client_id: u64 = key.parse().map_err(|_| {
                    ConfigError::Invalid(format!("interest key '{}' is not a client id", key))
                })?;
                Ok(store.with_interests(client_id, interests.iter().cloned()))
            })
    }
}
