//! Command-line interface for the scoring API server
//!
//! ```bash
//! scoring-api --port 8080 --log /var/log/scoring-api.log
//! scoring-api --config scoring.toml --log-format json -vv
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{ConfigError, LogFormat, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "scoring-api")]
#[command(about = "Scoring API server - validated JSON RPC over HTTP")]
#[command(version)]
pub struct ServeCli {
    /// Port to listen on
    #[arg(short, long, env = "SCORING_API_PORT")]
    pub port: Option<u16>,

    /// Address to bind to
    #[arg(long, env = "SCORING_API_HOST")]
    pub host: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(short, long, env = "SCORING_API_LOG")]
    pub log: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, env = "SCORING_API_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl ServeCli {
    /// Load the config file, if any, and apply flag overrides on top
    pub fn load_config(&self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(log) = &self.log {
            config.logging.file = Some(log.clone());
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if let Some(level) = verbosity_level(self.verbose) {
            config.logging.level = level.to_string();
        }

        Ok(config)
    }
}

fn verbosity_level(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}
