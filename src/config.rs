// src/config.rs

//! Manages server configuration: loading, resolving external values, and validation.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Connection settings for the employee CRUD collaborator that shares this
/// process and listener. The realtime core never reads the document store
/// itself; the connection string is resolved here so deployment wiring stays
/// in one place.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CollaboratorConfig {
    /// Document store connection string. The `TASKWIRE_COLLABORATOR_URI`
    /// environment variable takes precedence over this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
}

/// The top-level server configuration, loaded from a TOML file.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// The HTTP path at which WebSocket upgrade requests are accepted.
    #[serde(default = "default_socket_path")]
    pub socket_path: String,
    /// Closes a session after this much time without an inbound frame.
    /// When unset, a silent peer holds its session open indefinitely.
    #[serde(default, with = "humantime_serde")]
    pub idle_timeout: Option<Duration>,
    #[serde(default)]
    pub collaborator: CollaboratorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            socket_path: default_socket_path(),
            idle_timeout: None,
            collaborator: CollaboratorConfig::default(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    9090
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_socket_path() -> String {
    "/api/socket/ws".to_string()
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from '{path}'"))?;

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Resolves values that deployment provisions through the environment.
    fn apply_env_overrides(&mut self) {
        if let Ok(uri) = std::env::var("TASKWIRE_COLLABORATOR_URI")
            && !uri.is_empty()
        {
            self.collaborator.connection_string = Some(uri);
        }
    }

    /// Validates the resolved configuration to ensure logical consistency.
    fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(anyhow!("'host' must not be empty"));
        }
        if !self.socket_path.starts_with('/') {
            return Err(anyhow!(
                "'socket_path' must start with '/': got '{}'",
                self.socket_path
            ));
        }
        if self.idle_timeout == Some(Duration::ZERO) {
            return Err(anyhow!("'idle_timeout' must be greater than zero when set"));
        }
        Ok(())
    }
}
