//! Configuration loading.
//!
//! Loaded from a TOML file (`config.toml` by default). Every field has a
//! default, so an empty file is a valid configuration.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Network identity.
    #[serde(default)]
    pub server: ServerConfig,
    /// Heartbeat liveness timings.
    #[serde(default)]
    pub heartbeat: HeartbeatConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the TCP listener binds to.
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

/// Heartbeat timings.
///
/// After `ping_interval_secs` of each cycle the server sends a PING probe;
/// if no PONG arrives within `pong_grace_secs` the connection is force
/// closed with ordinary disconnect cleanup.
#[derive(Debug, Clone, Deserialize)]
pub struct HeartbeatConfig {
    /// Idle delay before each liveness probe.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_secs: u64,
    /// Grace window after a probe in which a PONG must arrive.
    #[serde(default = "default_pong_grace")]
    pub pong_grace_secs: u64,
}

impl HeartbeatConfig {
    /// The probe delay as a [`Duration`].
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    /// The grace window as a [`Duration`].
    pub fn pong_grace(&self) -> Duration {
        Duration::from_secs(self.pong_grace_secs)
    }
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            ping_interval_secs: default_ping_interval(),
            pong_grace_secs: default_pong_grace(),
        }
    }
}

fn default_listen() -> SocketAddr {
    // Parse of a literal cannot fail.
    "127.0.0.1:6667".parse().unwrap_or_else(|_| unreachable!())
}

fn default_ping_interval() -> u64 {
    10
}

fn default_pong_grace() -> u64 {
    1
}
