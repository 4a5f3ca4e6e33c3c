//! Configuration management for the chat relay
//!
//! Loads settings from an optional `config.toml` with `RELAY_`-prefixed
//! environment overrides on top of compiled-in defaults, so the server
//! runs with no file present at all.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Port the original chat server listened on.
pub const DEFAULT_PORT: u16 = 9001;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
const DEFAULT_OUTBOUND_QUEUE_DEPTH: usize = 64;

/// Relay server configuration, loaded once at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    /// IP address to bind the listening socket
    pub bind_address: String,

    /// TCP port to bind; 0 asks the OS for an ephemeral port
    pub port: u16,

    /// Capacity of each client's outbound line queue. A recipient that
    /// falls this far behind starts losing relayed lines instead of
    /// stalling the broadcaster.
    pub outbound_queue_depth: usize,

    /// Seconds a client may stay silent before its session is closed.
    /// 0 disables the timeout, which matches the original behavior where
    /// an idle client occupies its connection indefinitely.
    pub idle_timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            outbound_queue_depth: DEFAULT_OUTBOUND_QUEUE_DEPTH,
            idle_timeout_secs: 0,
        }
    }
}

impl RelayConfig {
    /// Load configuration from config.toml (if present) with environment
    /// overrides, e.g. `RELAY_PORT=9002`.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = RelayConfig::default();

        let settings = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("port", defaults.port as i64)?
            .set_default(
                "outbound_queue_depth",
                defaults.outbound_queue_depth as i64,
            )?
            .set_default("idle_timeout_secs", defaults.idle_timeout_secs as i64)?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("RELAY"))
            .build()?;

        let config: RelayConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Get bind address and port as a socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Idle read timeout, or `None` when disabled
    pub fn idle_timeout(&self) -> Option<Duration> {
        if self.idle_timeout_secs > 0 {
            Some(Duration::from_secs(self.idle_timeout_secs))
        } else {
            None
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.is_empty() {
            return Err(ConfigError::Message("bind_address cannot be empty".into()));
        }

        if self.outbound_queue_depth == 0 {
            return Err(ConfigError::Message(
                "outbound_queue_depth must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}
