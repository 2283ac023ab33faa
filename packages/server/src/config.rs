//! Server configuration.

use std::time::Duration;

use thiserror::Error;

use crate::domain::{DEFAULT_OUTBOX_CAPACITY, history::DEFAULT_HISTORY_CAPACITY};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("history capacity must be at least 1")]
    ZeroHistoryCapacity,

    #[error("send timeout must be greater than zero")]
    ZeroSendTimeout,

    #[error("outbox capacity must be at least 1")]
    ZeroOutboxCapacity,
}

/// Runtime configuration of the relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Number of envelopes replayed to a newcomer
    pub history_capacity: usize,
    /// Upper bound for writing one frame to a participant's socket
    pub send_timeout: Duration,
    /// Envelopes that may queue for one participant before it is dropped
    pub outbox_capacity: usize,
}

impl ServerConfig {
    pub fn new(
        host: String,
        port: u16,
        history_capacity: usize,
        send_timeout: Duration,
        outbox_capacity: usize,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            host,
            port,
            history_capacity,
            send_timeout,
            outbox_capacity,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        if self.send_timeout.is_zero() {
            return Err(ConfigError::ZeroSendTimeout);
        }
        if self.outbox_capacity == 0 {
            return Err(ConfigError::ZeroOutboxCapacity);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
        }
    }
}
