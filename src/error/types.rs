//! Error types
//!
//! Startup errors that are fatal to the whole process. Per-connection I/O
//! faults are `std::io::Error` values contained inside their own session
//! handler and never surface here.

use std::fmt;
use std::io;

/// Relay server startup errors
#[derive(Debug)]
pub enum RelayError {
    Config(config::ConfigError),
    Bind { addr: String, source: io::Error },
    Io(io::Error),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Config(e) => write!(f, "Configuration error: {}", e),
            RelayError::Bind { addr, source } => {
                write!(f, "Failed to bind to {}: {}", addr, source)
            }
            RelayError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for RelayError {}

impl From<config::ConfigError> for RelayError {
    fn from(error: config::ConfigError) -> Self {
        RelayError::Config(error)
    }
}

impl From<io::Error> for RelayError {
    fn from(error: io::Error) -> Self {
        RelayError::Io(error)
    }
}
