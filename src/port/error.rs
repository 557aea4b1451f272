//! Port-specific error types.
//!
//! Every failure the serial layer can report is one of these variants, so
//! callers can tell a busy port from rejected parameters from a broken link.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during serial port operations.
#[derive(Debug, Error)]
pub enum PortError {
    /// The specified serial port was not found on the system.
    #[error("Serial port not found: {0}")]
    NotFound(String),

    /// The port could not be acquired before the open timeout elapsed.
    #[error("Serial port {port} is busy or did not open within {waited:?}")]
    BusyOrTimeout { port: String, waited: Duration },

    /// The platform rejected the requested connection parameters.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A hard I/O error occurred on an open stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel was closed before the operation was attempted.
    #[error("Serial channel is closed")]
    Closed,
}

impl PortError {
    /// Create a NotFound error from a port name.
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    /// Create a Config error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a BusyOrTimeout error for a port after waiting `waited`.
    pub fn busy(port_name: impl Into<String>, waited: Duration) -> Self {
        Self::BusyOrTimeout {
            port: port_name.into(),
            waited,
        }
    }

    /// Whether this error only means "no data right now".
    ///
    /// The poll loop swallows these instead of surfacing them.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }
}
