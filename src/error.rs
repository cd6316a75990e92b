//! Error types for kvline
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for kvline operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Persistence Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Persistence error: {0}")]
    Persistence(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    /// A datagram request longer than the receive buffer; never dispatched
    #[error("Malformed request, exceeds the {limit}-byte request limit")]
    RequestTooLarge { limit: usize },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KvError {
    /// Map an I/O error from a socket read, turning timeouts into `Timeout`
    ///
    /// Unix reports an expired `SO_RCVTIMEO` as `WouldBlock`, Windows as `TimedOut`.
    pub fn from_read(err: std::io::Error, waiting_for: &str) -> Self {
        match err.kind() {
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => {
                KvError::Timeout(waiting_for.to_string())
            }
            _ => KvError::Io(err),
        }
    }

    /// Whether the peer should be told about this error instead of being dropped
    pub fn is_rejected_request(&self) -> bool {
        matches!(self, KvError::RequestTooLarge { .. })
    }

    /// Whether this error is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, KvError::Timeout(_))
    }
}
