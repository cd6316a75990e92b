//! Transport abstraction
//!
//! The capability a session needs from the wire: receive one request, send
//! one response, release resources.

use crate::error::Result;

/// What a session does when the transport fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The peer is assumed gone; the session terminates
    Fatal,

    /// Log and keep serving
    Recoverable,
}

/// A request/response channel to one or more peers
pub trait Transport {
    /// Block until one request arrives and return its trimmed text
    fn receive(&mut self) -> Result<String>;

    /// Send one response as a single message to the current peer
    fn send(&mut self, message: &str) -> Result<()>;

    /// Release the underlying resources. Calling it again is a no-op.
    fn close(&mut self);

    /// How failures from `receive` and `send` are treated
    fn failure_policy(&self) -> FailurePolicy;

    /// Current peer, for logging
    fn peer(&self) -> String;
}
