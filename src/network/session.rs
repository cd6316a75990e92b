//! Session
//!
//! Drives one transport through the request/response state machine:
//!
//! ```text
//! Idle → AwaitingRequest → Processing → Responding → AwaitingRequest → …
//!                 │                          │
//!                 └──── fatal failure ───────┴──── STOP ──→ Terminated
//! ```

use std::sync::Arc;

use crate::engine::Engine;
use super::{FailurePolicy, Transport};

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingRequest,
    Processing,
    Responding,
    Terminated,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// A STOP request was handled and the store was saved
    Stopped,

    /// The transport failed under a fatal policy
    TransportFailed,
}

/// One serving loop over one transport
pub struct Session<T: Transport> {
    transport: T,
    engine: Arc<Engine>,
    state: SessionState,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, engine: Arc<Engine>) -> Self {
        Self {
            transport,
            engine,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Serve requests until STOP or a fatal transport failure
    ///
    /// The transport is closed exactly once before returning.
    pub fn run(&mut self) -> SessionEnd {
        let end = self.serve();
        self.transition(SessionState::Terminated);
        self.transport.close();
        tracing::debug!("Session with {} ended: {:?}", self.transport.peer(), end);
        end
    }

    fn serve(&mut self) -> SessionEnd {
        loop {
            self.transition(SessionState::AwaitingRequest);

            let raw = match self.transport.receive() {
                Ok(raw) => raw,
                Err(e) => match self.transport.failure_policy() {
                    FailurePolicy::Fatal => {
                        tracing::warn!("Connection lost with {}: {}", self.transport.peer(), e);
                        return SessionEnd::TransportFailed;
                    }
                    FailurePolicy::Recoverable if e.is_rejected_request() => {
                        tracing::error!("Rejected request from {}: {}", self.transport.peer(), e);
                        self.transition(SessionState::Responding);
                        if let Err(send_err) = self.transport.send(&e.to_string()) {
                            tracing::warn!("Error writing to {}: {}", self.transport.peer(), send_err);
                        }
                        continue;
                    }
                    FailurePolicy::Recoverable => {
                        tracing::warn!("Failed to receive request: {}", e);
                        continue;
                    }
                },
            };

            self.transition(SessionState::Processing);
            tracing::info!("REQ from {}: {}", self.transport.peer(), raw);

            let reply = self.engine.handle_request(&raw);
            if reply.response.success {
                tracing::info!("RES to send: {}", reply.response.message);
            } else {
                tracing::error!("{}", reply.response.message);
            }

            self.transition(SessionState::Responding);
            if let Err(e) = self.transport.send(&reply.response.message) {
                tracing::warn!("Error writing to {}: {}", self.transport.peer(), e);
                if !reply.is_stop() && self.transport.failure_policy() == FailurePolicy::Fatal {
                    return SessionEnd::TransportFailed;
                }
            }

            if reply.is_stop() {
                return SessionEnd::Stopped;
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        tracing::trace!("Session state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
