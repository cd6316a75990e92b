//! Response definitions
//!
//! Represents responses to clients.

use super::Validation;

pub const PUT_OK: &str = "put successful";
pub const DELETE_OK: &str = "delete successful";
pub const GET_MISSING: &str = "Invalid request. Can't get key that doesn't exist.";
pub const DELETE_MISSING: &str = "Invalid request. Can't delete key that doesnt exist.";
pub const PARAMETER_COUNT: &str = "Malformed request, incorrect parameter count";
pub const INVALID_TYPE: &str =
    "Malformed request, invalid request type. Must be GET, PUT, DELETE or STOP only.";

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Text sent over the wire verbatim
    pub message: String,

    /// Local status only; selects error vs info logging
    pub success: bool,
}

impl Response {
    /// Create a successful response
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    /// Create a failed response
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }

    /// Create the response for a request that failed validation
    ///
    /// Shown as ordinary traffic, so `success` is true.
    pub fn malformed(validation: Validation) -> Self {
        match validation {
            Validation::WrongArity => Self::ok(PARAMETER_COUNT),
            Validation::UnknownCommand | Validation::Valid => Self::ok(INVALID_TYPE),
        }
    }
}

/// What the serving loop should do after sending a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Continue,
    Stop,
}

/// Outcome of handling one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub response: Response,
    pub action: SessionAction,
}

impl Reply {
    pub fn proceed(response: Response) -> Self {
        Self {
            response,
            action: SessionAction::Continue,
        }
    }

    pub fn stop(response: Response) -> Self {
        Self {
            response,
            action: SessionAction::Stop,
        }
    }

    pub fn is_stop(&self) -> bool {
        self.action == SessionAction::Stop
    }
}
