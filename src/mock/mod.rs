//! In-process simulated backend
//!
//! A [`MockRouter`] answers logical operations with the same envelopes the
//! live backend would produce, backed by mutable fixture data in
//! [`state::MockData`].

pub mod handlers;
pub mod params;
pub mod router;
pub mod state;
pub mod token;

use serde::Serialize;
use serde_json::Value;

use crate::api::{codes, Envelope};

pub use router::{MockContext, MockRouter, Predicate};
pub use state::{MockData, MockState};

/// Why a mock handler refused a request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockError {
    /// Rejected input, reported with a business status code
    #[error("{message} ({code})")]
    Validation { code: i64, message: String },

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Authenticated, but acting on someone else's record
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MockError {
    pub fn validation(code: i64, message: impl Into<String>) -> Self {
        MockError::Validation {
            code,
            message: message.into(),
        }
    }

    pub fn into_envelope(self) -> Envelope {
        match self {
            MockError::Validation { code, message } => Envelope::failure(code, message),
            MockError::Unauthenticated(message) => Envelope::failure(codes::AUTH_REQUIRED, message),
            MockError::Forbidden(message) => Envelope::failure(codes::FORBIDDEN, message),
            MockError::Internal(message) => Envelope::failure(codes::SERVER_ERROR, message),
        }
    }
}

impl From<bcrypt::BcryptError> for MockError {
    fn from(err: bcrypt::BcryptError) -> Self {
        MockError::Internal(format!("Password hashing failed: {}", err))
    }
}

pub type HandlerResult = Result<Value, MockError>;

/// Serialize a fixture record into a payload
pub fn to_payload<T: Serialize>(value: &T) -> HandlerResult {
    serde_json::to_value(value).map_err(|e| MockError::Internal(e.to_string()))
}
