//! Wire envelope and its classification into the normalized contract

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::result::{ApiError, ApiResult, ErrorKind};

/// Fixed status codes carried in [`Envelope::status_code`]
pub mod codes {
    pub const SUCCESS: i64 = 0;
    pub const AUTH_REQUIRED: i64 = 401;
    pub const FORBIDDEN: i64 = 403;
    pub const SERVER_ERROR: i64 = 500;
}

/// Message returned for every 500, whatever the server said
pub const GENERIC_SERVER_MESSAGE: &str = "System error, please try again later";
const DEFAULT_AUTH_MESSAGE: &str = "Please log in first";
const DEFAULT_FORBIDDEN_MESSAGE: &str = "Permission denied";
const DEFAULT_BUSINESS_MESSAGE: &str = "Operation failed";
const DEFAULT_SUCCESS_MESSAGE: &str = "ok";

/// `{statusCode, message, payload}` as produced by the backend.
///
/// The backend's native names `error` and `body` are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(alias = "error")]
    pub status_code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "body")]
    pub payload: Value,
}

impl Envelope {
    pub fn success(payload: Value) -> Self {
        Self {
            status_code: codes::SUCCESS,
            message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            payload,
        }
    }

    pub fn failure(status_code: i64, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            payload: Value::Object(Default::default()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == codes::SUCCESS
    }

    /// Classify by status code
    pub fn into_result(self) -> ApiResult<Value> {
        let Envelope {
            status_code,
            message,
            payload,
        } = self;

        match status_code {
            codes::SUCCESS => Ok(payload),
            codes::AUTH_REQUIRED => Err(ApiError::new(
                ErrorKind::AuthRequired,
                or_default(message, DEFAULT_AUTH_MESSAGE),
            )
            .with_code(status_code)),
            codes::FORBIDDEN => Err(ApiError::new(
                ErrorKind::Forbidden,
                or_default(message, DEFAULT_FORBIDDEN_MESSAGE),
            )
            .with_code(status_code)),
            codes::SERVER_ERROR => {
                debug!(detail = %message, "Suppressing server error detail");
                Err(ApiError::new(ErrorKind::Server, GENERIC_SERVER_MESSAGE).with_code(status_code))
            }
            code => Err(ApiError::new(
                ErrorKind::Business,
                or_default(message, DEFAULT_BUSINESS_MESSAGE),
            )
            .with_code(code)),
        }
    }
}

fn or_default(message: String, default: &str) -> String {
    if message.trim().is_empty() {
        default.to_string()
    } else {
        message
    }
}
