//! Normalized result contract handed to every caller

use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure classes a caller can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Transport or connectivity failure, including undecodable responses
    #[serde(rename = "NetworkError")]
    Network,
    /// Status 401
    #[serde(rename = "AuthRequired")]
    AuthRequired,
    /// Status 403
    #[serde(rename = "Forbidden")]
    Forbidden,
    /// Status 500; the server detail is never surfaced
    #[serde(rename = "ServerError")]
    Server,
    /// Any other nonzero status, message passed through
    #[serde(rename = "BusinessError")]
    Business,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "NetworkError"),
            ErrorKind::AuthRequired => write!(f, "AuthRequired"),
            ErrorKind::Forbidden => write!(f, "Forbidden"),
            ErrorKind::Server => write!(f, "ServerError"),
            ErrorKind::Business => write!(f, "BusinessError"),
        }
    }
}

/// A failed logical operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    /// Envelope status code, when the failure came from one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn is_auth_required(&self) -> bool {
        self.kind == ErrorKind::AuthRequired
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

/// Serializable `{outcome, data, error}` view of an [`ApiResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            outcome: Outcome::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: ApiError) -> Self {
        Self {
            outcome: Outcome::Failure,
            data: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }

    pub fn into_result(self) -> ApiResult<T> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(error),
            (Some(data), None) => Ok(data),
            (None, None) => Err(ApiError::network("Empty response")),
        }
    }
}

impl<T> From<ApiResult<T>> for ApiResponse<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(error) => Self::err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shape() {
        let response: ApiResponse<u32> =
            ApiResponse::from(Err(ApiError::new(ErrorKind::Business, "Name taken").with_code(2002)));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["outcome"], "failure");
        assert_eq!(json["error"]["kind"], "BusinessError");
        assert_eq!(json["error"]["code"], 2002);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_into_result_roundtrip() {
        let response = ApiResponse::ok(7);
        assert!(response.is_success());
        assert_eq!(response.into_result(), Ok(7));
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::network("connection refused");
        assert_eq!(err.to_string(), "NetworkError: connection refused");
    }
}
