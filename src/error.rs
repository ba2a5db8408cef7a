//! Error types for ragdesk infrastructure
//!
//! These cover construction and storage concerns. Failures of logical
//! operations are reported through [`crate::api::ApiError`] instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Mock backend error: {0}")]
    Mock(String),

    #[error("Config file not found. Create a ragdesk.toml first.")]
    ConfigNotFound,
}

impl From<bcrypt::BcryptError> for Error {
    fn from(err: bcrypt::BcryptError) -> Self {
        Error::Mock(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
