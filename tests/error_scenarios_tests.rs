//! Error scenario and edge case tests
//!
//! Run with: cargo test --test error_scenarios_tests
//! Covers:
//! - Configuration errors
//! - Envelope classification edge cases
//! - Infrastructure errors staying out of the operation contract

use ragdesk::api::{ApiError, ApiResponse, Envelope, ErrorKind, Outcome, GENERIC_SERVER_MESSAGE};
use ragdesk::config::{load_config, load_config_from_path, save_config_to_path, Config, TransportMode};
use ragdesk::error::Error;
use ragdesk::session::SessionStore;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

// ============================================================================
// Configuration Error Tests
// ============================================================================

#[test]
fn test_error_config_not_found() {
    let dir = TempDir::new().unwrap();
    let result = load_config_from_path(&dir.path().join("ragdesk.toml"));
    assert!(matches!(result, Err(Error::ConfigNotFound)));
    assert!(Error::ConfigNotFound.to_string().contains("ragdesk.toml"));
}

#[test]
fn test_error_config_invalid_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ragdesk.toml");
    fs::write(&path, "this is [ not valid toml").unwrap();

    let err = load_config_from_path(&path).unwrap_err();
    assert!(matches!(err, Error::TomlParse(_)));
    assert!(err.to_string().contains("TOML"));
}

#[test]
fn test_error_config_unknown_mode() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ragdesk.toml");
    fs::write(&path, "[transport]\nmode = \"carrier-pigeon\"\n").unwrap();

    assert!(load_config_from_path(&path).is_err());
}

#[test]
fn test_config_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ragdesk.toml");

    let mut config = Config::default();
    config.transport.mode = TransportMode::Mock;
    config.transport.mock_delay_ms = 25;
    config.navigation.admin_landing = "/admin".to_string();
    save_config_to_path(&config, &path).unwrap();

    let restored = load_config_from_path(&path).unwrap();
    assert_eq!(restored.transport.mode, TransportMode::Mock);
    assert_eq!(restored.transport.mock_delay_ms, 25);
    assert_eq!(restored.navigation.admin_landing, "/admin");
}

#[test]
fn test_load_config_from_working_directory_ancestor() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("workspace").join("ui");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        dir.path().join("ragdesk.toml"),
        "[transport]\nmode = \"mock\"\nmock_delay_ms = 5\n",
    )
    .unwrap();

    // only test in this binary that depends on the working directory
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(&nested).unwrap();
    let result = load_config();
    std::env::set_current_dir(previous).unwrap();

    let config = result.unwrap();
    assert_eq!(config.transport.mode, TransportMode::Mock);
    assert_eq!(config.transport.mock_delay_ms, 5);
}

// ============================================================================
// Envelope Classification
// ============================================================================

fn classify(raw: serde_json::Value) -> Result<serde_json::Value, ApiError> {
    serde_json::from_value::<Envelope>(raw).unwrap().into_result()
}

#[test]
fn test_error_every_class() {
    assert_eq!(classify(json!({"statusCode": 0, "payload": [1]})).unwrap(), json!([1]));

    let cases = [
        (401, ErrorKind::AuthRequired),
        (403, ErrorKind::Forbidden),
        (500, ErrorKind::Server),
        (1002, ErrorKind::Business),
        (-1, ErrorKind::Business),
    ];
    for (code, kind) in cases {
        let err = classify(json!({"statusCode": code, "message": "detail"})).unwrap_err();
        assert_eq!(err.kind, kind, "code {}", code);
        assert_eq!(err.code, Some(code));
    }
}

#[test]
fn test_error_server_message_is_generic() {
    let err = classify(json!({"statusCode": 500, "message": "SQLSTATE[42S02]"})).unwrap_err();
    assert_eq!(err.message, GENERIC_SERVER_MESSAGE);
}

#[test]
fn test_error_kind_wire_names() {
    let err = ApiError::network("offline");
    let value = serde_json::to_value(&err).unwrap();
    assert_eq!(value["kind"], "NetworkError");
    assert!(value.get("code").is_none());
}

#[test]
fn test_response_wrapper() {
    let ok: ApiResponse<u32> = ApiResponse::ok(7);
    assert!(ok.is_success());
    assert_eq!(ok.outcome, Outcome::Success);
    assert_eq!(ok.into_result().unwrap(), 7);

    let failed: ApiResponse<u32> = ApiResponse::err(ApiError::new(ErrorKind::Forbidden, "no"));
    assert_eq!(failed.error_kind(), Some(ErrorKind::Forbidden));
    assert!(failed.into_result().is_err());
}

// ============================================================================
// Storage Errors
// ============================================================================

#[tokio::test]
async fn test_error_session_dir_is_a_file() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("session");
    fs::write(&blocker, "not a directory").unwrap();

    let config = ragdesk::config::SessionConfig { dir: blocker };
    let result = SessionStore::from_config(&config).await;
    assert!(matches!(result, Err(Error::Io(_))));
}
