//! Shared helpers for integration tests

#![allow(dead_code)]

use ragdesk::config::{Config, TransportMode};
use ragdesk::Client;
use tempfile::TempDir;

/// Mock-mode config with no artificial latency and a private session dir
pub fn mock_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.transport.mode = TransportMode::Mock;
    config.transport.mock_delay_ms = 0;
    config.session.dir = dir.path().join("session");
    config
}

pub fn live_config(dir: &TempDir, base_url: &str) -> Config {
    let mut config = Config::default();
    config.transport.mode = TransportMode::Live;
    config.transport.base_url = base_url.to_string();
    config.session.dir = dir.path().join("session");
    config
}

pub async fn mock_client() -> (Client, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let client = Client::from_config(&mock_config(&dir))
        .await
        .expect("Failed to build mock client");
    (client, dir)
}

pub async fn login_as(client: &Client, username: &str, password: &str) {
    client
        .api()
        .authenticate(username, password, false)
        .await
        .expect("Login failed");
}
