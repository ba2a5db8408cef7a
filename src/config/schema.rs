//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,
}

/// Which transport fulfils logical operations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Real network exchange with the backend
    #[default]
    Live,
    /// Local simulation through the mock router
    Mock,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportMode::Live => write!(f, "live"),
            TransportMode::Mock => write!(f, "mock"),
        }
    }
}

/// Transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    #[serde(default)]
    pub mode: TransportMode,

    /// Prefix joined in front of every endpoint path in live mode
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Artificial latency applied to every mock response
    #[serde(default = "default_mock_delay_ms")]
    pub mock_delay_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_mock_delay_ms() -> u64 {
    500
}

impl TransportConfig {
    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_delay_ms)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            mode: TransportMode::default(),
            base_url: default_base_url(),
            mock_delay_ms: default_mock_delay_ms(),
        }
    }
}

/// Session persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the persistent scope
    #[serde(default = "default_session_dir")]
    pub dir: PathBuf,
}

fn default_session_dir() -> PathBuf {
    PathBuf::from("./.ragdesk")
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dir: default_session_dir(),
        }
    }
}

/// Well-known navigation targets used by the guard and the 401 redirect
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigationConfig {
    #[serde(default = "default_login")]
    pub login: String,

    /// Standard landing page
    #[serde(default = "default_landing")]
    pub landing: String,

    /// Landing page for administrators
    #[serde(default = "default_admin_landing")]
    pub admin_landing: String,
}

fn default_login() -> String {
    "/login".to_string()
}

fn default_landing() -> String {
    "/knowledge".to_string()
}

fn default_admin_landing() -> String {
    "/dashboard".to_string()
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            login: default_login(),
            landing: default_landing(),
            admin_landing: default_admin_landing(),
        }
    }
}
