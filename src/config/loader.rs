//! Locating, reading and writing `ragdesk.toml`
//!
//! Values may reference the environment as `${VAR}` or `${VAR:-fallback}`;
//! references are expanded before the TOML is parsed.

use crate::error::{Error, Result};
use regex::{Captures, Regex};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::Config;

pub const CONFIG_FILENAME: &str = "ragdesk.toml";

static ENV_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}").expect("valid env reference regex")
});

/// Load the nearest `ragdesk.toml` at or above the working directory
pub fn load_config() -> Result<Config> {
    let cwd = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;
    load_config_from_path(&discover_config(&cwd)?)
}

/// Closest `ragdesk.toml` in `start` or one of its ancestors
pub fn discover_config(start: &Path) -> Result<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
        .ok_or(Error::ConfigNotFound)
}

pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    Ok(toml::from_str(&expand_env_refs(&raw))?)
}

pub fn save_config_to_path(config: &Config, path: &Path) -> Result<()> {
    fs::write(path, toml::to_string_pretty(config)?)?;
    Ok(())
}

fn expand_env_refs(content: &str) -> String {
    ENV_REF
        .replace_all(content, |caps: &Captures| {
            let fallback = caps.get(2).map_or("", |m| m.as_str());
            env::var(&caps[1]).unwrap_or_else(|_| fallback.to_string())
        })
        .into_owned()
}

/// Commented starter configuration
pub fn default_config_content() -> &'static str {
    r#"# ragdesk client configuration

[transport]
# "live" talks to the backend, "mock" answers from the built-in simulation
mode = "${RAGDESK_TRANSPORT:-live}"
base_url = "${RAGDESK_BASE_URL:-http://localhost:8000}"
mock_delay_ms = 500

[session]
# Persistent ("remember me") credentials live here
dir = "./.ragdesk"

[navigation]
login = "/login"
landing = "/knowledge"
admin_landing = "/dashboard"
"#
}
