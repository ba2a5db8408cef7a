//! Configuration management for ragdesk

pub mod loader;
mod schema;

pub use loader::{
    default_config_content, discover_config, load_config, load_config_from_path, save_config_to_path,
    CONFIG_FILENAME,
};
pub use schema::*;
