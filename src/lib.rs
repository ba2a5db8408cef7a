//! ragdesk - client core for a retrieval-augmented knowledge desk
//!
//! Dispatches logical operations to a live backend or an in-process mock,
//! normalizes every response into one result contract, persists the login
//! session and guards navigation by role.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod mock;
pub mod navigation;
pub mod session;

pub use api::{ApiError, ApiResult, Dispatcher, ErrorKind};
pub use client::Client;
pub use config::Config;
pub use error::Error;
pub use navigation::{Decision, NavigationGuard};
pub use session::{Role, Session, SessionStore, UserProfile};
