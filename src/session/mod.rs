//! Authentication session persistence

pub mod models;
pub mod storage;
pub mod store;

pub use models::{Role, Scope, Session, UserProfile};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{SessionStore, TOKEN_KEY, USER_INFO_KEY};
