//! Typed operation catalogue on top of [`Dispatcher`](super::Dispatcher)
//!
//! Every operation is a method on the dispatcher. Request defaults match
//! what the backend assumes when a field is omitted.

pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod knowledge;
pub mod models;
pub mod profile;
pub mod search;
pub mod users;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use auth::LoginResponse;
pub use chat::{ChatMessage, ChatSession, Reference, SendMessageReply};
pub use search::SearchQuery;

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub list: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: u64,
    pub page_size: u64,
}

impl PageQuery {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    pub fn first(page_size: u64) -> Self {
        Self::new(1, page_size)
    }
}

/// Where a generated export can be downloaded from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTicket {
    pub download_url: String,
    pub file_name: String,
    /// Seconds until the link expires
    pub expires_in: u64,
}

/// Overlay caller-supplied fields on top of request defaults.
///
/// Non-object `extra` values are ignored.
pub(crate) fn merge(mut base: Value, extra: Value) -> Value {
    if let (Some(target), Value::Object(fields)) = (base.as_object_mut(), extra) {
        target.extend(fields);
    }
    base
}

/// Empty JSON object body
pub(crate) fn empty() -> Value {
    Value::Object(Map::new())
}

/// Update body: the fields of `changes` addressed to record `id`.
///
/// `id` always wins over an `id` field inside `changes`.
pub(crate) fn with_id(id: &str, changes: Value) -> Value {
    let mut body = merge(empty(), changes);
    body["id"] = Value::from(id);
    body
}
