//! Document search

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{empty, merge, ExportTicket, Page};
use crate::api::endpoints;
use crate::api::result::{ApiError, ApiResult};
use crate::api::transport::RequestOptions;
use crate::api::Dispatcher;

pub const DEFAULT_KEYWORD_LIMIT: u64 = 10;

/// Search request; unset filters default to "all"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub keyword: String,
    pub knowledge_base_id: String,
    pub doc_type: String,
    /// `relevance`, `time` or `title`
    pub sort_by: String,
    pub page: u64,
    pub page_size: u64,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            knowledge_base_id: "all".to_string(),
            doc_type: "all".to_string(),
            sort_by: "relevance".to_string(),
            page: 1,
            page_size: 10,
        }
    }
}

impl SearchQuery {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Default::default()
        }
    }
}

fn authed(body: Value) -> RequestOptions {
    RequestOptions::post(body).authenticated()
}

impl Dispatcher {
    pub async fn search(&self, query: &SearchQuery) -> ApiResult<Page<Value>> {
        let body = serde_json::to_value(query)
            .map_err(|e| ApiError::network(format!("Could not encode search query: {}", e)))?;
        self.call(endpoints::SEARCH_DOCUMENTS, authed(body)).await
    }

    pub async fn hot_keywords(&self, limit: Option<u64>) -> ApiResult<Vec<Value>> {
        let body = json!({ "limit": limit.unwrap_or(DEFAULT_KEYWORD_LIMIT) });
        self.call(endpoints::SEARCH_HOT_KEYWORDS, authed(body)).await
    }

    pub async fn doc_types(&self) -> ApiResult<Vec<Value>> {
        self.call(endpoints::SEARCH_DOC_TYPES, authed(empty())).await
    }

    pub async fn export_search(&self, filters: Value) -> ApiResult<ExportTicket> {
        self.call(endpoints::SEARCH_EXPORT, authed(merge(empty(), filters)))
            .await
    }
}
