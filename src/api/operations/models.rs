//! Language and embedding model management
//!
//! The model endpoints are served without a bearer token.

use serde_json::{json, Value};

use super::{empty, merge, with_id, Page, PageQuery};
use crate::api::endpoints;
use crate::api::result::ApiResult;
use crate::api::transport::RequestOptions;
use crate::api::Dispatcher;

pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Filters for [`Dispatcher::list_models`]; `None` means no filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelFilter {
    /// `llm` or `embedding`
    pub kind: Option<String>,
    /// `online` or `offline`
    pub status: Option<String>,
}

impl Dispatcher {
    pub async fn model_stats(&self) -> ApiResult<Value> {
        self.invoke(endpoints::MODELS_STATS, RequestOptions::get()).await
    }

    pub async fn list_models(&self, filter: &ModelFilter, page: Option<PageQuery>) -> ApiResult<Page<Value>> {
        let page = page.unwrap_or(PageQuery::first(DEFAULT_PAGE_SIZE));
        let mut body = json!({ "page": page.page, "pageSize": page.page_size });
        if let Some(kind) = &filter.kind {
            body["type"] = json!(kind);
        }
        if let Some(status) = &filter.status {
            body["status"] = json!(status);
        }
        self.call(endpoints::MODELS_LIST, RequestOptions::post(body)).await
    }

    pub async fn model_detail(&self, id: &str) -> ApiResult<Value> {
        self.invoke(endpoints::MODELS_DETAIL, RequestOptions::post(json!({ "id": id })))
            .await
    }

    /// `fields` needs `name` and `type`; everything else is optional
    pub async fn create_model(&self, fields: Value) -> ApiResult<Value> {
        self.invoke(endpoints::MODELS_CREATE, RequestOptions::post(merge(empty(), fields)))
            .await
    }

    pub async fn update_model(&self, id: &str, changes: Value) -> ApiResult<Value> {
        let body = with_id(id, changes);
        self.invoke(endpoints::MODELS_UPDATE, RequestOptions::post(body)).await
    }

    pub async fn delete_model(&self, id: &str) -> ApiResult<Value> {
        self.invoke(endpoints::MODELS_DELETE, RequestOptions::post(json!({ "id": id })))
            .await
    }

    pub async fn set_default_model(&self, id: &str, kind: &str) -> ApiResult<Value> {
        let body = json!({ "id": id, "type": kind });
        self.invoke(endpoints::MODELS_SET_DEFAULT, RequestOptions::post(body)).await
    }

    pub async fn test_model(&self, id: &str) -> ApiResult<Value> {
        self.invoke(endpoints::MODELS_TEST, RequestOptions::post(json!({ "id": id })))
            .await
    }

    pub async fn health_check_models(&self) -> ApiResult<Value> {
        self.invoke(endpoints::MODELS_HEALTH_CHECK, RequestOptions::post(empty()))
            .await
    }

    pub async fn update_model_status(&self, id: &str, status: &str) -> ApiResult<Value> {
        let body = json!({ "id": id, "status": status });
        self.invoke(endpoints::MODELS_UPDATE_STATUS, RequestOptions::post(body))
            .await
    }
}
