//! Knowledge bases and their documents

use serde_json::{json, Value};

use super::{empty, merge, with_id, ExportTicket, Page, PageQuery};
use crate::api::endpoints;
use crate::api::result::ApiResult;
use crate::api::transport::{MultipartPayload, RequestOptions};
use crate::api::Dispatcher;

pub const DEFAULT_PAGE_SIZE: u64 = 20;

fn authed(body: Value) -> RequestOptions {
    RequestOptions::post(body).authenticated()
}

impl Dispatcher {
    pub async fn knowledge_stats(&self) -> ApiResult<Value> {
        self.invoke(endpoints::KB_STATS, authed(empty())).await
    }

    pub async fn list_knowledge_bases(&self, page: Option<PageQuery>, keyword: Option<&str>) -> ApiResult<Page<Value>> {
        let page = page.unwrap_or(PageQuery::first(DEFAULT_PAGE_SIZE));
        let mut body = json!({ "page": page.page, "pageSize": page.page_size });
        if let Some(keyword) = keyword {
            body["keyword"] = json!(keyword);
        }
        self.call(endpoints::KB_LIST, authed(body)).await
    }

    pub async fn knowledge_base_detail(&self, id: &str) -> ApiResult<Value> {
        self.invoke(endpoints::KB_DETAIL, authed(json!({ "id": id }))).await
    }

    /// `fields` carries `name`, `code` and optional `description`, `icon`, `iconColor`, `visible`
    pub async fn create_knowledge_base(&self, fields: Value) -> ApiResult<Value> {
        self.invoke(endpoints::KB_CREATE, authed(fields)).await
    }

    pub async fn update_knowledge_base(&self, id: &str, changes: Value) -> ApiResult<Value> {
        let body = with_id(id, changes);
        self.invoke(endpoints::KB_UPDATE, authed(body)).await
    }

    pub async fn delete_knowledge_base(&self, id: &str) -> ApiResult<Value> {
        self.invoke(endpoints::KB_DELETE, authed(json!({ "id": id }))).await
    }

    pub async fn list_documents(&self, knowledge_base_id: &str, page: Option<PageQuery>) -> ApiResult<Page<Value>> {
        let page = page.unwrap_or(PageQuery::first(DEFAULT_PAGE_SIZE));
        let body = json!({
            "knowledgeBaseId": knowledge_base_id,
            "page": page.page,
            "pageSize": page.page_size,
        });
        self.call(endpoints::KB_DOCUMENTS, authed(body)).await
    }

    /// Upload one file into a knowledge base as `multipart/form-data`
    pub async fn upload_document(
        &self,
        knowledge_base_id: &str,
        file_name: &str,
        mime: Option<&str>,
        bytes: Vec<u8>,
    ) -> ApiResult<Value> {
        let form = MultipartPayload::new()
            .text("knowledgeBaseId", knowledge_base_id)
            .file("file", file_name, mime, bytes);
        self.invoke(
            endpoints::KB_UPLOAD_DOCUMENT,
            RequestOptions::multipart(form).authenticated(),
        )
        .await
    }

    pub async fn delete_document(&self, document_id: &str) -> ApiResult<Value> {
        let body = json!({ "documentId": document_id });
        self.invoke(endpoints::KB_DELETE_DOCUMENT, authed(body)).await
    }

    pub async fn preview_document(&self, document_id: &str) -> ApiResult<Value> {
        let body = json!({ "documentId": document_id });
        self.invoke(endpoints::KB_DOCUMENT_PREVIEW, authed(body)).await
    }

    pub async fn export_documents(&self, filters: Value) -> ApiResult<ExportTicket> {
        self.call(endpoints::KB_EXPORT_DOCUMENTS, authed(merge(empty(), filters)))
            .await
    }

    pub async fn vector_models(&self) -> ApiResult<Vec<Value>> {
        self.call(endpoints::KB_VECTOR_MODELS, authed(empty())).await
    }
}
