use chrono::Utc;
use serde_json::{json, Value};

use super::{export_ticket, timestamp, with_fields};
use crate::mock::params::{paginate, Params};
use crate::mock::router::MockContext;
use crate::mock::state::{format_size, new_id, Document, KnowledgeBase, MockData, ModelKind};
use crate::mock::{to_payload, HandlerResult, MockError};

const DEFAULT_PAGE_SIZE: u64 = 20;

fn kb_view(data: &MockData, kb: &KnowledgeBase) -> HandlerResult {
    let (count, bytes) = data
        .documents_in(&kb.id)
        .fold((0u64, 0u64), |(n, total), d| (n + 1, total + d.size_bytes));
    Ok(with_fields(
        to_payload(kb)?,
        json!({
            "documentCount": count,
            "storageSize": format_size(bytes),
            "lastUpdate": timestamp(kb.updated_at),
        }),
    ))
}

pub(super) fn document_view(doc: &Document) -> HandlerResult {
    Ok(with_fields(to_payload(doc)?, json!({ "size": format_size(doc.size_bytes) })))
}

fn require_kb_id<'a>(params: &Params<'a>, key: &str) -> Result<&'a str, MockError> {
    params.required(key, 2001, "Knowledge base ID is required")
}

fn kb_not_found() -> MockError {
    MockError::validation(2002, "Knowledge base does not exist")
}

pub fn stats(ctx: &MockContext<'_>, _params: &Value) -> HandlerResult {
    ctx.data(|data| {
        Ok(json!({
            "accessibleKnowledgeBase": data.knowledge_bases.len(),
            "accessibleDocuments": data.documents.len(),
            "todayQuestions": data.questions_today,
        }))
    })
}

pub fn list(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let keyword = params.str("keyword").map(str::to_lowercase);
    let (page, page_size) = params.page(DEFAULT_PAGE_SIZE);

    ctx.data(|data| -> HandlerResult {
        let items = data
            .knowledge_bases
            .iter()
            .filter(|kb| match &keyword {
                Some(k) => {
                    kb.name.to_lowercase().contains(k) || kb.description.to_lowercase().contains(k)
                }
                None => true,
            })
            .map(|kb| kb_view(data, kb))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(paginate(items, page, page_size))
    })
}

pub fn detail(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let id = require_kb_id(&params, "id")?;

    ctx.data(|data| -> HandlerResult {
        let kb = data.knowledge_base(id).ok_or_else(kb_not_found)?;
        let recent = data
            .documents_in(id)
            .take(5)
            .map(document_view)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(with_fields(kb_view(data, kb)?, json!({ "recentDocuments": recent })))
    })
}

pub fn create(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let (Some(name), Some(code)) = (params.str("name"), params.str("code")) else {
        return Err(MockError::validation(2001, "Knowledge base name and code are required"));
    };
    let created_by = ctx
        .caller()
        .map(|c| c.sub)
        .unwrap_or_else(|_| "system".to_string());

    ctx.data(|data| -> HandlerResult {
        if data.knowledge_bases.iter().any(|kb| kb.code == code) {
            return Err(MockError::validation(2003, "Knowledge base code already exists"));
        }
        let now = Utc::now();
        let kb = KnowledgeBase {
            id: new_id("kb"),
            name: name.to_string(),
            code: code.to_string(),
            description: params.string_or("description", ""),
            icon: params.string_or("icon", "icon-book"),
            icon_color: params.string_or("iconColor", "linear-gradient(135deg, #667eea 0%, #764ba2 100%)"),
            visible: params.bool("visible").unwrap_or(true),
            status: "active".to_string(),
            progress: 100,
            viewers: 0,
            created_by,
            created_at: now,
            updated_at: now,
        };
        let view = kb_view(data, &kb)?;
        data.knowledge_bases.push(kb);
        Ok(view)
    })
}

pub fn update(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let id = require_kb_id(&params, "id")?;

    ctx.data(|data| -> HandlerResult {
        let kb = data
            .knowledge_bases
            .iter_mut()
            .find(|kb| kb.id == id)
            .ok_or_else(kb_not_found)?;
        if let Some(name) = params.str("name") {
            kb.name = name.to_string();
        }
        if let Some(description) = params.str("description") {
            kb.description = description.to_string();
        }
        if let Some(icon) = params.str("icon") {
            kb.icon = icon.to_string();
        }
        if let Some(color) = params.str("iconColor") {
            kb.icon_color = color.to_string();
        }
        if let Some(visible) = params.bool("visible") {
            kb.visible = visible;
        }
        kb.updated_at = Utc::now();

        let kb = kb.clone();
        kb_view(data, &kb)
    })
}

pub fn delete(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let id = require_kb_id(&params, "id")?;

    ctx.data(|data| {
        let before = data.knowledge_bases.len();
        data.knowledge_bases.retain(|kb| kb.id != id);
        if data.knowledge_bases.len() == before {
            return Err(kb_not_found());
        }
        data.documents.retain(|d| d.knowledge_base_id != id);
        Ok(json!({}))
    })
}

pub fn documents(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let id = require_kb_id(&params, "knowledgeBaseId")?;
    let (page, page_size) = params.page(DEFAULT_PAGE_SIZE);

    ctx.data(|data| -> HandlerResult {
        data.knowledge_base(id).ok_or_else(kb_not_found)?;
        let items = data
            .documents_in(id)
            .map(document_view)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(paginate(items, page, page_size))
    })
}

/// Accepts the multipart parameter shape: text fields plus `files`
pub fn upload_document(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let kb_id = require_kb_id(&Params::new(params), "knowledgeBaseId")?;
    let files = params
        .get("files")
        .and_then(Value::as_array)
        .filter(|files| !files.is_empty())
        .ok_or_else(|| MockError::validation(2001, "Please choose a file to upload"))?;
    let uploaded_by = ctx
        .caller()
        .map(|c| c.sub)
        .unwrap_or_else(|_| "system".to_string());

    ctx.data(|data| -> HandlerResult {
        data.knowledge_base(kb_id).ok_or_else(kb_not_found)?;
        let now = Utc::now();
        let mut created = Vec::with_capacity(files.len());
        for file in files {
            let file_name = file["fileName"].as_str().unwrap_or("document").to_string();
            let file_type = file_name
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_lowercase())
                .unwrap_or_default();
            let doc = Document {
                id: new_id("doc"),
                knowledge_base_id: kb_id.to_string(),
                name: file_name
                    .rsplit_once('.')
                    .map_or(file_name.as_str(), |(stem, _)| stem)
                    .to_string(),
                file_name: file_name.clone(),
                size_bytes: file["size"].as_u64().unwrap_or(0),
                file_type,
                page_count: 0,
                chunk_count: 0,
                status: "processing".to_string(),
                tags: Vec::new(),
                uploaded_by: uploaded_by.clone(),
                upload_time: now,
                excerpt: String::new(),
            };
            created.push(document_view(&doc)?);
            data.documents.push(doc);
        }
        if let Some(kb) = data.knowledge_bases.iter_mut().find(|kb| kb.id == kb_id) {
            kb.updated_at = now;
        }
        Ok(json!({ "documents": created }))
    })
}

pub fn delete_document(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let id = params.required("documentId", 2001, "Document ID is required")?;

    ctx.data(|data| {
        let before = data.documents.len();
        data.documents.retain(|d| d.id != id);
        if data.documents.len() == before {
            return Err(MockError::validation(2002, "Document does not exist"));
        }
        Ok(json!({}))
    })
}

pub fn preview_document(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let id = params.required("documentId", 2001, "Document ID is required")?;

    ctx.data(|data| {
        let doc = data
            .documents
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| MockError::validation(2002, "Document does not exist"))?;
        Ok(json!({
            "id": doc.id,
            "name": doc.name,
            "fileType": doc.file_type,
            "pageCount": doc.page_count,
            "content": doc.excerpt,
        }))
    })
}

pub fn export_documents(_ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let stem = Params::new(params)
        .str("knowledgeBaseId")
        .map_or_else(|| "documents".to_string(), |id| format!("documents-{}", id));
    export_ticket(&stem, "zip")
}

pub fn vector_models(ctx: &MockContext<'_>, _params: &Value) -> HandlerResult {
    ctx.data(|data| {
        let models: Vec<Value> = data
            .models
            .iter()
            .filter(|m| m.kind == ModelKind::Embedding)
            .map(|m| {
                json!({
                    "id": m.id,
                    "name": m.name,
                    "description": m.description,
                    "status": m.status,
                    "isDefault": m.is_default,
                })
            })
            .collect();
        Ok(json!(models))
    })
}

#[cfg(test)]
mod tests {
    use crate::mock::MockRouter;
    use serde_json::json;

    #[test]
    fn test_list_counts_documents() {
        let router = MockRouter::with_default_routes().unwrap();
        let page = router.resolve("/api/knowledge-base/list", &json!({})).payload;
        assert_eq!(page["total"], 3);
        assert_eq!(page["pageSize"], 20);
        assert_eq!(page["list"][0]["id"], "kb_001");
        assert_eq!(page["list"][0]["documentCount"], 5);
    }

    #[test]
    fn test_create_then_duplicate_code() {
        let router = MockRouter::with_default_routes().unwrap();
        let created = router.resolve(
            "/api/knowledge-base/create",
            &json!({"name": "Security", "code": "security"}),
        );
        assert!(created.is_success());
        assert_eq!(created.payload["documentCount"], 0);

        let duplicate = router.resolve(
            "/api/knowledge-base/create",
            &json!({"name": "Security again", "code": "security"}),
        );
        assert_eq!(duplicate.status_code, 2003);

        let missing = router.resolve("/api/knowledge-base/create", &json!({"name": "No code"}));
        assert_eq!(missing.status_code, 2001);
    }

    #[test]
    fn test_detail_and_delete() {
        let router = MockRouter::with_default_routes().unwrap();
        assert_eq!(router.resolve("/api/knowledge-base/detail", &json!({})).status_code, 2001);
        assert_eq!(
            router.resolve("/api/knowledge-base/detail", &json!({"id": "kb_404"})).status_code,
            2002
        );

        assert!(router.resolve("/api/knowledge-base/delete", &json!({"id": "kb_003"})).is_success());
        let docs = router.resolve("/api/knowledge-base/documents", &json!({"knowledgeBaseId": "kb_003"}));
        assert_eq!(docs.status_code, 2002);
    }

    #[test]
    fn test_upload_adds_processing_documents() {
        let router = MockRouter::with_default_routes().unwrap();
        let params = json!({
            "knowledgeBaseId": "kb_002",
            "files": [{"field": "file", "fileName": "Onboarding.pdf", "size": 2048}]
        });
        let uploaded = router.resolve("/api/knowledge-base/upload-document", &params);
        assert!(uploaded.is_success());
        assert_eq!(uploaded.payload["documents"][0]["status"], "processing");
        assert_eq!(uploaded.payload["documents"][0]["fileType"], "pdf");

        let page = router.resolve("/api/knowledge-base/documents", &json!({"knowledgeBaseId": "kb_002"}));
        assert_eq!(page.payload["total"], 5);
    }
}
