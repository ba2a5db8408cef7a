use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use crate::mock::params::{paginate, Params};
use crate::mock::router::MockContext;
use crate::mock::state::{new_id, Model, ModelKind, ModelStatus};
use crate::mock::{to_payload, HandlerResult, MockError};

const DEFAULT_PAGE_SIZE: u64 = 20;
const ALL: &str = "all";

fn require_model_id<'a>(params: &Params<'a>) -> Result<&'a str, MockError> {
    params.required("id", 5001, "Model ID is required")
}

fn model_not_found() -> MockError {
    MockError::validation(5002, "Model does not exist")
}

fn name_taken() -> MockError {
    MockError::validation(5003, "Model name already exists")
}

/// Simulated connectivity check: only online models answer
fn ping(model: &Model) -> Value {
    match model.status {
        ModelStatus::Online => json!({
            "status": "online",
            "responseTime": model.response_time.unwrap_or(200),
            "message": "Connection succeeded",
        }),
        ModelStatus::Offline => json!({
            "status": "offline",
            "responseTime": Value::Null,
            "message": "Model service is not running",
        }),
        ModelStatus::Error => json!({
            "status": "error",
            "responseTime": Value::Null,
            "message": "Model endpoint returned an error",
        }),
    }
}

pub fn stats(ctx: &MockContext<'_>, _params: &Value) -> HandlerResult {
    ctx.data(|data| -> HandlerResult {
        let count_kind = |kind| data.models.iter().filter(|m| m.kind == kind).count();
        let online = data.models.iter().filter(|m| m.status == ModelStatus::Online).count();
        Ok(json!({
            "llmCount": count_kind(ModelKind::Llm),
            "embeddingCount": count_kind(ModelKind::Embedding),
            "onlineCount": online,
            "offlineCount": data.models.len() - online,
        }))
    })
}

pub fn list(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let kind = params.string_or("type", ALL);
    let status = params.string_or("status", ALL);
    let (page, page_size) = params.page(DEFAULT_PAGE_SIZE);

    ctx.data(|data| -> HandlerResult {
        let items = data
            .models
            .iter()
            .filter(|m| kind == ALL || ModelKind::from_name(&kind) == Some(m.kind))
            .filter(|m| status == ALL || ModelStatus::from_name(&status) == Some(m.status))
            .map(to_payload)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(paginate(items, page, page_size))
    })
}

pub fn detail(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let id = require_model_id(&Params::new(params))?;
    ctx.data(|data| -> HandlerResult {
        let model = data.model(id).ok_or_else(model_not_found)?;
        to_payload(model)
    })
}

pub fn create(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let (Some(name), Some(kind)) = (params.str("name"), params.str("type")) else {
        return Err(MockError::validation(5001, "Model name and type are required"));
    };
    let kind = ModelKind::from_name(kind)
        .ok_or_else(|| MockError::validation(5001, "Model type must be llm or embedding"))?;

    ctx.data(|data| -> HandlerResult {
        if data.models.iter().any(|m| m.name == name) {
            return Err(name_taken());
        }
        let now = Utc::now();
        let model = Model {
            id: new_id("model"),
            name: name.to_string(),
            kind,
            description: params.string_or("description", ""),
            provider: params.string_or("provider", ""),
            endpoint: params.string_or("endpoint", ""),
            status: ModelStatus::Offline,
            is_default: false,
            model_size: params.str("modelSize").map(str::to_string),
            context_length: params.u64("contextLength").and_then(|n| u32::try_from(n).ok()),
            gpu_memory: params.str("gpuMemory").map(str::to_string),
            response_time: None,
            created_at: now,
            updated_at: now,
        };
        let payload = to_payload(&model)?;
        info!(model = %model.name, "Mock model created");
        data.models.push(model);
        Ok(payload)
    })
}

pub fn update(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let id = require_model_id(&params)?;

    ctx.data(|data| -> HandlerResult {
        if let Some(name) = params.str("name") {
            if data.models.iter().any(|m| m.name == name && m.id != id) {
                return Err(name_taken());
            }
        }
        let model = data
            .models
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(model_not_found)?;
        if let Some(name) = params.str("name") {
            model.name = name.to_string();
        }
        if let Some(description) = params.str("description") {
            model.description = description.to_string();
        }
        if let Some(provider) = params.str("provider") {
            model.provider = provider.to_string();
        }
        if let Some(endpoint) = params.str("endpoint") {
            model.endpoint = endpoint.to_string();
        }
        if let Some(size) = params.str("modelSize") {
            model.model_size = Some(size.to_string());
        }
        if let Some(length) = params.u64("contextLength").and_then(|n| u32::try_from(n).ok()) {
            model.context_length = Some(length);
        }
        model.updated_at = Utc::now();
        to_payload(&*model)
    })
}

pub fn delete(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let id = require_model_id(&Params::new(params))?;
    ctx.data(|data| -> HandlerResult {
        let model = data.model(id).ok_or_else(model_not_found)?;
        if model.is_default {
            return Err(MockError::validation(5004, "The default model cannot be deleted"));
        }
        data.models.retain(|m| m.id != id);
        Ok(json!({}))
    })
}

pub fn set_default(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let (Some(id), Some(kind)) = (params.str("id"), params.str("type")) else {
        return Err(MockError::validation(5001, "Model ID and type are required"));
    };

    ctx.data(|data| -> HandlerResult {
        let model = data.model(id).ok_or_else(model_not_found)?;
        if ModelKind::from_name(kind) != Some(model.kind) {
            return Err(MockError::validation(5001, "Model type does not match"));
        }
        if model.status != ModelStatus::Online {
            return Err(MockError::validation(
                5005,
                "Only online models can be set as default",
            ));
        }
        let kind = model.kind;
        for m in data.models.iter_mut().filter(|m| m.kind == kind) {
            m.is_default = m.id == id;
        }
        Ok(json!({}))
    })
}

pub fn test_connection(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let id = require_model_id(&Params::new(params))?;
    ctx.data(|data| -> HandlerResult {
        let model = data.model(id).ok_or_else(model_not_found)?;
        Ok(ping(model))
    })
}

pub fn health_check(ctx: &MockContext<'_>, _params: &Value) -> HandlerResult {
    ctx.data(|data| -> HandlerResult {
        let results: Vec<Value> = data
            .models
            .iter()
            .map(|m| {
                let mut result = ping(m);
                if let Some(fields) = result.as_object_mut() {
                    fields.insert("id".to_string(), json!(m.id));
                    fields.insert("name".to_string(), json!(m.name));
                }
                result
            })
            .collect();
        let success = results.iter().filter(|r| r["status"] == "online").count();
        Ok(json!({
            "total": results.len(),
            "success": success,
            "failed": results.len() - success,
            "results": results,
        }))
    })
}

pub fn update_status(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let (Some(id), Some(status)) = (params.str("id"), params.str("status")) else {
        return Err(MockError::validation(5001, "Model ID and status are required"));
    };
    let status = match ModelStatus::from_name(status) {
        Some(s @ (ModelStatus::Online | ModelStatus::Offline)) => s,
        _ => return Err(MockError::validation(5001, "Invalid status value")),
    };

    ctx.data(|data| -> HandlerResult {
        let model = data
            .models
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(model_not_found)?;
        model.status = status;
        model.updated_at = Utc::now();
        info!(model = %model.name, ?status, "Mock model status updated");
        Ok(json!({}))
    })
}

#[cfg(test)]
mod tests {
    use crate::mock::MockRouter;
    use serde_json::json;

    #[test]
    fn test_update_status_is_not_swallowed_by_update() {
        let router = MockRouter::with_default_routes().unwrap();
        let updated = router.resolve(
            "/api/models/update-status",
            &json!({"id": "model_003", "status": "online"}),
        );
        assert!(updated.is_success());
        assert_eq!(updated.payload, json!({}));

        let detail = router.resolve("/api/models/detail", &json!({"id": "model_003"}));
        assert_eq!(detail.payload["status"], "online");

        let invalid = router.resolve("/api/models/update-status", &json!({"id": "model_003", "status": "error"}));
        assert_eq!(invalid.status_code, 5001);
    }

    #[test]
    fn test_delete_default_is_refused() {
        let router = MockRouter::with_default_routes().unwrap();
        let refused = router.resolve("/api/models/delete", &json!({"id": "model_001"}));
        assert_eq!(refused.status_code, 5004);
        assert!(router.resolve("/api/models/delete", &json!({"id": "model_002"})).is_success());
        assert_eq!(router.resolve("/api/models/detail", &json!({"id": "model_002"})).status_code, 5002);
    }

    #[test]
    fn test_set_default_rules() {
        let router = MockRouter::with_default_routes().unwrap();
        let offline = router.resolve("/api/models/set-default", &json!({"id": "model_003", "type": "llm"}));
        assert_eq!(offline.status_code, 5005);

        let mismatch = router.resolve("/api/models/set-default", &json!({"id": "model_002", "type": "embedding"}));
        assert_eq!(mismatch.status_code, 5001);

        assert!(router
            .resolve("/api/models/set-default", &json!({"id": "model_002", "type": "llm"}))
            .is_success());
        let llms = router.resolve("/api/models/list", &json!({"type": "llm"})).payload;
        let defaults: Vec<_> = llms["list"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|m| m["isDefault"] == true)
            .map(|m| m["id"].clone())
            .collect();
        assert_eq!(defaults, vec![json!("model_002")]);
    }

    #[test]
    fn test_create_validation() {
        let router = MockRouter::with_default_routes().unwrap();
        let bad_type = router.resolve("/api/models/create", &json!({"name": "x", "type": "vision"}));
        assert_eq!(bad_type.status_code, 5001);

        let duplicate = router.resolve("/api/models/create", &json!({"name": "m3e-base", "type": "embedding"}));
        assert_eq!(duplicate.status_code, 5003);

        let created = router.resolve("/api/models/create", &json!({"name": "Mistral-7B", "type": "llm"}));
        assert!(created.is_success());
        assert_eq!(created.payload["type"], "llm");
        assert_eq!(created.payload["status"], "offline");
    }

    #[test]
    fn test_health_check_summary() {
        let router = MockRouter::with_default_routes().unwrap();
        let summary = router.resolve("/api/models/health-check", &json!({})).payload;
        assert_eq!(summary["total"], 5);
        assert_eq!(summary["success"], 3);
        assert_eq!(summary["failed"], 2);
    }
}
