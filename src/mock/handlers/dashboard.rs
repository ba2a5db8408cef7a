use chrono::{Duration, Utc};
use serde_json::{json, Value};

use super::timestamp;
use crate::mock::router::MockContext;
use crate::mock::state::{MockData, ModelKind, ModelStatus};
use crate::mock::HandlerResult;

fn model_summary(data: &MockData, kind: ModelKind) -> Value {
    let of_kind: Vec<_> = data.models.iter().filter(|m| m.kind == kind).collect();
    let online = of_kind.iter().filter(|m| m.status == ModelStatus::Online).count();
    match of_kind.iter().find(|m| m.is_default) {
        Some(default) => json!({
            "name": default.name,
            "description": default.description,
            "status": default.status,
            "online": online,
            "total": of_kind.len(),
        }),
        None => json!({
            "name": "Not configured",
            "description": "",
            "status": ModelStatus::Offline,
            "online": online,
            "total": of_kind.len(),
        }),
    }
}

fn overall_status(data: &MockData) -> &'static str {
    let counts = |kind| {
        let of_kind = data.models.iter().filter(|m| m.kind == kind);
        let total = of_kind.clone().count();
        let online = of_kind.filter(|m| m.status == ModelStatus::Online).count();
        (online, total)
    };
    let (llm_online, llm_total) = counts(ModelKind::Llm);
    let (emb_online, emb_total) = counts(ModelKind::Embedding);

    if llm_online == 0 || emb_online == 0 {
        "error"
    } else if llm_online < llm_total || emb_online < emb_total {
        "warning"
    } else {
        "normal"
    }
}

pub fn stats(ctx: &MockContext<'_>, _params: &Value) -> HandlerResult {
    let week_ago = Utc::now() - Duration::days(7);
    ctx.data(|data| -> HandlerResult {
        let new_kbs = data
            .knowledge_bases
            .iter()
            .filter(|kb| kb.created_at >= week_ago)
            .count();
        let new_docs = data
            .documents
            .iter()
            .filter(|d| d.upload_time >= week_ago)
            .count();
        Ok(json!({
            "todayQuestions": { "count": data.questions_today, "change": 0, "changeType": "increase" },
            "searchCount": { "count": data.searches_today, "change": 0, "changeType": "increase" },
            "knowledgeBaseCount": { "count": data.knowledge_bases.len(), "newCount": new_kbs },
            "documentCount": { "count": data.documents.len(), "newCount": new_docs },
        }))
    })
}

/// Also answers the refresh route; the mock has nothing to re-check
pub fn system_status(ctx: &MockContext<'_>, _params: &Value) -> HandlerResult {
    ctx.data(|data| -> HandlerResult {
        Ok(json!({
            "llmModel": model_summary(data, ModelKind::Llm),
            "vectorModel": model_summary(data, ModelKind::Embedding),
            "vectorDb": { "name": "Chroma", "description": "Vector database", "status": "normal" },
            "relationalDb": { "name": "MySQL", "description": "Relational database", "status": "normal" },
            "systemStatus": overall_status(data),
            "lastUpdate": timestamp(Utc::now()),
        }))
    })
}

#[cfg(test)]
mod tests {
    use crate::mock::MockRouter;
    use serde_json::json;

    #[test]
    fn test_system_status_reflects_models() {
        let router = MockRouter::with_default_routes().unwrap();
        let status = router.resolve("/api/dashboard/system-status", &json!({})).payload;
        assert_eq!(status["llmModel"]["name"], "Qwen2.5-7B-Instruct");
        assert_eq!(status["llmModel"]["online"], 2);
        assert_eq!(status["llmModel"]["total"], 3);
        assert_eq!(status["systemStatus"], "warning");

        router.resolve("/api/models/update-status", &json!({"id": "model_003", "status": "online"}));
        router.resolve("/api/models/update-status", &json!({"id": "model_005", "status": "online"}));
        let refreshed = router.resolve("/api/dashboard/refresh-status", &json!({})).payload;
        assert_eq!(refreshed["systemStatus"], "normal");
    }

    #[test]
    fn test_stats_counts_questions() {
        let router = MockRouter::with_default_routes().unwrap();
        let before = router.resolve("/api/dashboard/stats", &json!({})).payload;
        assert_eq!(before["documentCount"]["count"], 14);

        let login = router.resolve("/api/auth/login", &json!({"username": "user", "password": "user123"}));
        let token = login.payload["token"].as_str().unwrap().to_string();
        let session = router.resolve_as("/api/chat/session/create", &json!({}), Some(&token)).payload;
        let sent = router.resolve_as(
            "/api/chat/message/send",
            &json!({"sessionId": session["id"], "question": "deployment steps"}),
            Some(&token),
        );
        assert!(sent.is_success());
        let after = router.resolve("/api/dashboard/stats", &json!({})).payload;
        assert_eq!(
            after["todayQuestions"]["count"],
            before["todayQuestions"]["count"].as_u64().unwrap() + 1
        );
    }
}
