use chrono::Utc;
use serde_json::{json, Value};

use super::with_fields;
use crate::mock::params::Params;
use crate::mock::router::MockContext;
use crate::mock::state::{new_id, ChatMessage, ChatSession, MockData, ModelKind, ModelStatus, Reference};
use crate::mock::{to_payload, HandlerResult, MockError};

pub const MAX_QUESTION_CHARS: usize = 1000;
const DEFAULT_SESSION_LIMIT: u64 = 20;
const MAX_SESSION_LIMIT: u64 = 100;
const NEW_SESSION_TITLE: &str = "New conversation";
const TITLE_CHARS: usize = 20;
const MAX_REFERENCES: usize = 3;
const ALL_KNOWLEDGE_BASES: &str = "all";

fn session_not_found() -> MockError {
    MockError::validation(3003, "Session does not exist")
}

/// The session, provided `caller` owns it
fn owned_session<'d>(
    data: &'d MockData,
    session_id: &str,
    caller: &str,
    denied: &str,
) -> Result<&'d ChatSession, MockError> {
    let session = data.session(session_id).ok_or_else(session_not_found)?;
    if session.owner_id != caller {
        return Err(MockError::Forbidden(denied.to_string()));
    }
    Ok(session)
}

fn require_session_id<'a>(params: &Params<'a>) -> Result<&'a str, MockError> {
    params.required("sessionId", 3001, "Session ID is required")
}

fn session_view(data: &MockData, session: &ChatSession) -> HandlerResult {
    let count = data.messages.get(&session.id).map_or(0, Vec::len);
    Ok(with_fields(to_payload(session)?, json!({ "messageCount": count })))
}

/// Documents whose title or excerpt shares a word with the question
fn find_references(data: &MockData, kb_id: &str, question: &str) -> Vec<Reference> {
    let terms: Vec<String> = question
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() > 2)
        .map(str::to_lowercase)
        .collect();

    let mut scored: Vec<Reference> = data
        .documents
        .iter()
        .filter(|d| kb_id == ALL_KNOWLEDGE_BASES || d.knowledge_base_id == kb_id)
        .filter_map(|d| {
            let haystack = format!("{} {}", d.name, d.excerpt).to_lowercase();
            let hits = terms.iter().filter(|t| haystack.contains(t.as_str())).count();
            (hits > 0).then(|| Reference {
                title: d.name.clone(),
                page: 1,
                content: d.excerpt.clone(),
                score: (hits as f64 / terms.len() as f64).min(1.0),
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(MAX_REFERENCES);
    scored
}

fn compose_answer(question: &str, references: &[Reference]) -> String {
    if references.is_empty() {
        return format!(
            "I could not find documents related to \"{}\" in the selected knowledge base.",
            question
        );
    }
    let titles: Vec<&str> = references.iter().map(|r| r.title.as_str()).collect();
    format!(
        "Based on {}: {}",
        titles.join(", "),
        references[0].content
    )
}

pub fn knowledge_bases(ctx: &MockContext<'_>, _params: &Value) -> HandlerResult {
    ctx.data(|data| -> HandlerResult {
        let list: Vec<Value> = data
            .knowledge_bases
            .iter()
            .filter(|kb| kb.visible)
            .map(|kb| {
                json!({
                    "id": kb.id,
                    "name": kb.name,
                    "documentCount": data.documents_in(&kb.id).count(),
                })
            })
            .collect();
        Ok(json!(list))
    })
}

pub fn models(ctx: &MockContext<'_>, _params: &Value) -> HandlerResult {
    ctx.data(|data| -> HandlerResult {
        let list: Vec<Value> = data
            .models
            .iter()
            .filter(|m| m.kind == ModelKind::Llm && m.status == ModelStatus::Online)
            .map(|m| {
                json!({
                    "id": m.id,
                    "name": m.name,
                    "description": m.description,
                    "isDefault": m.is_default,
                })
            })
            .collect();
        Ok(json!(list))
    })
}

pub fn sessions(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let limit = Params::new(params)
        .u64_or("limit", DEFAULT_SESSION_LIMIT)
        .clamp(1, MAX_SESSION_LIMIT) as usize;
    let owner = ctx.caller()?.sub;

    ctx.data(|data| -> HandlerResult {
        let mut visible: Vec<&ChatSession> = data
            .sessions
            .iter()
            .filter(|s| s.owner_id == owner)
            .collect();
        visible.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        let list = visible
            .into_iter()
            .take(limit)
            .map(|s| session_view(data, s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(json!(list))
    })
}

pub fn create_session(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let kb_id = params.string_or("knowledgeBaseId", ALL_KNOWLEDGE_BASES);
    let owner = ctx.caller()?.sub;

    ctx.data(|data| -> HandlerResult {
        let model_id = match params.str("modelId") {
            Some(id) => id.to_string(),
            None => data
                .models
                .iter()
                .find(|m| m.kind == ModelKind::Llm && m.is_default)
                .map(|m| m.id.clone())
                .ok_or_else(|| MockError::validation(3001, "Knowledge base and model are required"))?,
        };
        let now = Utc::now();
        let session = ChatSession {
            id: new_id("sess"),
            title: NEW_SESSION_TITLE.to_string(),
            knowledge_base_id: kb_id,
            model_id,
            owner_id: owner,
            created_at: now,
            updated_at: now,
        };
        data.messages.insert(session.id.clone(), Vec::new());
        let view = session_view(data, &session)?;
        data.sessions.push(session);
        Ok(view)
    })
}

pub fn send_message(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let caller = ctx.caller()?.sub;
    let params = Params::new(params);
    let (Some(session_id), Some(question)) = (params.str("sessionId"), params.str("question")) else {
        return Err(MockError::validation(3001, "Session ID and question are required"));
    };
    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err(MockError::validation(
            3002,
            format!("Question must not exceed {} characters", MAX_QUESTION_CHARS),
        ));
    }

    ctx.data(|data| -> HandlerResult {
        let session = owned_session(data, session_id, &caller, "No permission to access this session")?;
        let kb_id = params
            .str("knowledgeBaseId")
            .unwrap_or(session.knowledge_base_id.as_str())
            .to_string();

        let references = find_references(data, &kb_id, question);
        let answer = compose_answer(question, &references);
        let now = Utc::now();

        let transcript = data.messages.entry(session_id.to_string()).or_default();
        let first_question = transcript.is_empty();
        transcript.push(ChatMessage {
            id: new_id("msg"),
            session_id: session_id.to_string(),
            role: "user".to_string(),
            content: question.to_string(),
            references: Vec::new(),
            created_at: now,
        });
        let message_id = new_id("msg");
        transcript.push(ChatMessage {
            id: message_id.clone(),
            session_id: session_id.to_string(),
            role: "assistant".to_string(),
            content: answer.clone(),
            references: references.clone(),
            created_at: now,
        });

        if let Some(session) = data.sessions.iter_mut().find(|s| s.id == session_id) {
            session.updated_at = now;
            if first_question {
                let mut title: String = question.chars().take(TITLE_CHARS).collect();
                if question.chars().count() > TITLE_CHARS {
                    title.push_str("...");
                }
                session.title = title;
            }
        }
        data.questions_today += 1;

        Ok(json!({
            "messageId": message_id,
            "answer": answer,
            "references": references,
        }))
    })
}

pub fn messages(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let caller = ctx.caller()?.sub;
    let session_id = require_session_id(&Params::new(params))?;

    ctx.data(|data| -> HandlerResult {
        owned_session(data, session_id, &caller, "No permission to access this session")?;
        let transcript = data.messages.get(session_id).map(Vec::as_slice).unwrap_or_default();
        to_payload(&transcript)
    })
}

pub fn delete_session(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let caller = ctx.caller()?.sub;
    let session_id = require_session_id(&Params::new(params))?;

    ctx.data(|data| -> HandlerResult {
        owned_session(data, session_id, &caller, "No permission to delete this session")?;
        data.sessions.retain(|s| s.id != session_id);
        data.messages.remove(session_id);
        Ok(json!({}))
    })
}

pub fn rename_session(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let caller = ctx.caller()?.sub;
    let params = Params::new(params);
    let (Some(session_id), Some(title)) = (params.str("sessionId"), params.str("title")) else {
        return Err(MockError::validation(3001, "Session ID and title are required"));
    };

    ctx.data(|data| -> HandlerResult {
        owned_session(data, session_id, &caller, "No permission to modify this session")?;
        let session = data
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(session_not_found)?;
        session.title = title.to_string();
        session.updated_at = Utc::now();
        Ok(json!({}))
    })
}

#[cfg(test)]
mod tests {
    use crate::api::codes;
    use crate::mock::MockRouter;
    use serde_json::json;

    fn login(router: &MockRouter, username: &str, password: &str) -> String {
        let envelope = router.resolve("/api/auth/login", &json!({"username": username, "password": password}));
        assert!(envelope.is_success(), "{}", envelope.message);
        envelope.payload["token"].as_str().unwrap().to_string()
    }

    fn new_session(router: &MockRouter, token: &str) -> String {
        let created = router.resolve_as(
            "/api/chat/session/create",
            &json!({"knowledgeBaseId": "kb_001"}),
            Some(token),
        );
        assert!(created.is_success());
        assert_eq!(created.payload["messageCount"], 0);
        created.payload["id"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_send_appends_question_then_answer() {
        let router = MockRouter::with_default_routes().unwrap();
        let token = login(&router, "user", "user123");
        let id = new_session(&router, &token);

        let reply = router.resolve_as(
            "/api/chat/message/send",
            &json!({"sessionId": id, "question": "How should Redis keys be named?"}),
            Some(&token),
        );
        assert!(reply.is_success());
        assert!(!reply.payload["references"].as_array().unwrap().is_empty());

        let transcript = router.resolve_as("/api/chat/session/messages", &json!({"sessionId": id}), Some(&token)).payload;
        let transcript = transcript.as_array().unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0]["role"], "user");
        assert_eq!(transcript[0]["content"], "How should Redis keys be named?");
        assert_eq!(transcript[1]["role"], "assistant");
    }

    #[test]
    fn test_first_question_titles_session() {
        let router = MockRouter::with_default_routes().unwrap();
        let token = login(&router, "user", "user123");
        let id = new_session(&router, &token);
        router.resolve_as(
            "/api/chat/message/send",
            &json!({"sessionId": id, "question": "What is the backup schedule for PostgreSQL?"}),
            Some(&token),
        );
        let sessions = router.resolve_as("/api/chat/sessions", &json!({}), Some(&token)).payload;
        assert_eq!(sessions[0]["title"], "What is the backup s...");
        assert_eq!(sessions[0]["messageCount"], 2);
    }

    #[test]
    fn test_send_validation_codes() {
        let router = MockRouter::with_default_routes().unwrap();
        let token = login(&router, "user", "user123");
        let id = new_session(&router, &token);

        let empty = router.resolve_as("/api/chat/message/send", &json!({"sessionId": id, "question": "  "}), Some(&token));
        assert_eq!(empty.status_code, 3001);

        let long = "x".repeat(1001);
        let too_long = router.resolve_as("/api/chat/message/send", &json!({"sessionId": id, "question": long}), Some(&token));
        assert_eq!(too_long.status_code, 3002);

        let exactly = "x".repeat(1000);
        let at_limit = router.resolve_as("/api/chat/message/send", &json!({"sessionId": id, "question": exactly}), Some(&token));
        assert!(at_limit.is_success());

        let unknown = router.resolve_as(
            "/api/chat/message/send",
            &json!({"sessionId": "sess_missing", "question": "hello"}),
            Some(&token),
        );
        assert_eq!(unknown.status_code, 3003);
    }

    #[test]
    fn test_rename_and_delete() {
        let router = MockRouter::with_default_routes().unwrap();
        let token = login(&router, "user", "user123");
        let id = new_session(&router, &token);

        let renamed = router.resolve_as("/api/chat/session/rename", &json!({"sessionId": id, "title": "Caching"}), Some(&token));
        assert!(renamed.is_success());
        let sessions = router.resolve_as("/api/chat/sessions", &json!({}), Some(&token)).payload;
        assert_eq!(sessions[0]["title"], "Caching");

        assert!(router.resolve_as("/api/chat/session/delete", &json!({"sessionId": id}), Some(&token)).is_success());
        let gone = router.resolve_as("/api/chat/session/messages", &json!({"sessionId": id}), Some(&token));
        assert_eq!(gone.status_code, 3003);
    }

    #[test]
    fn test_sessions_belong_to_their_creator() {
        let router = MockRouter::with_default_routes().unwrap();
        let admin = login(&router, "admin", "admin123");
        let user = login(&router, "user", "user123");
        let id = new_session(&router, &admin);
        router.resolve_as(
            "/api/chat/message/send",
            &json!({"sessionId": id, "question": "Who can read this?"}),
            Some(&admin),
        );

        let listed = router.resolve_as("/api/chat/sessions", &json!({}), Some(&user)).payload;
        assert!(listed.as_array().unwrap().is_empty());

        for endpoint in [
            "/api/chat/session/messages",
            "/api/chat/session/delete",
        ] {
            let refused = router.resolve_as(endpoint, &json!({"sessionId": id}), Some(&user));
            assert_eq!(refused.status_code, codes::FORBIDDEN, "{}", endpoint);
        }
        let rename = router.resolve_as(
            "/api/chat/session/rename",
            &json!({"sessionId": id, "title": "Mine now"}),
            Some(&user),
        );
        assert_eq!(rename.status_code, codes::FORBIDDEN);
        let send = router.resolve_as(
            "/api/chat/message/send",
            &json!({"sessionId": id, "question": "Appending to yours"}),
            Some(&user),
        );
        assert_eq!(send.status_code, codes::FORBIDDEN);

        let transcript = router.resolve_as("/api/chat/session/messages", &json!({"sessionId": id}), Some(&admin));
        assert_eq!(transcript.payload.as_array().unwrap().len(), 2);
        let sessions = router.resolve_as("/api/chat/sessions", &json!({}), Some(&admin)).payload;
        assert_eq!(sessions[0]["title"], "Who can read this?");
    }

    #[test]
    fn test_chat_sessions_require_login() {
        let router = MockRouter::with_default_routes().unwrap();
        let token = login(&router, "user", "user123");
        let id = new_session(&router, &token);

        for endpoint in ["/api/chat/sessions", "/api/chat/session/create", "/api/chat/session/messages"] {
            let anonymous = router.resolve(endpoint, &json!({"sessionId": id}));
            assert_eq!(anonymous.status_code, codes::AUTH_REQUIRED, "{}", endpoint);
        }
    }
}
