//! Chat sessions and question answering

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::empty;
use crate::api::endpoints;
use crate::api::result::ApiResult;
use crate::api::transport::RequestOptions;
use crate::api::Dispatcher;

pub const DEFAULT_SESSION_LIMIT: u64 = 20;
/// Knowledge base id meaning "search everything"
pub const ALL_KNOWLEDGE_BASES: &str = "all";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub knowledge_base_id: String,
    pub model_id: String,
    #[serde(default)]
    pub message_count: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Source passage an answer was drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub title: String,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub session_id: String,
    /// `user` or `assistant`
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageReply {
    #[serde(default)]
    pub message_id: Option<String>,
    pub answer: String,
    #[serde(default)]
    pub references: Vec<Reference>,
}

fn authed(body: Value) -> RequestOptions {
    RequestOptions::post(body).authenticated()
}

impl Dispatcher {
    pub async fn chat_knowledge_bases(&self) -> ApiResult<Vec<Value>> {
        self.call(endpoints::CHAT_KNOWLEDGE_BASES, authed(empty())).await
    }

    pub async fn chat_models(&self) -> ApiResult<Vec<Value>> {
        self.call(endpoints::CHAT_MODELS, authed(empty())).await
    }

    /// Most recently active sessions first
    pub async fn list_chat_sessions(&self, limit: Option<u64>) -> ApiResult<Vec<ChatSession>> {
        let body = json!({ "limit": limit.unwrap_or(DEFAULT_SESSION_LIMIT) });
        self.call(endpoints::CHAT_SESSIONS, authed(body)).await
    }

    /// Start an empty conversation; `None` knowledge base means all of them
    pub async fn create_session(&self, knowledge_base_id: Option<&str>, model_id: Option<&str>) -> ApiResult<ChatSession> {
        let mut body = json!({ "knowledgeBaseId": knowledge_base_id.unwrap_or(ALL_KNOWLEDGE_BASES) });
        if let Some(model_id) = model_id {
            body["modelId"] = json!(model_id);
        }
        self.call(endpoints::CHAT_SESSION_CREATE, authed(body)).await
    }

    pub async fn send_message(
        &self,
        session_id: &str,
        question: &str,
        knowledge_base_id: Option<&str>,
        model_id: Option<&str>,
    ) -> ApiResult<SendMessageReply> {
        let mut body = json!({ "sessionId": session_id, "question": question });
        if let Some(kb) = knowledge_base_id {
            body["knowledgeBaseId"] = json!(kb);
        }
        if let Some(model) = model_id {
            body["modelId"] = json!(model);
        }
        self.call(endpoints::CHAT_MESSAGE_SEND, authed(body)).await
    }

    /// Full transcript in the order it was written
    pub async fn get_messages(&self, session_id: &str) -> ApiResult<Vec<ChatMessage>> {
        let body = json!({ "sessionId": session_id });
        self.call(endpoints::CHAT_SESSION_MESSAGES, authed(body)).await
    }

    pub async fn delete_session(&self, session_id: &str) -> ApiResult<Value> {
        let body = json!({ "sessionId": session_id });
        self.invoke(endpoints::CHAT_SESSION_DELETE, authed(body)).await
    }

    pub async fn rename_session(&self, session_id: &str, title: &str) -> ApiResult<Value> {
        let body = json!({ "sessionId": session_id, "title": title });
        self.invoke(endpoints::CHAT_SESSION_RENAME, authed(body)).await
    }
}
