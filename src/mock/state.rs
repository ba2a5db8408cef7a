//! In-memory fixture data served by the mock backend

use crate::error::Result;
use crate::session::{Role, UserProfile};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// bcrypt cost for fixture passwords; the mock favours speed over strength
pub const HASH_COST: u32 = 4;

pub fn new_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &uuid[..12])
}

/// Human-readable file size, e.g. `2.3 MB`
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Disabled,
}

impl AccountStatus {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "active" => Some(AccountStatus::Active),
            "disabled" => Some(AccountStatus::Disabled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub email: String,
    pub phone: String,
    pub department: Option<String>,
    pub avatar: Option<String>,
    pub status: AccountStatus,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            name: self.name.clone(),
            role: self.role,
            email: self.email.clone(),
            phone: self.phone.clone(),
            department: self.department.clone(),
            avatar: self.avatar.clone(),
        }
    }

    pub fn verify_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBase {
    pub id: String,
    pub name: String,
    pub code: String,
    pub description: String,
    pub icon: String,
    pub icon_color: String,
    pub visible: bool,
    pub status: String,
    pub progress: u8,
    pub viewers: u64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub knowledge_base_id: String,
    pub name: String,
    pub file_name: String,
    #[serde(skip)]
    pub size_bytes: u64,
    pub file_type: String,
    pub page_count: u32,
    pub chunk_count: u32,
    pub status: String,
    pub tags: Vec<String>,
    pub uploaded_by: String,
    pub upload_time: DateTime<Utc>,
    #[serde(skip)]
    pub excerpt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Llm,
    Embedding,
}

impl ModelKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "llm" => Some(ModelKind::Llm),
            "embedding" => Some(ModelKind::Embedding),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Online,
    Offline,
    Error,
}

impl ModelStatus {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "online" => Some(ModelStatus::Online),
            "offline" => Some(ModelStatus::Offline),
            "error" => Some(ModelStatus::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ModelKind,
    pub description: String,
    pub provider: String,
    pub endpoint: String,
    pub status: ModelStatus,
    pub is_default: bool,
    pub model_size: Option<String>,
    pub context_length: Option<u32>,
    pub gpu_memory: Option<String>,
    /// Last measured latency in milliseconds
    pub response_time: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub knowledge_base_id: String,
    pub model_id: String,
    #[serde(skip)]
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub title: String,
    pub page: u32,
    pub content: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub session_id: String,
    pub role: String,
    pub content: String,
    pub references: Vec<Reference>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRecord {
    pub id: String,
    #[serde(skip)]
    pub account_id: String,
    pub login_time: DateTime<Utc>,
    pub ip: String,
    pub device: String,
    pub location: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HotKeyword {
    pub keyword: String,
    pub count: u64,
}

/// Everything the simulated backend remembers between calls
#[derive(Debug, Default)]
pub struct MockData {
    pub accounts: Vec<Account>,
    pub knowledge_bases: Vec<KnowledgeBase>,
    pub documents: Vec<Document>,
    pub models: Vec<Model>,
    pub sessions: Vec<ChatSession>,
    pub messages: HashMap<String, Vec<ChatMessage>>,
    pub login_records: Vec<LoginRecord>,
    pub hot_keywords: Vec<HotKeyword>,
    pub questions_today: u64,
    pub searches_today: u64,
}

impl MockData {
    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn account_mut(&mut self, id: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == id)
    }

    pub fn knowledge_base(&self, id: &str) -> Option<&KnowledgeBase> {
        self.knowledge_bases.iter().find(|kb| kb.id == id)
    }

    pub fn model(&self, id: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn session(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn documents_in<'a>(&'a self, kb_id: &'a str) -> impl Iterator<Item = &'a Document> + 'a {
        self.documents
            .iter()
            .filter(move |d| d.knowledge_base_id == kb_id)
    }

    /// Fixture set used by the default router
    pub fn seeded() -> Result<Self> {
        let now = Utc::now();
        let mut data = MockData {
            accounts: seed_accounts(now)?,
            knowledge_bases: seed_knowledge_bases(now),
            documents: seed_documents(now),
            models: seed_models(now),
            hot_keywords: seed_hot_keywords(),
            questions_today: 15,
            searches_today: 42,
            ..Default::default()
        };
        data.login_records.push(LoginRecord {
            id: new_id("login"),
            account_id: "user_001".to_string(),
            login_time: now - Duration::days(1),
            ip: "192.168.1.20".to_string(),
            device: "Chrome on Windows".to_string(),
            location: "Intranet".to_string(),
            status: "success".to_string(),
        });
        Ok(data)
    }
}

/// Shared, lock-protected fixture data
#[derive(Debug)]
pub struct MockState {
    data: Mutex<MockData>,
}

impl MockState {
    pub fn new(data: MockData) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }

    pub fn seeded() -> Result<Self> {
        Ok(Self::new(MockData::seeded()?))
    }

    /// Run `f` with exclusive access to the data.
    ///
    /// A panic inside an earlier handler does not lock the fixture forever.
    pub fn with<R>(&self, f: impl FnOnce(&mut MockData) -> R) -> R {
        let mut guard = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

fn seed_accounts(now: DateTime<Utc>) -> Result<Vec<Account>> {
    let fixtures = [
        ("user_001", "admin", "admin123", "Zhang San", Role::Admin, "admin@company.com", "13800138000", "Engineering", AccountStatus::Active),
        ("user_002", "user", "user123", "Li Si", Role::User, "user@company.com", "13900139000", "Product", AccountStatus::Active),
        ("user_003", "wangwu", "wangwu123", "Wang Wu", Role::User, "wangwu@company.com", "13700137000", "Operations", AccountStatus::Disabled),
    ];

    fixtures
        .into_iter()
        .enumerate()
        .map(|(i, (id, username, password, name, role, email, phone, department, status))| -> Result<Account> {
            Ok(Account {
                id: id.to_string(),
                username: username.to_string(),
                name: name.to_string(),
                role,
                email: email.to_string(),
                phone: phone.to_string(),
                department: Some(department.to_string()),
                avatar: None,
                status,
                password_hash: bcrypt::hash(password, HASH_COST)?,
                created_at: now - Duration::days(90 - i as i64 * 10),
                last_login_at: None,
            })
        })
        .collect()
}

fn seed_knowledge_bases(now: DateTime<Utc>) -> Vec<KnowledgeBase> {
    let fixtures = [
        ("kb_001", "Engineering Standards", "tech-standards", "Coding conventions, API design and architecture guides", "icon-code", "linear-gradient(135deg, #667eea 0%, #764ba2 100%)", "active", 100, 1200, 2),
        ("kb_002", "Product Manual", "product-manual", "Feature overviews, user guides and FAQs", "icon-book", "linear-gradient(135deg, #11998e 0%, #38ef7d 100%)", "active", 100, 892, 24),
        ("kb_003", "Operations Docs", "ops-docs", "Deployment, monitoring and incident handling", "icon-gear", "linear-gradient(135deg, #f093fb 0%, #f5576c 100%)", "processing", 85, 456, 72),
    ];

    fixtures
        .into_iter()
        .map(|(id, name, code, description, icon, color, status, progress, viewers, hours)| KnowledgeBase {
            id: id.to_string(),
            name: name.to_string(),
            code: code.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            icon_color: color.to_string(),
            visible: true,
            status: status.to_string(),
            progress,
            viewers,
            created_by: "user_001".to_string(),
            created_at: now - Duration::days(120),
            updated_at: now - Duration::hours(hours),
        })
        .collect()
}

fn seed_documents(now: DateTime<Utc>) -> Vec<Document> {
    let fixtures = [
        ("doc_001", "kb_001", "Redis Caching Guidelines", "pdf", 2_400_000, 18, "Key naming, TTL policy and eviction settings for Redis clusters."),
        ("doc_002", "kb_001", "API Design Standards", "md", 86_000, 9, "REST resource naming, pagination parameters and response envelopes."),
        ("doc_003", "kb_001", "Rust Coding Conventions", "md", 64_000, 7, "Error handling with Result, module layout and naming rules."),
        ("doc_004", "kb_001", "Connection Pool Sizing", "docx", 310_000, 12, "Sizing Redis and PostgreSQL connection pools for the API tier."),
        ("doc_005", "kb_001", "Database Schema Review Checklist", "pdf", 540_000, 6, "Index coverage, migrations and naming checks before release."),
        ("doc_006", "kb_002", "Getting Started Guide", "pdf", 1_900_000, 24, "Creating a knowledge base, uploading documents and asking questions."),
        ("doc_007", "kb_002", "Knowledge Base FAQ", "docx", 120_000, 5, "Answers to common questions about permissions and document formats."),
        ("doc_008", "kb_002", "Session Cache Internals", "pdf", 980_000, 14, "How chat sessions are cached in Redis and expired after inactivity."),
        ("doc_009", "kb_002", "Release Notes 2.4", "md", 22_000, 3, "Hybrid search, model health checks and user export."),
        ("doc_010", "kb_003", "Redis Failover Runbook", "md", 45_000, 8, "Promoting a replica, verifying sentinel quorum and restoring writes."),
        ("doc_011", "kb_003", "Monitoring and Alerting Playbook", "pdf", 760_000, 20, "Dashboards, alert thresholds and on-call escalation."),
        ("doc_012", "kb_003", "Backup and Restore Procedures", "docx", 410_000, 11, "Nightly snapshots of PostgreSQL and Redis with restore drills."),
        ("doc_013", "kb_003", "Kubernetes Deployment Guide", "md", 98_000, 10, "Helm values, rolling updates and resource limits."),
        ("doc_014", "kb_003", "Redis Memory Tuning", "txt", 18_000, 2, "maxmemory policies, fragmentation and big key detection."),
    ];

    fixtures
        .into_iter()
        .enumerate()
        .map(|(i, (id, kb, name, file_type, size, pages, excerpt))| Document {
            id: id.to_string(),
            knowledge_base_id: kb.to_string(),
            name: name.to_string(),
            file_name: format!("{}.{}", name.to_lowercase().replace(' ', "-"), file_type),
            size_bytes: size,
            file_type: file_type.to_string(),
            page_count: pages,
            chunk_count: pages * 4,
            status: "completed".to_string(),
            tags: Vec::new(),
            uploaded_by: "user_001".to_string(),
            upload_time: now - Duration::days(i as i64 + 1),
            excerpt: excerpt.to_string(),
        })
        .collect()
}

fn seed_models(now: DateTime<Utc>) -> Vec<Model> {
    let fixtures = [
        ("model_001", "Qwen2.5-7B-Instruct", ModelKind::Llm, "General purpose chat model", "vllm", ModelStatus::Online, true, Some(32768), Some(820)),
        ("model_002", "GLM-4-9B-Chat", ModelKind::Llm, "Bilingual chat model", "vllm", ModelStatus::Online, false, Some(8192), Some(1150)),
        ("model_003", "Llama-3.1-8B-Instruct", ModelKind::Llm, "English-first chat model", "ollama", ModelStatus::Offline, false, Some(8192), None),
        ("model_004", "bge-large-zh-v1.5", ModelKind::Embedding, "Dense retrieval embeddings", "local", ModelStatus::Online, true, Some(512), Some(45)),
        ("model_005", "m3e-base", ModelKind::Embedding, "Lightweight embeddings", "local", ModelStatus::Error, false, Some(512), None),
    ];

    fixtures
        .into_iter()
        .enumerate()
        .map(|(i, (id, name, kind, description, provider, status, is_default, context, latency))| Model {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            description: description.to_string(),
            provider: provider.to_string(),
            endpoint: format!("http://localhost:{}/v1", 8001 + i),
            status,
            is_default,
            model_size: None,
            context_length: context,
            gpu_memory: None,
            response_time: latency,
            created_at: now - Duration::days(60),
            updated_at: now - Duration::days(i as i64),
        })
        .collect()
}

fn seed_hot_keywords() -> Vec<HotKeyword> {
    [("redis", 128), ("deployment", 96), ("api design", 75), ("backup", 41), ("monitoring", 38)]
        .into_iter()
        .map(|(keyword, count)| HotKeyword {
            keyword: keyword.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(2_400_000), "2.3 MB");
    }

    #[test]
    fn test_seeded_accounts_verify() {
        let data = MockData::seeded().unwrap();
        let admin = data.account("user_001").unwrap();
        assert!(admin.verify_password("admin123"));
        assert!(!admin.verify_password("wrong"));
        assert_eq!(admin.profile().role, Role::Admin);
    }

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(new_id("sess"), new_id("sess"));
        assert!(new_id("kb").starts_with("kb_"));
    }
}
