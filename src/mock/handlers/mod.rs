//! Built-in mock handlers, one module per operation group

pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod knowledge;
pub mod models;
pub mod profile;
pub mod search;
pub mod users;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{json, Value};
use std::sync::LazyLock;

use super::router::{MockRouter, Predicate};
use super::{HandlerResult, MockError};
use crate::api::endpoints::*;

pub const MIN_PASSWORD_LEN: usize = 6;
const EXPORT_TTL_SECS: u64 = 3600;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("valid phone regex"));

/// Register every built-in route.
///
/// Exact routes go first, more specific before general; the single prefix
/// route for model updates comes after `update-status`.
pub fn register_defaults(router: &mut MockRouter) {
    router
        // auth
        .register(Predicate::exact(AUTH_LOGIN), auth::login)
        .register(Predicate::exact(AUTH_LOGOUT), auth::logout)
        .register(Predicate::exact(AUTH_CHANGE_PASSWORD), auth::change_password)
        .register(Predicate::exact(AUTH_RESET_PASSWORD), auth::reset_password)
        // knowledge bases
        .register(Predicate::exact(KB_STATS), knowledge::stats)
        .register(Predicate::exact(KB_LIST), knowledge::list)
        .register(Predicate::exact(KB_DETAIL), knowledge::detail)
        .register(Predicate::exact(KB_CREATE), knowledge::create)
        .register(Predicate::exact(KB_UPDATE), knowledge::update)
        .register(Predicate::exact(KB_DELETE), knowledge::delete)
        .register(Predicate::exact(KB_DOCUMENTS), knowledge::documents)
        .register(Predicate::exact(KB_UPLOAD_DOCUMENT), knowledge::upload_document)
        .register(Predicate::exact(KB_DELETE_DOCUMENT), knowledge::delete_document)
        .register(Predicate::exact(KB_DOCUMENT_PREVIEW), knowledge::preview_document)
        .register(Predicate::exact(KB_EXPORT_DOCUMENTS), knowledge::export_documents)
        .register(Predicate::exact(KB_VECTOR_MODELS), knowledge::vector_models)
        // chat
        .register(Predicate::exact(CHAT_KNOWLEDGE_BASES), chat::knowledge_bases)
        .register(Predicate::exact(CHAT_MODELS), chat::models)
        .register(Predicate::exact(CHAT_SESSIONS), chat::sessions)
        .register(Predicate::exact(CHAT_SESSION_CREATE), chat::create_session)
        .register(Predicate::exact(CHAT_MESSAGE_SEND), chat::send_message)
        .register(Predicate::exact(CHAT_SESSION_MESSAGES), chat::messages)
        .register(Predicate::exact(CHAT_SESSION_DELETE), chat::delete_session)
        .register(Predicate::exact(CHAT_SESSION_RENAME), chat::rename_session)
        // search
        .register(Predicate::exact(SEARCH_DOCUMENTS), search::documents)
        .register(Predicate::exact(SEARCH_HOT_KEYWORDS), search::hot_keywords)
        .register(Predicate::exact(SEARCH_DOC_TYPES), search::doc_types)
        .register(Predicate::exact(SEARCH_EXPORT), search::export)
        // models
        .register(Predicate::exact(MODELS_STATS), models::stats)
        .register(Predicate::exact(MODELS_LIST), models::list)
        .register(Predicate::exact(MODELS_DETAIL), models::detail)
        .register(Predicate::exact(MODELS_CREATE), models::create)
        .register(Predicate::exact(MODELS_UPDATE_STATUS), models::update_status)
        .register(Predicate::prefix(MODELS_UPDATE), models::update)
        .register(Predicate::exact(MODELS_DELETE), models::delete)
        .register(Predicate::exact(MODELS_SET_DEFAULT), models::set_default)
        .register(Predicate::exact(MODELS_TEST), models::test_connection)
        .register(Predicate::exact(MODELS_HEALTH_CHECK), models::health_check)
        // user administration
        .register(Predicate::exact(ADMIN_USERS_STATS), users::stats)
        .register(Predicate::exact(ADMIN_USERS_LIST), users::list)
        .register(Predicate::exact(ADMIN_USERS_CREATE), users::create)
        .register(Predicate::exact(ADMIN_USERS_UPDATE), users::update)
        .register(Predicate::exact(ADMIN_USERS_DELETE), users::delete)
        .register(Predicate::exact(ADMIN_USERS_TOGGLE_STATUS), users::toggle_status)
        .register(Predicate::exact(ADMIN_USERS_RESET_PASSWORD), users::reset_password)
        .register(Predicate::exact(ADMIN_USERS_EXPORT), users::export)
        // own profile
        .register(Predicate::exact(USER_PROFILE), profile::profile)
        .register(Predicate::exact(USER_PROFILE_UPDATE), profile::update)
        .register(Predicate::exact(USER_AVATAR_UPLOAD), profile::upload_avatar)
        .register(Predicate::exact(USER_DEPARTMENTS), profile::departments)
        .register(Predicate::exact(USER_LOGIN_RECORDS), profile::login_records)
        .register(Predicate::exact(USER_CHANGE_PASSWORD), profile::change_password)
        // dashboard
        .register(Predicate::exact(DASHBOARD_STATS), dashboard::stats)
        .register(Predicate::exact(DASHBOARD_SYSTEM_STATUS), dashboard::system_status)
        .register(Predicate::exact(DASHBOARD_REFRESH_STATUS), dashboard::system_status);
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Check a new password against its confirmation and the length floor
pub fn check_new_password(new: &str, confirm: Option<&str>) -> Result<(), MockError> {
    if confirm.is_some_and(|c| c != new) {
        return Err(MockError::validation(1001, "The two passwords do not match"));
    }
    if new.chars().count() < MIN_PASSWORD_LEN {
        return Err(MockError::validation(
            1001,
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}

/// `{downloadUrl, fileName, expiresIn}` for a generated export
pub fn export_ticket(stem: &str, extension: &str) -> HandlerResult {
    let file_name = format!("{}-{}.{}", stem, Utc::now().format("%Y%m%d%H%M%S"), extension);
    Ok(json!({
        "downloadUrl": format!("/downloads/{}", file_name),
        "fileName": file_name,
        "expiresIn": EXPORT_TTL_SECS,
    }))
}

/// Merge extra fields into a serialized record
pub fn with_fields(mut record: Value, extra: Value) -> Value {
    if let (Some(target), Value::Object(fields)) = (record.as_object_mut(), extra) {
        target.extend(fields);
    }
    record
}

pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_routes_have_no_shadowing() {
        let router = MockRouter::with_default_routes().unwrap();
        assert!(router.shadowed_routes().is_empty(), "{:?}", router.shadowed_routes());
        assert!(router.route_count() > 50);
    }

    #[test]
    fn test_contact_validation() {
        assert!(is_valid_email("admin@company.com"));
        assert!(!is_valid_email("admin@company"));
        assert!(is_valid_phone("13800138000"));
        assert!(!is_valid_phone("12800138000"));
        assert!(!is_valid_phone("1380013800"));
    }

    #[test]
    fn test_password_rules() {
        assert!(check_new_password("secret1", Some("secret1")).is_ok());
        assert!(check_new_password("secret1", None).is_ok());
        assert_eq!(
            check_new_password("abc", None),
            Err(MockError::validation(1001, "Password must be at least 6 characters"))
        );
        assert!(check_new_password("secret1", Some("secret2")).is_err());
    }

    #[test]
    fn test_export_ticket_shape() {
        let ticket = export_ticket("users", "xlsx").unwrap();
        assert_eq!(ticket["expiresIn"], 3600);
        let name = ticket["fileName"].as_str().unwrap();
        assert!(name.starts_with("users-") && name.ends_with(".xlsx"));
        assert_eq!(ticket["downloadUrl"], format!("/downloads/{}", name));
    }
}
