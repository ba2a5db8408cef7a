//! Logical operation paths, shared by the live operations and the mock registry

// auth
pub const AUTH_LOGIN: &str = "/api/auth/login";
pub const AUTH_LOGOUT: &str = "/api/auth/logout";
pub const AUTH_CHANGE_PASSWORD: &str = "/api/auth/change-password";
pub const AUTH_RESET_PASSWORD: &str = "/api/auth/reset-password";

// knowledge bases and documents
pub const KB_STATS: &str = "/api/knowledge-base/stats";
pub const KB_LIST: &str = "/api/knowledge-base/list";
pub const KB_DETAIL: &str = "/api/knowledge-base/detail";
pub const KB_CREATE: &str = "/api/knowledge-base/create";
pub const KB_UPDATE: &str = "/api/knowledge-base/update";
pub const KB_DELETE: &str = "/api/knowledge-base/delete";
pub const KB_DOCUMENTS: &str = "/api/knowledge-base/documents";
pub const KB_UPLOAD_DOCUMENT: &str = "/api/knowledge-base/upload-document";
pub const KB_DELETE_DOCUMENT: &str = "/api/knowledge-base/delete-document";
pub const KB_DOCUMENT_PREVIEW: &str = "/api/knowledge-base/document-preview";
pub const KB_EXPORT_DOCUMENTS: &str = "/api/knowledge-base/export-documents";
pub const KB_VECTOR_MODELS: &str = "/api/knowledge-base/vector-models";

// chat
pub const CHAT_KNOWLEDGE_BASES: &str = "/api/chat/knowledge-bases";
pub const CHAT_MODELS: &str = "/api/chat/models";
pub const CHAT_SESSIONS: &str = "/api/chat/sessions";
pub const CHAT_SESSION_CREATE: &str = "/api/chat/session/create";
pub const CHAT_MESSAGE_SEND: &str = "/api/chat/message/send";
pub const CHAT_SESSION_MESSAGES: &str = "/api/chat/session/messages";
pub const CHAT_SESSION_DELETE: &str = "/api/chat/session/delete";
pub const CHAT_SESSION_RENAME: &str = "/api/chat/session/rename";

// search
pub const SEARCH_DOCUMENTS: &str = "/api/search/documents";
pub const SEARCH_HOT_KEYWORDS: &str = "/api/search/hot-keywords";
pub const SEARCH_DOC_TYPES: &str = "/api/search/doc-types";
pub const SEARCH_EXPORT: &str = "/api/search/export";

// models
pub const MODELS_STATS: &str = "/api/models/stats";
pub const MODELS_LIST: &str = "/api/models/list";
pub const MODELS_DETAIL: &str = "/api/models/detail";
pub const MODELS_CREATE: &str = "/api/models/create";
pub const MODELS_UPDATE: &str = "/api/models/update";
pub const MODELS_DELETE: &str = "/api/models/delete";
pub const MODELS_SET_DEFAULT: &str = "/api/models/set-default";
pub const MODELS_TEST: &str = "/api/models/test";
pub const MODELS_HEALTH_CHECK: &str = "/api/models/health-check";
pub const MODELS_UPDATE_STATUS: &str = "/api/models/update-status";

// user administration
pub const ADMIN_USERS_STATS: &str = "/api/admin/users/stats";
pub const ADMIN_USERS_LIST: &str = "/api/admin/users/list";
pub const ADMIN_USERS_CREATE: &str = "/api/admin/users/create";
pub const ADMIN_USERS_UPDATE: &str = "/api/admin/users/update";
pub const ADMIN_USERS_DELETE: &str = "/api/admin/users/delete";
pub const ADMIN_USERS_TOGGLE_STATUS: &str = "/api/admin/users/toggle-status";
pub const ADMIN_USERS_RESET_PASSWORD: &str = "/api/admin/users/reset-password";
pub const ADMIN_USERS_EXPORT: &str = "/api/admin/users/export";

// own profile
pub const USER_PROFILE: &str = "/api/user/profile";
pub const USER_PROFILE_UPDATE: &str = "/api/user/profile/update";
pub const USER_AVATAR_UPLOAD: &str = "/api/user/avatar/upload";
pub const USER_DEPARTMENTS: &str = "/api/user/departments";
pub const USER_LOGIN_RECORDS: &str = "/api/user/login-records";
pub const USER_CHANGE_PASSWORD: &str = "/api/user/change-password";

// dashboard
pub const DASHBOARD_STATS: &str = "/api/dashboard/stats";
pub const DASHBOARD_SYSTEM_STATUS: &str = "/api/dashboard/system-status";
pub const DASHBOARD_REFRESH_STATUS: &str = "/api/dashboard/refresh-status";

/// Strip query string, fragment and trailing slash; an empty path is `/`
pub fn normalize_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    match path[..end].trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}
