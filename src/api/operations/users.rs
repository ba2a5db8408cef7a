//! Administrator user management

use serde_json::{json, Value};

use super::{empty, merge, with_id, ExportTicket, Page, PageQuery};
use crate::api::endpoints;
use crate::api::result::ApiResult;
use crate::api::transport::RequestOptions;
use crate::api::Dispatcher;

pub const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub keyword: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

fn authed(body: Value) -> RequestOptions {
    RequestOptions::post(body).authenticated()
}

impl Dispatcher {
    pub async fn user_stats(&self) -> ApiResult<Value> {
        self.invoke(endpoints::ADMIN_USERS_STATS, authed(empty())).await
    }

    pub async fn list_users(&self, filter: &UserFilter, page: Option<PageQuery>) -> ApiResult<Page<Value>> {
        let page = page.unwrap_or(PageQuery::first(DEFAULT_PAGE_SIZE));
        let mut body = json!({ "page": page.page, "pageSize": page.page_size });
        for (key, value) in [
            ("keyword", &filter.keyword),
            ("role", &filter.role),
            ("status", &filter.status),
        ] {
            if let Some(value) = value {
                body[key] = json!(value);
            }
        }
        self.call(endpoints::ADMIN_USERS_LIST, authed(body)).await
    }

    /// `fields` carries `username`, `password`, `name`, `email`, `role` and optional `phone`, `department`
    pub async fn create_user(&self, fields: Value) -> ApiResult<Value> {
        self.invoke(endpoints::ADMIN_USERS_CREATE, authed(merge(empty(), fields)))
            .await
    }

    pub async fn update_user(&self, id: &str, changes: Value) -> ApiResult<Value> {
        let body = with_id(id, changes);
        self.invoke(endpoints::ADMIN_USERS_UPDATE, authed(body)).await
    }

    pub async fn delete_user(&self, user_id: &str) -> ApiResult<Value> {
        let body = json!({ "userId": user_id });
        self.invoke(endpoints::ADMIN_USERS_DELETE, authed(body)).await
    }

    pub async fn toggle_user_status(&self, user_id: &str, status: &str) -> ApiResult<Value> {
        let body = json!({ "userId": user_id, "status": status });
        self.invoke(endpoints::ADMIN_USERS_TOGGLE_STATUS, authed(body)).await
    }

    /// Returns the generated password under `newPassword`
    pub async fn reset_user_password(&self, user_id: &str) -> ApiResult<Value> {
        let body = json!({ "userId": user_id });
        self.invoke(endpoints::ADMIN_USERS_RESET_PASSWORD, authed(body)).await
    }

    pub async fn export_users(&self, filters: Value) -> ApiResult<ExportTicket> {
        self.call(endpoints::ADMIN_USERS_EXPORT, authed(merge(empty(), filters)))
            .await
    }
}
