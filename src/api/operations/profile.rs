//! The signed-in user's own profile

use serde_json::{json, Value};

use super::{empty, merge};
use crate::api::endpoints;
use crate::api::result::ApiResult;
use crate::api::transport::{MultipartPayload, RequestOptions};
use crate::api::Dispatcher;

pub const DEFAULT_RECORD_LIMIT: u64 = 10;

fn authed(body: Value) -> RequestOptions {
    RequestOptions::post(body).authenticated()
}

impl Dispatcher {
    pub async fn profile(&self) -> ApiResult<Value> {
        self.invoke(endpoints::USER_PROFILE, authed(empty())).await
    }

    /// `changes` must include `name` and `email`
    pub async fn update_profile(&self, changes: Value) -> ApiResult<Value> {
        self.invoke(endpoints::USER_PROFILE_UPDATE, authed(merge(empty(), changes)))
            .await
    }

    pub async fn upload_avatar(&self, file_name: &str, mime: Option<&str>, bytes: Vec<u8>) -> ApiResult<Value> {
        let form = MultipartPayload::new().file("avatar", file_name, mime, bytes);
        self.invoke(
            endpoints::USER_AVATAR_UPLOAD,
            RequestOptions::multipart(form).authenticated(),
        )
        .await
    }

    pub async fn departments(&self) -> ApiResult<Vec<Value>> {
        self.call(endpoints::USER_DEPARTMENTS, authed(empty())).await
    }

    /// Newest first
    pub async fn login_records(&self, limit: Option<u64>) -> ApiResult<Vec<Value>> {
        let body = json!({ "limit": limit.unwrap_or(DEFAULT_RECORD_LIMIT) });
        self.call(endpoints::USER_LOGIN_RECORDS, authed(body)).await
    }

    pub async fn change_password(&self, current_password: &str, new_password: &str, confirm_password: &str) -> ApiResult<Value> {
        let body = json!({
            "currentPassword": current_password,
            "newPassword": new_password,
            "confirmPassword": confirm_password,
        });
        self.invoke(endpoints::USER_CHANGE_PASSWORD, authed(body)).await
    }
}
