//! Login, logout and credential changes

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::empty;
use crate::api::endpoints;
use crate::api::result::{ApiError, ApiResult, ErrorKind};
use crate::api::transport::RequestOptions;
use crate::api::Dispatcher;
use crate::session::UserProfile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

impl Dispatcher {
    /// Log in and persist the session.
    ///
    /// With `remember` the session survives restarts, otherwise it lives in
    /// the ephemeral scope. A successful login re-arms the login redirect.
    pub async fn authenticate(&self, username: &str, password: &str, remember: bool) -> ApiResult<LoginResponse> {
        let body = json!({ "username": username, "password": password });
        let login: LoginResponse = self.call(endpoints::AUTH_LOGIN, RequestOptions::post(body)).await?;

        self.session()
            .save(&login.token, remember, &login.user)
            .await
            .map_err(|e| {
                warn!("Could not persist session: {}", e);
                ApiError::new(ErrorKind::Business, "Could not save login state")
            })?;
        self.redirect().reset();
        info!(username = %login.user.username, role = %login.user.role, remember, "Logged in");
        Ok(login)
    }

    /// Log out on the backend and drop the local session whatever it answers
    pub async fn end_session(&self) -> ApiResult<()> {
        let result = self
            .invoke(endpoints::AUTH_LOGOUT, RequestOptions::post(empty()).authenticated())
            .await;
        if let Err(e) = self.session().clear().await {
            warn!("Failed to clear session on logout: {}", e);
        }
        info!("Logged out");
        result.map(|_| ())
    }

    pub async fn change_credential(&self, old_password: &str, new_password: &str, confirm_password: &str) -> ApiResult<Value> {
        let body = json!({
            "oldPassword": old_password,
            "newPassword": new_password,
            "confirmPassword": confirm_password,
        });
        self.invoke(
            endpoints::AUTH_CHANGE_PASSWORD,
            RequestOptions::post(body).authenticated(),
        )
        .await
    }

    pub async fn reset_credential(&self, account: &str, code: &str, new_password: &str) -> ApiResult<Value> {
        let body = json!({ "account": account, "code": code, "newPassword": new_password });
        self.invoke(endpoints::AUTH_RESET_PASSWORD, RequestOptions::post(body))
            .await
    }
}
