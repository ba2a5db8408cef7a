use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use super::check_new_password;
use crate::mock::params::Params;
use crate::mock::router::MockContext;
use crate::mock::state::{new_id, AccountStatus, LoginRecord, HASH_COST};
use crate::mock::token::{issue_token, Claims};
use crate::mock::{HandlerResult, MockError};

pub fn login(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let (Some(username), Some(password)) = (params.str("username"), params.secret("password")) else {
        return Err(MockError::validation(1001, "Username and password are required"));
    };

    ctx.data(|data| -> HandlerResult {
        let account = data
            .accounts
            .iter_mut()
            .find(|a| a.username == username)
            .filter(|a| a.verify_password(password))
            .ok_or_else(|| MockError::validation(1002, "Invalid username or password"))?;

        if account.status == AccountStatus::Disabled {
            return Err(MockError::validation(
                1003,
                "Account is disabled, please contact an administrator",
            ));
        }

        let now = Utc::now();
        account.last_login_at = Some(now);
        let token = issue_token(&Claims::new(&account.id, &account.username, account.role))?;
        let user = account.profile();

        data.login_records.push(LoginRecord {
            id: new_id("login"),
            account_id: user.id.clone(),
            login_time: now,
            ip: "127.0.0.1".to_string(),
            device: "ragdesk client".to_string(),
            location: "Local".to_string(),
            status: "success".to_string(),
        });

        info!(username = %user.username, role = %user.role, "Mock login");
        Ok(json!({ "token": token, "user": user }))
    })
}

pub fn logout(_ctx: &MockContext<'_>, _params: &Value) -> HandlerResult {
    Ok(json!({}))
}

pub fn change_password(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let (Some(old), Some(new)) = (params.secret("oldPassword"), params.secret("newPassword")) else {
        return Err(MockError::validation(1001, "Old and new passwords are required"));
    };
    check_new_password(new, params.secret("confirmPassword"))?;
    replace_password(ctx, old, new, "Old password is incorrect")
}

pub fn reset_password(_ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    if params.str("account").is_none() || params.str("code").is_none() || params.secret("newPassword").is_none() {
        return Err(MockError::validation(
            1001,
            "Account, verification code and new password are required",
        ));
    }
    Err(MockError::validation(
        1005,
        "Password reset is not available, please contact an administrator",
    ))
}

/// Verify `old` for the calling account and store a hash of `new`
pub(super) fn replace_password(
    ctx: &MockContext<'_>,
    old: &str,
    new: &str,
    wrong_old_message: &str,
) -> HandlerResult {
    let caller = ctx.caller()?;
    let hash = bcrypt::hash(new, HASH_COST)?;

    ctx.data(|data| -> HandlerResult {
        let account = data
            .account_mut(&caller.sub)
            .ok_or_else(|| MockError::Unauthenticated("Account no longer exists".to_string()))?;
        if !account.verify_password(old) {
            return Err(MockError::validation(1004, wrong_old_message));
        }
        account.password_hash = hash;
        info!(username = %account.username, "Mock password changed");
        Ok(json!({}))
    })
}
