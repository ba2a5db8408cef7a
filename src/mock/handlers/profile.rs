use serde_json::{json, Value};

use super::auth::replace_password;
use super::{check_new_password, is_valid_email, is_valid_phone, timestamp, with_fields};
use crate::mock::params::Params;
use crate::mock::router::MockContext;
use crate::mock::state::{Account, LoginRecord};
use crate::mock::{to_payload, HandlerResult, MockError};

const DEFAULT_RECORD_LIMIT: u64 = 10;
const MAX_RECORD_LIMIT: u64 = 50;
const MAX_BIO_CHARS: usize = 200;
const AVATAR_FIELD: &str = "avatar";
const DEPARTMENTS: [&str; 6] = ["Engineering", "Product", "Operations", "Marketing", "Sales", "Human Resources"];

fn missing_account() -> MockError {
    MockError::Unauthenticated("Account no longer exists".to_string())
}

fn profile_view(account: &Account) -> HandlerResult {
    Ok(with_fields(
        to_payload(&account.profile())?,
        json!({
            "status": account.status,
            "createdAt": timestamp(account.created_at),
            "lastLoginAt": account.last_login_at.map(timestamp),
        }),
    ))
}

pub fn profile(ctx: &MockContext<'_>, _params: &Value) -> HandlerResult {
    let caller = ctx.caller()?;
    ctx.data(|data| -> HandlerResult {
        let account = data.account(&caller.sub).ok_or_else(missing_account)?;
        profile_view(account)
    })
}

pub fn update(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let (Some(name), Some(email)) = (params.str("name"), params.str("email")) else {
        return Err(MockError::validation(1001, "Name and email are required"));
    };
    if !is_valid_email(email) {
        return Err(MockError::validation(1001, "Invalid email format"));
    }
    if params.str("phone").is_some_and(|p| !is_valid_phone(p)) {
        return Err(MockError::validation(1001, "Invalid phone number format"));
    }
    if params.str("bio").is_some_and(|b| b.chars().count() > MAX_BIO_CHARS) {
        return Err(MockError::validation(
            1001,
            format!("Bio must not exceed {} characters", MAX_BIO_CHARS),
        ));
    }
    let caller = ctx.caller()?;

    ctx.data(|data| -> HandlerResult {
        let account = data.account_mut(&caller.sub).ok_or_else(missing_account)?;
        account.name = name.to_string();
        account.email = email.to_string();
        if let Some(phone) = params.str("phone") {
            account.phone = phone.to_string();
        }
        if let Some(department) = params.str("department") {
            account.department = Some(department.to_string());
        }
        profile_view(account)
    })
}

/// Accepts the multipart parameter shape with a file under `avatar`
pub fn upload_avatar(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let file_name = params
        .get("files")
        .and_then(Value::as_array)
        .and_then(|files| files.iter().find(|f| f["field"] == AVATAR_FIELD))
        .and_then(|f| f["fileName"].as_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| MockError::validation(1001, "Please choose an avatar image"))?;
    let caller = ctx.caller()?;

    ctx.data(|data| -> HandlerResult {
        let account = data.account_mut(&caller.sub).ok_or_else(missing_account)?;
        let url = format!("/avatars/{}/{}", account.id, file_name);
        account.avatar = Some(url.clone());
        Ok(json!({ "avatarUrl": url }))
    })
}

pub fn departments(_ctx: &MockContext<'_>, _params: &Value) -> HandlerResult {
    let list: Vec<Value> = DEPARTMENTS
        .iter()
        .map(|name| json!({ "value": name, "label": name }))
        .collect();
    Ok(json!(list))
}

pub fn login_records(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let limit = Params::new(params)
        .u64_or("limit", DEFAULT_RECORD_LIMIT)
        .clamp(1, MAX_RECORD_LIMIT) as usize;
    let caller = ctx.caller()?;

    ctx.data(|data| -> HandlerResult {
        let mut records: Vec<&LoginRecord> = data
            .login_records
            .iter()
            .filter(|r| r.account_id == caller.sub)
            .collect();
        records.sort_by(|a, b| b.login_time.cmp(&a.login_time));
        records.truncate(limit);
        to_payload(&records)
    })
}

pub fn change_password(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let (Some(current), Some(new), Some(confirm)) = (
        params.secret("currentPassword"),
        params.secret("newPassword"),
        params.secret("confirmPassword"),
    ) else {
        return Err(MockError::validation(1001, "Please fill in all required fields"));
    };
    check_new_password(new, Some(confirm))?;
    replace_password(ctx, current, new, "Current password is incorrect")
}
