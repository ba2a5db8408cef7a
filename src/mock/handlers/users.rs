use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use super::{check_new_password, export_ticket, is_valid_email, is_valid_phone};
use crate::mock::params::{paginate, Params};
use crate::mock::router::MockContext;
use crate::mock::state::{new_id, Account, AccountStatus, HASH_COST};
use crate::mock::{to_payload, HandlerResult, MockError};
use crate::session::Role;

const DEFAULT_PAGE_SIZE: u64 = 10;
const GENERATED_PASSWORD_LEN: usize = 10;

fn require_user_id<'a>(params: &Params<'a>, key: &str) -> Result<&'a str, MockError> {
    params.required(key, 1001, "User ID is required")
}

fn user_not_found() -> MockError {
    MockError::validation(1004, "User does not exist")
}

fn check_contact(email: Option<&str>, phone: Option<&str>) -> Result<(), MockError> {
    if email.is_some_and(|e| !is_valid_email(e)) {
        return Err(MockError::validation(1001, "Invalid email format"));
    }
    if phone.is_some_and(|p| !is_valid_phone(p)) {
        return Err(MockError::validation(1001, "Invalid phone number format"));
    }
    Ok(())
}

fn role_param(params: &Params<'_>) -> Result<Role, MockError> {
    match params.str("role") {
        None | Some("user") => Ok(Role::User),
        Some("admin") => Ok(Role::Admin),
        Some(_) => Err(MockError::validation(1001, "Invalid role")),
    }
}

pub fn stats(ctx: &MockContext<'_>, _params: &Value) -> HandlerResult {
    ctx.data(|data| -> HandlerResult {
        let active = data
            .accounts
            .iter()
            .filter(|a| a.status == AccountStatus::Active)
            .count();
        let admins = data.accounts.iter().filter(|a| a.role == Role::Admin).count();
        Ok(json!({
            "totalUsers": data.accounts.len(),
            "activeUsers": active,
            "adminUsers": admins,
            "disabledUsers": data.accounts.len() - active,
        }))
    })
}

pub fn list(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let keyword = params.str("keyword").map(str::to_lowercase);
    let role = params.str("role").map(Role::from_name);
    let status = params.str("status").and_then(AccountStatus::from_name);
    let (page, page_size) = params.page(DEFAULT_PAGE_SIZE);

    ctx.data(|data| -> HandlerResult {
        let mut matches: Vec<&Account> = data
            .accounts
            .iter()
            .filter(|a| match &keyword {
                Some(k) => [&a.username, &a.name, &a.email]
                    .iter()
                    .any(|field| field.to_lowercase().contains(k.as_str())),
                None => true,
            })
            .filter(|a| role.is_none_or(|r| a.role == r))
            .filter(|a| status.is_none_or(|s| a.status == s))
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let items = matches
            .into_iter()
            .map(to_payload)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(paginate(items, page, page_size))
    })
}

pub fn create(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let (Some(username), Some(password)) = (params.str("username"), params.secret("password")) else {
        return Err(MockError::validation(1001, "Username and password are required"));
    };
    check_new_password(password, None)?;
    let (Some(name), Some(email)) = (params.str("name"), params.str("email")) else {
        return Err(MockError::validation(1001, "Name and email are required"));
    };
    check_contact(Some(email), params.str("phone"))?;
    let role = role_param(&params)?;
    let password_hash = bcrypt::hash(password, HASH_COST)?;

    ctx.data(|data| -> HandlerResult {
        if data.accounts.iter().any(|a| a.username == username) {
            return Err(MockError::validation(1003, "Username already exists"));
        }
        let account = Account {
            id: new_id("user"),
            username: username.to_string(),
            name: name.to_string(),
            role,
            email: email.to_string(),
            phone: params.string_or("phone", ""),
            department: params.str("department").map(str::to_string),
            avatar: None,
            status: AccountStatus::Active,
            password_hash,
            created_at: Utc::now(),
            last_login_at: None,
        };
        let payload = to_payload(&account)?;
        info!(%username, "Mock user created");
        data.accounts.push(account);
        Ok(payload)
    })
}

pub fn update(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let id = require_user_id(&params, "id")?;
    check_contact(params.str("email"), params.str("phone"))?;
    let role = params.str("role").map(|_| role_param(&params)).transpose()?;

    ctx.data(|data| -> HandlerResult {
        let account = data.account_mut(id).ok_or_else(user_not_found)?;
        if let Some(name) = params.str("name") {
            account.name = name.to_string();
        }
        if let Some(email) = params.str("email") {
            account.email = email.to_string();
        }
        if let Some(phone) = params.str("phone") {
            account.phone = phone.to_string();
        }
        if let Some(department) = params.str("department") {
            account.department = Some(department.to_string());
        }
        if let Some(role) = role {
            account.role = role;
        }
        to_payload(&*account)
    })
}

pub fn delete(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let id = require_user_id(&params, "userId")?;
    let caller = ctx.caller()?;
    if caller.sub == id {
        return Err(MockError::validation(
            1005,
            "The signed-in administrator account cannot be deleted",
        ));
    }

    ctx.data(|data| -> HandlerResult {
        let before = data.accounts.len();
        data.accounts.retain(|a| a.id != id);
        if data.accounts.len() == before {
            return Err(user_not_found());
        }
        data.login_records.retain(|r| r.account_id != id);
        Ok(json!({}))
    })
}

pub fn toggle_status(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let (Some(id), Some(status)) = (params.str("userId"), params.str("status")) else {
        return Err(MockError::validation(1001, "User ID and status are required"));
    };
    let status = AccountStatus::from_name(status)
        .ok_or_else(|| MockError::validation(1001, "Invalid status value"))?;

    ctx.data(|data| -> HandlerResult {
        let account = data.account_mut(id).ok_or_else(user_not_found)?;
        account.status = status;
        info!(username = %account.username, ?status, "Mock user status changed");
        Ok(json!({ "id": account.id, "status": status }))
    })
}

pub fn reset_password(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let id = require_user_id(&params, "userId")?;
    let new_password: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(GENERATED_PASSWORD_LEN)
        .collect();
    let hash = bcrypt::hash(&new_password, HASH_COST)?;

    ctx.data(|data| -> HandlerResult {
        let account = data.account_mut(id).ok_or_else(user_not_found)?;
        account.password_hash = hash;
        Ok(json!({ "newPassword": new_password }))
    })
}

pub fn export(_ctx: &MockContext<'_>, _params: &Value) -> HandlerResult {
    export_ticket("users", "xlsx")
}
