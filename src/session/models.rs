//! Session and user profile models

use serde::{Deserialize, Serialize};
use std::fmt;

/// User roles for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator - user and model management
    Admin,
    /// Regular user - knowledge, chat and search
    #[default]
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

impl Role {
    /// Parse a wire role name; anything unknown is a regular user
    pub fn from_name(name: &str) -> Self {
        match name {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// Profile of the authenticated user, as returned by the login operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Where a session's credential material lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Survives restarts ("remember me")
    Persistent,
    /// Dropped when the consuming process or tab ends
    Ephemeral,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Persistent => write!(f, "persistent"),
            Scope::Ephemeral => write!(f, "ephemeral"),
        }
    }
}

/// Authentication state restored from one of the storage scopes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub scope: Scope,
    pub user: Option<UserProfile>,
}

impl Session {
    /// Role used for authorization; a session without a profile is a plain user
    pub fn role(&self) -> Role {
        self.user.as_ref().map(|u| u.role).unwrap_or(Role::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_wire_format() {
        let json = r#"{
            "id": "user_001",
            "username": "admin",
            "name": "Administrator",
            "role": "admin",
            "email": "admin@company.com",
            "phone": "13800138000"
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert!(profile.is_admin());
        assert_eq!(profile.name, "Administrator");
        assert!(profile.department.is_none());

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["role"], "admin");
        assert!(back.get("avatar").is_none());
    }

    #[test]
    fn test_role_from_name() {
        assert_eq!(Role::from_name("admin"), Role::Admin);
        assert_eq!(Role::from_name("user"), Role::User);
        assert_eq!(Role::from_name("viewer"), Role::User);
    }

    #[test]
    fn test_session_without_profile_is_user() {
        let session = Session {
            token: "t".to_string(),
            scope: Scope::Ephemeral,
            user: None,
        };
        assert_eq!(session.role(), Role::User);
    }
}
