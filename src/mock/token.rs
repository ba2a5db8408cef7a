//! Bearer tokens minted by the mock backend

use crate::session::Role;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::MockError;

const MOCK_SECRET: &[u8] = b"ragdesk-mock-backend-signing-key";
const TOKEN_TTL_SECS: i64 = 24 * 3600;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    pub username: String,
    pub role: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

impl Claims {
    pub fn new(account_id: &str, username: &str, role: Role) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: account_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        }
    }

    pub fn role(&self) -> Role {
        Role::from_name(&self.role)
    }
}

pub fn issue_token(claims: &Claims) -> Result<String, MockError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(MOCK_SECRET),
    )
    .map_err(|e| MockError::Internal(format!("Failed to create token: {}", e)))
}

pub fn validate_token(token: &str) -> Result<Claims, MockError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(MOCK_SECRET),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| MockError::Unauthenticated(format!("Invalid token: {}", e)))
}
