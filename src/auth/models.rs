//! Authentication request and response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::token::Payload;
use crate::users::{User, UserProfile};

/// Login credentials. `username` may also hold the account's email.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RenewTokenRequest {
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

/// Token pair issued at login and on renewal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub session_id: Uuid,
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
    pub user: UserProfile,
}

/// Identity resolved by the auth middleware for the current request
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub payload: Payload,
    pub user: User,
}
