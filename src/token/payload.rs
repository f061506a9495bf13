//! Claims carried inside a bearer token

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

pub const ISSUER: &str = "movie.api.auth";

/// Decoded token claims.
///
/// The access and refresh token of one login carry the same `session_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Session this token belongs to
    #[serde(rename = "id")]
    pub session_id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    pub iss: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

impl Payload {
    pub fn new(session_id: Uuid, user_id: Uuid, duration: chrono::Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            session_id,
            user_id,
            iss: ISSUER.to_string(),
            iat: now,
            exp: now + duration.num_seconds(),
        }
    }

    /// Fails once `exp` has been reached, regardless of the signature.
    pub fn valid(&self) -> Result<()> {
        if self.is_expired() {
            return Err(Error::ExpiredToken);
        }
        Ok(())
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0).single().unwrap_or_default()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }
}
