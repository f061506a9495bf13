//! Session records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One logical login: a token pair sharing `id`, bound to a user and device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing)]
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: String,
    pub access_token_created_at: DateTime<Utc>,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_created_at: DateTime<Utc>,
    pub refresh_token_expires_at: DateTime<Utc>,
    pub user_agent: String,
    pub client_ip: String,
    pub is_revoked: bool,
}

impl Session {
    /// Whether the access token recorded for this session may still be used
    pub fn access_expired(&self) -> bool {
        Utc::now() >= self.access_token_expires_at
    }

    /// Whether the session can no longer be renewed
    pub fn refresh_expired(&self) -> bool {
        Utc::now() >= self.refresh_token_expires_at
    }

    pub fn device(&self) -> SessionMatch {
        SessionMatch {
            user_id: self.user_id,
            user_agent: self.user_agent.clone(),
            client_ip: self.client_ip.clone(),
        }
    }
}

/// Identifies the sessions of one principal on one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMatch {
    pub user_id: Uuid,
    pub user_agent: String,
    pub client_ip: String,
}

impl SessionMatch {
    pub fn matches(&self, session: &Session) -> bool {
        session.user_id == self.user_id
            && session.user_agent == self.user_agent
            && session.client_ip == self.client_ip
    }
}

/// Request metadata recorded on each session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub user_agent: String,
    pub client_ip: String,
}
