//! Session store contract and in-memory adapter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Session, SessionMatch};
use crate::error::Result;

/// Persistence for sessions, one row per issued refresh token
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session
    async fn store(&self, session: Session) -> Result<Session>;

    /// Get a session by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>>;

    /// Remove a session by ID
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Remove every session of one principal on one device
    async fn delete_matching(&self, device: &SessionMatch) -> Result<u64>;

    /// Mark a session as revoked
    async fn block(&self, id: Uuid) -> Result<()>;

    /// Remove sessions whose refresh token expired before `before`
    async fn delete_expired(&self, before: DateTime<Utc>) -> Result<u64>;
}

/// In-memory session store (development and tests)
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Overwrite a stored session, for tests that need to age or tamper with rows
    pub async fn replace(&self, session: Session) {
        self.sessions.write().await.insert(session.id, session);
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn store(&self, session: Session) -> Result<Session> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(crate::error::Error::Conflict);
        }
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.sessions.write().await.remove(&id);
        Ok(())
    }

    async fn delete_matching(&self, device: &SessionMatch) -> Result<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !device.matches(s));
        Ok((before - sessions.len()) as u64)
    }

    async fn block(&self, id: Uuid) -> Result<()> {
        if let Some(session) = self.sessions.write().await.get_mut(&id) {
            session.is_revoked = true;
        }
        Ok(())
    }

    async fn delete_expired(&self, before: DateTime<Utc>) -> Result<u64> {
        let mut sessions = self.sessions.write().await;
        let count = sessions.len();
        sessions.retain(|_, s| s.refresh_token_expires_at >= before);
        Ok((count - sessions.len()) as u64)
    }
}
