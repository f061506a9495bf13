//! PostgreSQL session store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_postgres::{Client, Row};
use uuid::Uuid;

use super::models::{Session, SessionMatch};
use super::repository::SessionRepository;
use crate::error::{from_pg, Result};

const COLUMNS: &str = "id, user_id, access_token, refresh_token, \
    access_token_created_at, access_token_expires_at, \
    refresh_token_created_at, refresh_token_expires_at, \
    user_agent, client_ip, is_revoked";

pub struct PgSessionRepository {
    client: Arc<Client>,
}

impl PgSessionRepository {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

fn row_to_session(row: &Row) -> Session {
    Session {
        id: row.get("id"),
        user_id: row.get("user_id"),
        access_token: row.get("access_token"),
        refresh_token: row.get("refresh_token"),
        access_token_created_at: row.get("access_token_created_at"),
        access_token_expires_at: row.get("access_token_expires_at"),
        refresh_token_created_at: row.get("refresh_token_created_at"),
        refresh_token_expires_at: row.get("refresh_token_expires_at"),
        user_agent: row.get("user_agent"),
        client_ip: row.get("client_ip"),
        is_revoked: row.get("is_revoked"),
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn store(&self, session: Session) -> Result<Session> {
        let query = format!(
            "INSERT INTO sessions ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        let row = self
            .client
            .query_one(
                &query,
                &[
                    &session.id,
                    &session.user_id,
                    &session.access_token,
                    &session.refresh_token,
                    &session.access_token_created_at,
                    &session.access_token_expires_at,
                    &session.refresh_token_created_at,
                    &session.refresh_token_expires_at,
                    &session.user_agent,
                    &session.client_ip,
                    &session.is_revoked,
                ],
            )
            .await
            .map_err(|e| {
                tracing::error!(session_id = %session.id, "failed to store session: {}", e);
                from_pg(e)
            })?;
        Ok(row_to_session(&row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = $1");
        let row = self.client.query_opt(&query, &[&id]).await?;
        Ok(row.as_ref().map(row_to_session))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.client
            .execute("DELETE FROM sessions WHERE id = $1", &[&id])
            .await?;
        Ok(())
    }

    async fn delete_matching(&self, device: &SessionMatch) -> Result<u64> {
        let removed = self
            .client
            .execute(
                "DELETE FROM sessions WHERE user_id = $1 AND user_agent = $2 AND client_ip = $3",
                &[&device.user_id, &device.user_agent, &device.client_ip],
            )
            .await?;
        Ok(removed)
    }

    async fn block(&self, id: Uuid) -> Result<()> {
        self.client
            .execute("UPDATE sessions SET is_revoked = TRUE WHERE id = $1", &[&id])
            .await?;
        Ok(())
    }

    async fn delete_expired(&self, before: DateTime<Utc>) -> Result<u64> {
        let removed = self
            .client
            .execute(
                "DELETE FROM sessions WHERE refresh_token_expires_at < $1",
                &[&before],
            )
            .await?;
        Ok(removed)
    }
}
