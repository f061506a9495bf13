//! PostgreSQL credential store

use async_trait::async_trait;
use std::sync::Arc;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, Row};
use uuid::Uuid;

use super::models::User;
use super::repository::UserRepository;
use crate::error::{from_pg, Result};
use crate::pagination::Pagination;

const COLUMNS: &str = "id, username, email, full_name, password, is_admin, \
    is_email_verified, password_changed_at, created_at, updated_at, deleted_at";

pub struct PgUserRepository {
    client: Arc<Client>,
}

impl PgUserRepository {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    async fn find_one(&self, clause: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Option<User>> {
        let query =
            format!("SELECT {COLUMNS} FROM users WHERE deleted_at IS NULL AND ({clause}) LIMIT 1");
        let row = self.client.query_opt(&query, params).await?;
        Ok(row.as_ref().map(row_to_user))
    }
}

fn row_to_user(row: &Row) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        password_hash: row.get("password"),
        is_admin: row.get("is_admin"),
        is_email_verified: row.get("is_email_verified"),
        password_changed_at: row.get("password_changed_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        deleted_at: row.get("deleted_at"),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.find_one("id = $1", &[&id]).await
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>> {
        self.find_one("username = $1 OR lower(email) = lower($2)", &[&username, &email])
            .await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.find_one("username = $1", &[&username]).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_one("lower(email) = lower($1)", &[&email]).await
    }

    async fn fetch_pagination(&self, pagination: Pagination) -> Result<(Vec<User>, Pagination)> {
        let total: i64 = self
            .client
            .query_one("SELECT count(*) FROM users WHERE deleted_at IS NULL", &[])
            .await?
            .get(0);
        let pagination = pagination.with_total(total);

        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE deleted_at IS NULL \
             ORDER BY created_at ASC, id ASC OFFSET $1 LIMIT $2"
        );
        let rows = self
            .client
            .query(&query, &[&pagination.offset(), &pagination.limit()])
            .await
            .map_err(|e| {
                tracing::error!("failed to fetch users: {}", e);
                e
            })?;

        Ok((rows.iter().map(row_to_user).collect(), pagination))
    }

    async fn find_by_id_for_update(&self, id: Uuid) -> Result<Option<User>> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE deleted_at IS NULL AND id = $1 FOR UPDATE"
        );
        let row = self.client.query_opt(&query, &[&id]).await?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn store(&self, user: User) -> Result<User> {
        let query = format!(
            "INSERT INTO users ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        let row = self
            .client
            .query_one(
                &query,
                &[
                    &user.id,
                    &user.username,
                    &user.email,
                    &user.full_name,
                    &user.password_hash,
                    &user.is_admin,
                    &user.is_email_verified,
                    &user.password_changed_at,
                    &user.created_at,
                    &user.updated_at,
                    &user.deleted_at,
                ],
            )
            .await
            .map_err(from_pg)?;
        Ok(row_to_user(&row))
    }

    async fn update(&self, user: &User) -> Result<()> {
        self.client
            .execute(
                "UPDATE users SET username = $2, email = $3, full_name = $4, password = $5, \
                 is_admin = $6, is_email_verified = $7, password_changed_at = $8, updated_at = $9 \
                 WHERE id = $1 AND deleted_at IS NULL",
                &[
                    &user.id,
                    &user.username,
                    &user.email,
                    &user.full_name,
                    &user.password_hash,
                    &user.is_admin,
                    &user.is_email_verified,
                    &user.password_changed_at,
                    &user.updated_at,
                ],
            )
            .await
            .map_err(from_pg)?;
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<()> {
        self.client
            .execute(
                "UPDATE users SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
                &[&id],
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.client
            .execute("DELETE FROM users WHERE id = $1", &[&id])
            .await?;
        Ok(())
    }
}
