//! Credential store contract and in-memory adapter

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::User;
use crate::error::{Error, Result};
use crate::pagination::{paginate_slice, Pagination};

/// Persistence for user accounts. Soft-deleted rows are invisible to every
/// lookup.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_username_or_email(&self, username: &str, email: &str)
        -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// One page of users ordered by creation time, plus the filled-in page meta
    async fn fetch_pagination(&self, pagination: Pagination) -> Result<(Vec<User>, Pagination)>;

    /// Lookup that takes a row lock where the backend supports it
    async fn find_by_id_for_update(&self, id: Uuid) -> Result<Option<User>>;

    /// Insert a new user; duplicate username or email yields `Conflict`
    async fn store(&self, user: User) -> Result<User>;

    async fn update(&self, user: &User) -> Result<()>;

    async fn soft_delete(&self, id: Uuid) -> Result<()>;

    /// Permanently remove the row
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Email equality as the unique index on `lower(email)` sees it
fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn live(users: &HashMap<Uuid, User>) -> impl Iterator<Item = &User> {
        users.values().filter(|u| !u.is_deleted())
    }

    fn taken(users: &HashMap<Uuid, User>, user: &User) -> bool {
        Self::live(users).any(|u| {
            u.id != user.id
                && (u.username == user.username || same_email(&u.email, &user.email))
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).filter(|u| !u.is_deleted()).cloned())
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>> {
        let users = self.users.read().await;
        let found = Self::live(&users)
            .find(|u| u.username == username || same_email(&u.email, email))
            .cloned();
        Ok(found)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        let found = Self::live(&users).find(|u| u.username == username).cloned();
        Ok(found)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        let found = Self::live(&users)
            .find(|u| same_email(&u.email, email))
            .cloned();
        Ok(found)
    }

    async fn fetch_pagination(&self, pagination: Pagination) -> Result<(Vec<User>, Pagination)> {
        let users = self.users.read().await;
        let mut all: Vec<User> = Self::live(&users).cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let pagination = pagination.with_total(all.len() as i64);
        Ok((paginate_slice(&all, &pagination), pagination))
    }

    async fn find_by_id_for_update(&self, id: Uuid) -> Result<Option<User>> {
        self.find_by_id(id).await
    }

    async fn store(&self, user: User) -> Result<User> {
        let mut users = self.users.write().await;
        if Self::taken(&users, &user) {
            return Err(Error::Conflict);
        }
        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, username = %user.username, "Created user");
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if Self::taken(&users, user) {
            return Err(Error::Conflict);
        }
        match users.get_mut(&user.id) {
            Some(existing) if !existing.is_deleted() => {
                *existing = user.clone();
                Ok(())
            }
            _ => Err(Error::NotFound),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> Result<()> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.deleted_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.users.write().await.remove(&id);
        Ok(())
    }
}
