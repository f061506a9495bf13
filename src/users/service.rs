//! User business rules

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::models::{ChangePassword, CreateUser, UpdateUser, User};
use super::repository::UserRepository;
use crate::error::{Error, Result};
use crate::pagination::Pagination;
use crate::password;
use crate::timeout::with_timeout;

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    timeout: Duration,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, timeout: Duration, bcrypt_cost: u32) -> Self {
        Self {
            repository,
            timeout,
            bcrypt_cost,
        }
    }

    pub async fn fetch_pagination(&self, pagination: Pagination) -> Result<(Vec<User>, Pagination)> {
        with_timeout(self.timeout, self.repository.fetch_pagination(pagination)).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User> {
        with_timeout(self.timeout, self.repository.find_by_id(id))
            .await?
            .ok_or(Error::NotFound)
    }

    /// Register a new account with a hashed password
    pub async fn store(&self, input: CreateUser) -> Result<User> {
        let password_hash = self.hash(input.password).await?;
        let user = User::new(
            input.username,
            input.email,
            input.full_name,
            password_hash,
            input.is_admin,
        );

        with_timeout(self.timeout, self.repository.store(user)).await
    }

    pub async fn update(&self, id: Uuid, input: UpdateUser) -> Result<User> {
        with_timeout(self.timeout, async {
            let mut user = self
                .repository
                .find_by_id_for_update(id)
                .await?
                .ok_or(Error::NotFound)?;

            input.apply(&mut user);
            self.repository.update(&user).await?;
            Ok(user)
        })
        .await
    }

    /// Replace the password after checking the current one
    pub async fn change_password(&self, id: Uuid, input: ChangePassword) -> Result<()> {
        let mut user = self.find_by_id(id).await?;
        let matches =
            password::verify_password_blocking(input.current_password, user.password_hash.clone())
                .await?;
        if !matches {
            return Err(Error::IncorrectCredential);
        }

        user.password_hash = self.hash(input.new_password).await?;
        user.password_changed_at = Utc::now();
        user.updated_at = user.password_changed_at;

        with_timeout(self.timeout, self.repository.update(&user)).await?;
        tracing::info!(user_id = %id, "Password changed");
        Ok(())
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<()> {
        with_timeout(self.timeout, async {
            self.repository
                .find_by_id_for_update(id)
                .await?
                .ok_or(Error::NotFound)?;
            self.repository.soft_delete(id).await
        })
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        with_timeout(self.timeout, async {
            self.repository
                .find_by_id_for_update(id)
                .await?
                .ok_or(Error::NotFound)?;
            self.repository.delete(id).await
        })
        .await
    }

    async fn hash(&self, plain: String) -> Result<String> {
        password::hash_password_blocking(plain, self.bcrypt_cost).await
    }
}
