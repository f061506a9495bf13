//! Rating store contract

use async_trait::async_trait;
use uuid::Uuid;

use super::models::Rating;
use crate::error::Result;

#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Live rating with its movie embedded
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Rating>>;

    async fn find_by_id_for_update(&self, id: Uuid) -> Result<Option<Rating>>;

    async fn store(&self, rating: Rating) -> Result<Rating>;

    async fn update(&self, rating: &Rating) -> Result<()>;

    async fn soft_delete(&self, id: Uuid) -> Result<()>;
}
