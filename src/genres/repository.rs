//! Genre store contract

use async_trait::async_trait;
use uuid::Uuid;

use super::models::Genre;
use crate::error::Result;
use crate::pagination::Pagination;

#[async_trait]
pub trait GenreRepository: Send + Sync {
    async fn fetch_pagination(&self, pagination: Pagination) -> Result<(Vec<Genre>, Pagination)>;

    /// Live genre with its live movies
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Genre>>;

    /// Live genres among `ids`; unknown or deleted ids are skipped
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Genre>>;

    async fn find_by_id_for_update(&self, id: Uuid) -> Result<Option<Genre>>;

    async fn store(&self, genre: Genre) -> Result<Genre>;

    async fn update(&self, genre: &Genre) -> Result<()>;

    async fn soft_delete(&self, id: Uuid) -> Result<()>;
}
