//! Movie store contract

use async_trait::async_trait;
use uuid::Uuid;

use super::models::Movie;
use crate::error::Result;
use crate::pagination::Pagination;

#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Live movies with their genres
    async fn fetch_pagination(&self, pagination: Pagination) -> Result<(Vec<Movie>, Pagination)>;

    /// Live movie with its genres and ratings
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>>;

    /// Bare movie row, without relations
    async fn find_by_id_for_update(&self, id: Uuid) -> Result<Option<Movie>>;

    /// Insert the movie and link it to `movie.genres`
    async fn store(&self, movie: Movie) -> Result<Movie>;

    /// Write scalar fields and, when `genre_ids` is given, replace the genre
    /// links in the same write
    async fn update(&self, movie: &Movie, genre_ids: Option<&[Uuid]>) -> Result<()>;

    async fn soft_delete(&self, id: Uuid) -> Result<()>;
}
