//! Genre business rules

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::models::{CreateGenre, Genre, UpdateGenre};
use super::repository::GenreRepository;
use crate::error::{Error, Result};
use crate::pagination::Pagination;
use crate::timeout::with_timeout;

#[derive(Clone)]
pub struct GenreService {
    repository: Arc<dyn GenreRepository>,
    timeout: Duration,
}

impl GenreService {
    pub fn new(repository: Arc<dyn GenreRepository>, timeout: Duration) -> Self {
        Self {
            repository,
            timeout,
        }
    }

    pub async fn fetch_pagination(
        &self,
        pagination: Pagination,
    ) -> Result<(Vec<Genre>, Pagination)> {
        with_timeout(self.timeout, self.repository.fetch_pagination(pagination)).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Genre> {
        with_timeout(self.timeout, self.repository.find_by_id(id))
            .await?
            .ok_or(Error::NotFound)
    }

    pub async fn store(&self, input: CreateGenre) -> Result<Genre> {
        let genre = with_timeout(self.timeout, self.repository.store(Genre::new(input.name))).await?;
        tracing::info!(genre_id = %genre.id, name = %genre.name, "Genre created");
        Ok(genre)
    }

    pub async fn update(&self, id: Uuid, input: UpdateGenre) -> Result<Genre> {
        with_timeout(self.timeout, async {
            let mut genre = self
                .repository
                .find_by_id_for_update(id)
                .await?
                .ok_or(Error::NotFound)?;

            input.apply(&mut genre);
            self.repository.update(&genre).await?;
            Ok(genre)
        })
        .await
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
}
