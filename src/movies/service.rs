//! Movie business rules

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::models::{CreateMovie, Movie, UpdateMovie};
use super::repository::MovieRepository;
use crate::error::{Error, Result};
use crate::genres::{Genre, GenreRepository};
use crate::pagination::Pagination;
use crate::timeout::with_timeout;

const INVALID_GENRES: &str = "The genre(s) is not valid.";

#[derive(Clone)]
pub struct MovieService {
    movies: Arc<dyn MovieRepository>,
    genres: Arc<dyn GenreRepository>,
    timeout: Duration,
}

impl MovieService {
    pub fn new(
        movies: Arc<dyn MovieRepository>,
        genres: Arc<dyn GenreRepository>,
        timeout: Duration,
    ) -> Self {
        Self {
            movies,
            genres,
            timeout,
        }
    }

    pub async fn fetch_pagination(
        &self,
        pagination: Pagination,
    ) -> Result<(Vec<Movie>, Pagination)> {
        with_timeout(self.timeout, self.movies.fetch_pagination(pagination)).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Movie> {
        with_timeout(self.timeout, self.movies.find_by_id(id))
            .await?
            .ok_or(Error::NotFound)
    }

    pub async fn store(&self, input: CreateMovie) -> Result<Movie> {
        with_timeout(self.timeout, async {
            let genres = self.resolve_genres(&input.genre_ids).await?;
            let mut movie = Movie::new(input.title, input.duration, input.year, input.synopsis);
            movie.genres = genres;

            let movie = self.movies.store(movie).await?;
            tracing::info!(movie_id = %movie.id, title = %movie.title, "Movie created");
            Ok(movie)
        })
        .await
    }

    pub async fn update(&self, id: Uuid, input: UpdateMovie) -> Result<()> {
        with_timeout(self.timeout, async {
            let mut movie = self
                .movies
                .find_by_id_for_update(id)
                .await?
                .ok_or(Error::NotFound)?;

            let genre_ids: Option<Vec<Uuid>> = match &input.genre_ids {
                Some(ids) => Some(self.resolve_genres(ids).await?.iter().map(|g| g.id).collect()),
                None => None,
            };

            input.apply(&mut movie);
            self.movies.update(&movie, genre_ids.as_deref()).await
        })
        .await
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<()> {
        with_timeout(self.timeout, async {
            self.movies
                .find_by_id_for_update(id)
                .await?
                .ok_or(Error::NotFound)?;
            self.movies.soft_delete(id).await
        })
        .await
    }

    /// Every requested id must name a live genre. Duplicates count once.
    async fn resolve_genres(&self, ids: &[Uuid]) -> Result<Vec<Genre>> {
        let mut ids = ids.to_vec();
        ids.sort();
        ids.dedup();

        let genres = self.genres.find_by_ids(&ids).await?;
        if genres.len() != ids.len() {
            return Err(Error::BadRequest(INVALID_GENRES.to_string()));
        }
        Ok(genres)
    }
}
