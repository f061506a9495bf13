//! Rating business rules

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::models::{CreateRating, Rating, UpdateRating};
use super::repository::RatingRepository;
use crate::error::{Error, Result};
use crate::movies::MovieRepository;
use crate::timeout::with_timeout;

const INVALID_MOVIE: &str = "The movie is not valid.";

#[derive(Clone)]
pub struct RatingService {
    ratings: Arc<dyn RatingRepository>,
    movies: Arc<dyn MovieRepository>,
    timeout: Duration,
}

impl RatingService {
    pub fn new(
        ratings: Arc<dyn RatingRepository>,
        movies: Arc<dyn MovieRepository>,
        timeout: Duration,
    ) -> Self {
        Self {
            ratings,
            movies,
            timeout,
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Rating> {
        with_timeout(self.timeout, self.ratings.find_by_id(id))
            .await?
            .ok_or(Error::NotFound)
    }

    /// Rate a live movie. The stored rating is returned with the movie embedded.
    pub async fn store(&self, input: CreateRating) -> Result<Rating> {
        with_timeout(self.timeout, async {
            let movie = self
                .movies
                .find_by_id_for_update(input.movie_id)
                .await?
                .ok_or_else(|| Error::BadRequest(INVALID_MOVIE.to_string()))?;

            let mut rating = self
                .ratings
                .store(Rating::new(movie.id, input.rating, input.comment))
                .await?;
            tracing::info!(rating_id = %rating.id, movie_id = %movie.id, "Rating created");

            rating.movie = Some(Box::new(movie));
            Ok(rating)
        })
        .await
    }

    pub async fn update(&self, id: Uuid, input: UpdateRating) -> Result<()> {
        with_timeout(self.timeout, async {
            let mut rating = self
                .ratings
                .find_by_id_for_update(id)
                .await?
                .ok_or(Error::NotFound)?;

            input.apply(&mut rating);
            self.ratings.update(&rating).await
        })
        .await
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<()> {
        with_timeout(self.timeout, async {
            self.ratings
                .find_by_id_for_update(id)
                .await?
                .ok_or(Error::NotFound)?;
            self.ratings.soft_delete(id).await
        })
        .await
    }
}
