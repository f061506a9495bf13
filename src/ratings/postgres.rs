//! PostgreSQL rating store

use async_trait::async_trait;
use std::sync::Arc;
use tokio_postgres::{Client, Row};
use uuid::Uuid;

use super::models::Rating;
use super::repository::RatingRepository;
use crate::error::{from_pg, Result};
use crate::movies::postgres::{row_to_movie, MOVIE_COLUMNS};

pub(crate) const RATING_COLUMNS: &str =
    "r.id, r.movie_id, r.rating, r.comment, r.created_at, r.updated_at, r.deleted_at";

pub struct PgRatingRepository {
    client: Arc<Client>,
}

impl PgRatingRepository {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

pub(crate) fn row_to_rating(row: &Row) -> Rating {
    Rating {
        id: row.get("id"),
        movie_id: row.get("movie_id"),
        rating: row.get("rating"),
        comment: row.get("comment"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        deleted_at: row.get("deleted_at"),
        movie: None,
    }
}

#[async_trait]
impl RatingRepository for PgRatingRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Rating>> {
        let rating_query =
            format!("SELECT {RATING_COLUMNS} FROM ratings r WHERE r.id = $1 AND r.deleted_at IS NULL");
        let Some(row) = self.client.query_opt(&rating_query, &[&id]).await? else {
            return Ok(None);
        };
        let mut rating = row_to_rating(&row);

        let movie_query =
            format!("SELECT {MOVIE_COLUMNS} FROM movies m WHERE m.id = $1 AND m.deleted_at IS NULL");
        let movie = self
            .client
            .query_opt(&movie_query, &[&rating.movie_id])
            .await?;
        rating.movie = movie.as_ref().map(|row| Box::new(row_to_movie(row)));

        Ok(Some(rating))
    }

    async fn find_by_id_for_update(&self, id: Uuid) -> Result<Option<Rating>> {
        let query = format!(
            "SELECT {RATING_COLUMNS} FROM ratings r WHERE r.id = $1 AND r.deleted_at IS NULL FOR UPDATE"
        );
        let row = self.client.query_opt(&query, &[&id]).await?;
        Ok(row.as_ref().map(row_to_rating))
    }

    async fn store(&self, rating: Rating) -> Result<Rating> {
        self.client
            .execute(
                "INSERT INTO ratings (id, movie_id, rating, comment, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &rating.id,
                    &rating.movie_id,
                    &rating.rating,
                    &rating.comment,
                    &rating.created_at,
                    &rating.updated_at,
                ],
            )
            .await
            .map_err(from_pg)?;
        Ok(rating)
    }

    async fn update(&self, rating: &Rating) -> Result<()> {
        self.client
            .execute(
                "UPDATE ratings SET rating = $2, comment = $3, updated_at = $4 \
                 WHERE id = $1 AND deleted_at IS NULL",
                &[&rating.id, &rating.rating, &rating.comment, &rating.updated_at],
            )
            .await
            .map_err(from_pg)?;
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<()> {
        self.client
            .execute(
                "UPDATE ratings SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
                &[&id],
            )
            .await?;
        Ok(())
    }
}
