//! PostgreSQL genre store

use async_trait::async_trait;
use std::sync::Arc;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, Row};
use uuid::Uuid;

use super::models::Genre;
use super::repository::GenreRepository;
use crate::error::{from_pg, Result};
use crate::movies::postgres::{row_to_movie, MOVIE_COLUMNS};
use crate::pagination::Pagination;

pub(crate) const GENRE_COLUMNS: &str = "g.id, g.name, g.created_at, g.updated_at, g.deleted_at";

pub struct PgGenreRepository {
    client: Arc<Client>,
}

impl PgGenreRepository {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

pub(crate) fn row_to_genre(row: &Row) -> Genre {
    Genre {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        deleted_at: row.get("deleted_at"),
        movies: Vec::new(),
    }
}

#[async_trait]
impl GenreRepository for PgGenreRepository {
    async fn fetch_pagination(&self, pagination: Pagination) -> Result<(Vec<Genre>, Pagination)> {
        let total: i64 = self
            .client
            .query_one("SELECT count(*) FROM genres WHERE deleted_at IS NULL", &[])
            .await?
            .get(0);
        let pagination = pagination.with_total(total);

        let query = format!(
            "SELECT {GENRE_COLUMNS} FROM genres g WHERE g.deleted_at IS NULL \
             ORDER BY g.name ASC, g.id ASC OFFSET $1 LIMIT $2"
        );
        let rows = self
            .client
            .query(&query, &[&pagination.offset(), &pagination.limit()])
            .await?;

        Ok((rows.iter().map(row_to_genre).collect(), pagination))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Genre>> {
        let genre_query =
            format!("SELECT {GENRE_COLUMNS} FROM genres g WHERE g.id = $1 AND g.deleted_at IS NULL");
        let movies_query = format!(
            "SELECT {MOVIE_COLUMNS} FROM movies m \
             JOIN movie_genres mg ON mg.movie_id = m.id \
             WHERE mg.genre_id = $1 AND m.deleted_at IS NULL \
             ORDER BY m.title ASC"
        );

        let params: [&(dyn ToSql + Sync); 1] = [&id];
        let (genre, movies) = futures_util::try_join!(
            self.client.query_opt(&genre_query, &params),
            self.client.query(&movies_query, &params),
        )?;

        Ok(genre.map(|row| {
            let mut genre = row_to_genre(&row);
            genre.movies = movies.iter().map(row_to_movie).collect();
            genre
        }))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Genre>> {
        let query = format!(
            "SELECT {GENRE_COLUMNS} FROM genres g WHERE g.id = ANY($1) AND g.deleted_at IS NULL"
        );
        let rows = self.client.query(&query, &[&ids]).await?;
        Ok(rows.iter().map(row_to_genre).collect())
    }

    async fn find_by_id_for_update(&self, id: Uuid) -> Result<Option<Genre>> {
        let query = format!(
            "SELECT {GENRE_COLUMNS} FROM genres g WHERE g.id = $1 AND g.deleted_at IS NULL FOR UPDATE"
        );
        let row = self.client.query_opt(&query, &[&id]).await?;
        Ok(row.as_ref().map(row_to_genre))
    }

    async fn store(&self, genre: Genre) -> Result<Genre> {
        let row = self
            .client
            .query_one(
                "INSERT INTO genres (id, name, created_at, updated_at) VALUES ($1, $2, $3, $4) \
                 RETURNING id, name, created_at, updated_at, deleted_at",
                &[&genre.id, &genre.name, &genre.created_at, &genre.updated_at],
            )
            .await
            .map_err(from_pg)?;
        Ok(row_to_genre(&row))
    }

    async fn update(&self, genre: &Genre) -> Result<()> {
        self.client
            .execute(
                "UPDATE genres SET name = $2, updated_at = $3 WHERE id = $1 AND deleted_at IS NULL",
                &[&genre.id, &genre.name, &genre.updated_at],
            )
            .await
            .map_err(from_pg)?;
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<()> {
        self.client
            .execute(
                "UPDATE genres SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
                &[&id],
            )
            .await?;
        Ok(())
    }
}
