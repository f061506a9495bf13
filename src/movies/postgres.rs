//! PostgreSQL movie store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, Row};
use uuid::Uuid;

use super::models::Movie;
use super::repository::MovieRepository;
use crate::error::{from_pg, Error, Result};
use crate::genres::postgres::{row_to_genre, GENRE_COLUMNS};
use crate::genres::Genre;
use crate::pagination::Pagination;
use crate::ratings::postgres::{row_to_rating, RATING_COLUMNS};

pub(crate) const MOVIE_COLUMNS: &str =
    "m.id, m.title, m.duration, m.year, m.synopsis, m.created_at, m.updated_at, m.deleted_at";

pub struct PgMovieRepository {
    client: Arc<Client>,
}

impl PgMovieRepository {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Live genres of each movie in `ids`, keyed by movie id
    async fn genres_of(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Genre>>> {
        let query = format!(
            "SELECT mg.movie_id, {GENRE_COLUMNS} FROM movie_genres mg \
             JOIN genres g ON g.id = mg.genre_id \
             WHERE mg.movie_id = ANY($1) AND g.deleted_at IS NULL \
             ORDER BY g.name ASC"
        );
        let rows = self.client.query(&query, &[&ids]).await?;

        let mut by_movie: HashMap<Uuid, Vec<Genre>> = HashMap::new();
        for row in &rows {
            by_movie
                .entry(row.get("movie_id"))
                .or_default()
                .push(row_to_genre(row));
        }
        Ok(by_movie)
    }
}

pub(crate) fn row_to_movie(row: &Row) -> Movie {
    Movie {
        id: row.get("id"),
        title: row.get("title"),
        duration: row.get("duration"),
        year: row.get("year"),
        synopsis: row.get("synopsis"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        deleted_at: row.get("deleted_at"),
        genres: Vec::new(),
        ratings: Vec::new(),
    }
}

#[async_trait]
impl MovieRepository for PgMovieRepository {
    async fn fetch_pagination(&self, pagination: Pagination) -> Result<(Vec<Movie>, Pagination)> {
        let total: i64 = self
            .client
            .query_one("SELECT count(*) FROM movies WHERE deleted_at IS NULL", &[])
            .await?
            .get(0);
        let pagination = pagination.with_total(total);

        let query = format!(
            "SELECT {MOVIE_COLUMNS} FROM movies m WHERE m.deleted_at IS NULL \
             ORDER BY m.created_at DESC, m.id ASC OFFSET $1 LIMIT $2"
        );
        let rows = self
            .client
            .query(&query, &[&pagination.offset(), &pagination.limit()])
            .await?;

        let mut movies: Vec<Movie> = rows.iter().map(row_to_movie).collect();
        let ids: Vec<Uuid> = movies.iter().map(|m| m.id).collect();
        let mut genres = self.genres_of(&ids).await?;
        for movie in &mut movies {
            movie.genres = genres.remove(&movie.id).unwrap_or_default();
        }

        Ok((movies, pagination))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>> {
        let movie_query =
            format!("SELECT {MOVIE_COLUMNS} FROM movies m WHERE m.id = $1 AND m.deleted_at IS NULL");
        let ratings_query = format!(
            "SELECT {RATING_COLUMNS} FROM ratings r WHERE r.movie_id = $1 AND r.deleted_at IS NULL \
             ORDER BY r.created_at ASC"
        );
        let ids = [id];

        let (movie, mut genres, ratings) = futures_util::try_join!(
            async { self.client.query_opt(&movie_query, &[&id]).await.map_err(Error::from) },
            self.genres_of(&ids),
            async { self.client.query(&ratings_query, &[&id]).await.map_err(Error::from) },
        )?;

        Ok(movie.map(|row| {
            let mut movie = row_to_movie(&row);
            movie.genres = genres.remove(&id).unwrap_or_default();
            movie.ratings = ratings.iter().map(row_to_rating).collect();
            movie
        }))
    }

    async fn find_by_id_for_update(&self, id: Uuid) -> Result<Option<Movie>> {
        let query = format!(
            "SELECT {MOVIE_COLUMNS} FROM movies m WHERE m.id = $1 AND m.deleted_at IS NULL FOR UPDATE"
        );
        let row = self.client.query_opt(&query, &[&id]).await?;
        Ok(row.as_ref().map(row_to_movie))
    }

    async fn store(&self, movie: Movie) -> Result<Movie> {
        let genre_ids = movie.genre_ids();
        // One statement so the row and its links land together
        self.client
            .execute(
                "WITH m AS ( \
                     INSERT INTO movies (id, title, duration, year, synopsis, created_at, updated_at) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id \
                 ) \
                 INSERT INTO movie_genres (movie_id, genre_id) \
                 SELECT m.id, g FROM m, unnest($8::uuid[]) AS g",
                &[
                    &movie.id,
                    &movie.title,
                    &movie.duration,
                    &movie.year,
                    &movie.synopsis,
                    &movie.created_at,
                    &movie.updated_at,
                    &genre_ids,
                ],
            )
            .await
            .map_err(from_pg)?;
        Ok(movie)
    }

    async fn update(&self, movie: &Movie, genre_ids: Option<&[Uuid]>) -> Result<()> {
        let scalars: [&(dyn ToSql + Sync); 6] = [
            &movie.id,
            &movie.title,
            &movie.duration,
            &movie.year,
            &movie.synopsis,
            &movie.updated_at,
        ];

        match genre_ids {
            None => {
                self.client
                    .execute(
                        "UPDATE movies SET title = $2, duration = $3, year = $4, synopsis = $5, \
                         updated_at = $6 WHERE id = $1 AND deleted_at IS NULL",
                        &scalars,
                    )
                    .await
                    .map_err(from_pg)?;
            }
            Some(genre_ids) => {
                let mut params = scalars.to_vec();
                params.push(&genre_ids);
                // Row and links change in one statement
                self.client
                    .execute(
                        "WITH updated AS ( \
                             UPDATE movies SET title = $2, duration = $3, year = $4, synopsis = $5, \
                             updated_at = $6 WHERE id = $1 AND deleted_at IS NULL RETURNING id \
                         ), removed AS ( \
                             DELETE FROM movie_genres \
                             WHERE movie_id IN (SELECT id FROM updated) AND NOT (genre_id = ANY($7)) \
                         ) \
                         INSERT INTO movie_genres (movie_id, genre_id) \
                         SELECT u.id, g FROM updated u CROSS JOIN unnest($7::uuid[]) AS g \
                         ON CONFLICT DO NOTHING",
                        &params,
                    )
                    .await
                    .map_err(from_pg)?;
            }
        }
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<()> {
        self.client
            .execute(
                "UPDATE movies SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
                &[&id],
            )
            .await?;
        Ok(())
    }
}
