//! In-memory catalog store backing genres, movies and ratings (for development/testing)

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::genres::{Genre, GenreRepository};
use crate::movies::{Movie, MovieRepository};
use crate::pagination::{paginate_slice, Pagination};
use crate::ratings::{Rating, RatingRepository};

#[derive(Debug, Default)]
struct Tables {
    genres: HashMap<Uuid, Genre>,
    movies: HashMap<Uuid, Movie>,
    ratings: HashMap<Uuid, Rating>,
    /// (movie_id, genre_id)
    movie_genres: BTreeSet<(Uuid, Uuid)>,
}

impl Tables {
    fn live_genre(&self, id: Uuid) -> Option<&Genre> {
        self.genres.get(&id).filter(|g| !g.is_deleted())
    }

    fn live_movie(&self, id: Uuid) -> Option<&Movie> {
        self.movies.get(&id).filter(|m| !m.is_deleted())
    }

    fn genres_of(&self, movie_id: Uuid) -> Vec<Genre> {
        let mut genres: Vec<Genre> = self
            .movie_genres
            .iter()
            .filter(|(m, _)| *m == movie_id)
            .filter_map(|(_, g)| self.live_genre(*g).cloned())
            .collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        genres
    }

    fn movies_of(&self, genre_id: Uuid) -> Vec<Movie> {
        let mut movies: Vec<Movie> = self
            .movie_genres
            .iter()
            .filter(|(_, g)| *g == genre_id)
            .filter_map(|(m, _)| self.live_movie(*m).cloned())
            .collect();
        movies.sort_by(|a, b| a.title.cmp(&b.title));
        movies
    }

    fn ratings_of(&self, movie_id: Uuid) -> Vec<Rating> {
        let mut ratings: Vec<Rating> = self
            .ratings
            .values()
            .filter(|r| r.movie_id == movie_id && !r.is_deleted())
            .cloned()
            .collect();
        ratings.sort_by_key(|r| r.created_at);
        ratings
    }
}

/// One shared set of tables so relations resolve across the three stores
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

fn bare_movie(movie: &Movie) -> Movie {
    Movie {
        genres: Vec::new(),
        ratings: Vec::new(),
        ..movie.clone()
    }
}

#[async_trait]
impl GenreRepository for InMemoryCatalog {
    async fn fetch_pagination(&self, pagination: Pagination) -> Result<(Vec<Genre>, Pagination)> {
        let tables = self.tables.read().await;
        let mut genres: Vec<Genre> = tables
            .genres
            .values()
            .filter(|g| !g.is_deleted())
            .cloned()
            .collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        let pagination = pagination.with_total(genres.len() as i64);
        Ok((paginate_slice(&genres, &pagination), pagination))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Genre>> {
        let tables = self.tables.read().await;
        Ok(tables.live_genre(id).cloned().map(|mut genre| {
            genre.movies = tables.movies_of(id);
            genre
        }))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Genre>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.live_genre(*id).cloned())
            .collect())
    }

    async fn find_by_id_for_update(&self, id: Uuid) -> Result<Option<Genre>> {
        Ok(self.tables.read().await.live_genre(id).cloned())
    }

    async fn store(&self, genre: Genre) -> Result<Genre> {
        let mut tables = self.tables.write().await;
        if tables.genres.contains_key(&genre.id) {
            return Err(Error::Conflict);
        }
        tables.genres.insert(genre.id, genre.clone());
        Ok(genre)
    }

    async fn update(&self, genre: &Genre) -> Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.genres.get_mut(&genre.id).filter(|g| !g.is_deleted()) {
            existing.name = genre.name.clone();
            existing.updated_at = genre.updated_at;
        }
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<()> {
        if let Some(genre) = self.tables.write().await.genres.get_mut(&id) {
            genre.deleted_at.get_or_insert_with(Utc::now);
        }
        Ok(())
    }
}

#[async_trait]
impl MovieRepository for InMemoryCatalog {
    async fn fetch_pagination(&self, pagination: Pagination) -> Result<(Vec<Movie>, Pagination)> {
        let tables = self.tables.read().await;
        let mut movies: Vec<Movie> = tables
            .movies
            .values()
            .filter(|m| !m.is_deleted())
            .cloned()
            .collect();
        movies.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let pagination = pagination.with_total(movies.len() as i64);
        let mut page = paginate_slice(&movies, &pagination);
        for movie in &mut page {
            movie.genres = tables.genres_of(movie.id);
        }
        Ok((page, pagination))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>> {
        let tables = self.tables.read().await;
        Ok(tables.live_movie(id).cloned().map(|mut movie| {
            movie.genres = tables.genres_of(id);
            movie.ratings = tables.ratings_of(id);
            movie
        }))
    }

    async fn find_by_id_for_update(&self, id: Uuid) -> Result<Option<Movie>> {
        Ok(self.tables.read().await.live_movie(id).cloned())
    }

    async fn store(&self, movie: Movie) -> Result<Movie> {
        let mut tables = self.tables.write().await;
        if tables.movies.contains_key(&movie.id) {
            return Err(Error::Conflict);
        }
        for genre_id in movie.genre_ids() {
            tables.movie_genres.insert((movie.id, genre_id));
        }
        tables.movies.insert(movie.id, bare_movie(&movie));
        Ok(movie)
    }

    async fn update(&self, movie: &Movie, genre_ids: Option<&[Uuid]>) -> Result<()> {
        let mut tables = self.tables.write().await;
        match tables.movies.get_mut(&movie.id).filter(|m| !m.is_deleted()) {
            Some(existing) => *existing = bare_movie(movie),
            None => return Ok(()),
        }

        if let Some(genre_ids) = genre_ids {
            tables.movie_genres.retain(|(m, _)| *m != movie.id);
            for genre_id in genre_ids {
                tables.movie_genres.insert((movie.id, *genre_id));
            }
        }
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<()> {
        if let Some(movie) = self.tables.write().await.movies.get_mut(&id) {
            movie.deleted_at.get_or_insert_with(Utc::now);
        }
        Ok(())
    }
}

#[async_trait]
impl RatingRepository for InMemoryCatalog {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Rating>> {
        let tables = self.tables.read().await;
        Ok(tables
            .ratings
            .get(&id)
            .filter(|r| !r.is_deleted())
            .cloned()
            .map(|mut rating| {
                rating.movie = tables.live_movie(rating.movie_id).map(|m| Box::new(bare_movie(m)));
                rating
            }))
    }

    async fn find_by_id_for_update(&self, id: Uuid) -> Result<Option<Rating>> {
        let tables = self.tables.read().await;
        Ok(tables.ratings.get(&id).filter(|r| !r.is_deleted()).cloned())
    }

    async fn store(&self, rating: Rating) -> Result<Rating> {
        let mut tables = self.tables.write().await;
        if tables.ratings.contains_key(&rating.id) {
            return Err(Error::Conflict);
        }
        let stored = Rating {
            movie: None,
            ..rating
        };
        tables.ratings.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, rating: &Rating) -> Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.ratings.get_mut(&rating.id).filter(|r| !r.is_deleted()) {
            existing.rating = rating.rating;
            existing.comment = rating.comment.clone();
            existing.updated_at = rating.updated_at;
        }
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<()> {
        if let Some(rating) = self.tables.write().await.ratings.get_mut(&id) {
            rating.deleted_at.get_or_insert_with(Utc::now);
        }
        Ok(())
    }
}
