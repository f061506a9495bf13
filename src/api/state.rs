//! Shared handler state

use std::sync::Arc;
use tokio_postgres::Client;

use crate::auth::{AuthGate, AuthService, TokenLifetimes};
use crate::config::Config;
use crate::genres::{GenreRepository, GenreService, PgGenreRepository};
use crate::memory::InMemoryCatalog;
use crate::movies::{MovieRepository, MovieService, PgMovieRepository};
use crate::ratings::{PgRatingRepository, RatingRepository, RatingService};
use crate::session::{InMemorySessionRepository, PgSessionRepository, SessionRepository};
use crate::token::TokenMaker;
use crate::users::{InMemoryUserRepository, PgUserRepository, UserRepository, UserService};

/// Store adapters the services are built on
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub genres: Arc<dyn GenreRepository>,
    pub movies: Arc<dyn MovieRepository>,
    pub ratings: Arc<dyn RatingRepository>,
}

impl Stores {
    /// PostgreSQL adapters sharing one client
    pub fn postgres(client: Arc<Client>) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(client.clone())),
            sessions: Arc::new(PgSessionRepository::new(client.clone())),
            genres: Arc::new(PgGenreRepository::new(client.clone())),
            movies: Arc::new(PgMovieRepository::new(client.clone())),
            ratings: Arc::new(PgRatingRepository::new(client)),
        }
    }

    /// Process-local stores, empty at start
    pub fn in_memory() -> Self {
        let catalog = InMemoryCatalog::new();
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            sessions: Arc::new(InMemorySessionRepository::new()),
            genres: Arc::new(catalog.clone()),
            movies: Arc::new(catalog.clone()),
            ratings: Arc::new(catalog),
        }
    }
}

/// Services handed to every handler through `State<AppState>`
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub gate: AuthGate,
    pub users: UserService,
    pub genres: GenreService,
    pub movies: MovieService,
    pub ratings: RatingService,
}

impl AppState {
    pub fn new(config: &Config, stores: Stores, tokens: Arc<TokenMaker>) -> Self {
        let timeout = config.context.timeout();
        let lifetimes = TokenLifetimes {
            access: config.auth.access_token_ttl(),
            refresh: config.auth.refresh_token_ttl(),
        };

        Self {
            auth: AuthService::new(
                stores.users.clone(),
                stores.sessions.clone(),
                tokens.clone(),
                lifetimes,
                timeout,
            ),
            gate: AuthGate::new(tokens, stores.sessions, stores.users.clone(), timeout),
            users: UserService::new(stores.users, timeout, config.auth.bcrypt_cost),
            genres: GenreService::new(stores.genres.clone(), timeout),
            movies: MovieService::new(stores.movies.clone(), stores.genres, timeout),
            ratings: RatingService::new(stores.ratings, stores.movies, timeout),
        }
    }
}
