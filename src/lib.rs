//! Movie API - movie catalog REST backend with token sessions
//!
//! Users register and log in to receive an access/refresh token pair bound
//! to a server-side session. Genres, movies and ratings are public to read
//! and require a live access token to change.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod genres;
pub mod memory;
pub mod movies;
pub mod pagination;
pub mod password;
pub mod ratings;
pub mod session;
pub mod timeout;
pub mod token;
pub mod users;

pub use api::{create_router, AppState, Stores};
pub use config::Config;
pub use error::{Error, Result};
pub use memory::InMemoryCatalog;
pub use token::TokenMaker;
