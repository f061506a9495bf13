//! Movies and their genre links

pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use models::{CreateMovie, Movie, UpdateMovie};
pub use postgres::PgMovieRepository;
pub use repository::MovieRepository;
pub use service::MovieService;
