//! Movie genres

pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use models::{CreateGenre, Genre, UpdateGenre};
pub use postgres::PgGenreRepository;
pub use repository::GenreRepository;
pub use service::GenreService;
