//! Movie ratings

pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use models::{CreateRating, Rating, UpdateRating};
pub use postgres::PgRatingRepository;
pub use repository::RatingRepository;
pub use service::RatingService;
