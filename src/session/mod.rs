//! Session data model and stores

pub mod models;
pub mod postgres;
pub mod repository;

pub use models::{ClientInfo, Session, SessionMatch};
pub use postgres::PgSessionRepository;
pub use repository::{InMemorySessionRepository, SessionRepository};
