//! Configuration management for the movie API

pub mod loader;
mod schema;

pub use loader::load_config;
pub use schema::*;
