//! Route table

use axum::{routing::get, Json, Router};

use super::response::MessageBody;
use super::state::AppState;
use crate::{auth, genres, movies, ratings, users};

pub async fn ping() -> Json<MessageBody> {
    Json(MessageBody::new("Ping!"))
}

/// All endpoints, still waiting for their state
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .nest("/auth", auth::handlers::router(state.clone()))
        .nest("/users", users::handlers::router(state.clone()))
        .nest("/genres", genres::handlers::router(state.clone()))
        .nest("/movies", movies::handlers::router(state.clone()))
        .nest("/ratings", ratings::handlers::router(state.clone()))
}
