//! `/ratings` endpoints

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};

use super::models::{CreateRating, Rating, UpdateRating};
use crate::api::extractors::{UuidPath, ValidatedJson};
use crate::api::response::MessageBody;
use crate::api::state::AppState;
use crate::auth::require_auth;
use crate::error::Result;

pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/{id}", get(show));

    let protected = Router::new()
        .route("/", post(store))
        .route("/{id}", put(update).delete(destroy))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    public.merge(protected)
}

async fn show(State(state): State<AppState>, UuidPath(id): UuidPath) -> Result<Json<Rating>> {
    Ok(Json(state.ratings.find_by_id(id).await?))
}

async fn store(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateRating>,
) -> Result<(StatusCode, Json<Rating>)> {
    let rating = state.ratings.store(input).await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

async fn update(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateRating>,
) -> Result<Json<MessageBody>> {
    state.ratings.update(id, input).await?;
    Ok(Json(MessageBody::updated()))
}

async fn destroy(State(state): State<AppState>, UuidPath(id): UuidPath) -> Result<Json<MessageBody>> {
    state.ratings.soft_delete(id).await?;
    Ok(Json(MessageBody::deleted()))
}
