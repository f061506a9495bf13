//! `/movies` endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};

use super::models::{CreateMovie, Movie, UpdateMovie};
use crate::api::extractors::{UuidPath, ValidatedJson};
use crate::api::response::{MessageBody, Paginated};
use crate::api::state::AppState;
use crate::auth::require_auth;
use crate::error::Result;
use crate::pagination::PageQuery;

pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(index))
        .route("/{id}", get(show));

    let protected = Router::new()
        .route("/", post(store))
        .route("/{id}", put(update).delete(destroy))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    public.merge(protected)
}

async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<Movie>>> {
    let (movies, meta) = state.movies.fetch_pagination(query.into_pagination()).await?;
    Ok(Json(Paginated::new(movies, meta)))
}

async fn show(State(state): State<AppState>, UuidPath(id): UuidPath) -> Result<Json<Movie>> {
    Ok(Json(state.movies.find_by_id(id).await?))
}

async fn store(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateMovie>,
) -> Result<(StatusCode, Json<Movie>)> {
    let movie = state.movies.store(input).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

async fn update(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateMovie>,
) -> Result<Json<MessageBody>> {
    state.movies.update(id, input).await?;
    Ok(Json(MessageBody::updated()))
}

async fn destroy(State(state): State<AppState>, UuidPath(id): UuidPath) -> Result<Json<MessageBody>> {
    state.movies.soft_delete(id).await?;
    Ok(Json(MessageBody::deleted()))
}
