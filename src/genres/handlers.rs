//! `/genres` endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};

use super::models::{CreateGenre, Genre, UpdateGenre};
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
) -> Result<Json<Paginated<Genre>>> {
    let (genres, meta) = state.genres.fetch_pagination(query.into_pagination()).await?;
    Ok(Json(Paginated::new(genres, meta)))
}

async fn show(State(state): State<AppState>, UuidPath(id): UuidPath) -> Result<Json<Genre>> {
    Ok(Json(state.genres.find_by_id(id).await?))
}

async fn store(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateGenre>,
) -> Result<(StatusCode, Json<Genre>)> {
    let genre = state.genres.store(input).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

async fn update(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateGenre>,
) -> Result<Json<MessageBody>> {
    state.genres.update(id, input).await?;
    Ok(Json(MessageBody::updated()))
}

async fn destroy(State(state): State<AppState>, UuidPath(id): UuidPath) -> Result<Json<MessageBody>> {
    state.genres.soft_delete(id).await?;
    Ok(Json(MessageBody::deleted()))
}
