//! `/users` endpoints

use axum::{
    extract::{Query, State},
    middleware,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use super::models::{ChangePassword, UpdateUser, User};
use crate::api::extractors::{UuidPath, ValidatedJson};
use crate::api::response::{MessageBody, Paginated};
use crate::api::state::AppState;
use crate::auth::{require_auth, AuthContext};
use crate::error::{Error, Result};
use crate::pagination::PageQuery;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/{id}", get(show).put(update).delete(destroy))
        .route("/{id}/password", put(change_password))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn ensure_can_manage(context: &AuthContext, target: Uuid) -> Result<()> {
    if context.user.can_manage(target) {
        Ok(())
    } else {
        Err(Error::Forbidden)
    }
}

async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<User>>> {
    let (users, meta) = state.users.fetch_pagination(query.into_pagination()).await?;
    Ok(Json(Paginated::new(users, meta)))
}

async fn show(State(state): State<AppState>, UuidPath(id): UuidPath) -> Result<Json<User>> {
    Ok(Json(state.users.find_by_id(id).await?))
}

async fn update(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> Result<Json<MessageBody>> {
    ensure_can_manage(&context, id)?;
    state.users.update(id, input).await?;
    Ok(Json(MessageBody::updated()))
}

async fn destroy(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    UuidPath(id): UuidPath,
) -> Result<Json<MessageBody>> {
    ensure_can_manage(&context, id)?;
    state.users.soft_delete(id).await?;
    Ok(Json(MessageBody::deleted()))
}

async fn change_password(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<ChangePassword>,
) -> Result<Json<MessageBody>> {
    ensure_can_manage(&context, id)?;
    state.users.change_password(id, input).await?;
    Ok(Json(MessageBody::updated()))
}
