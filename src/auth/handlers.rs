//! `/auth` endpoints

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};

use super::middleware::require_auth;
use super::models::{AuthContext, AuthResponse, LoginRequest, RenewTokenRequest};
use crate::api::extractors::ValidatedJson;
use crate::api::response::MessageBody;
use crate::api::state::AppState;
use crate::error::Result;
use crate::session::ClientInfo;
use crate::users::{CreateUser, User};

pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/renew-token", post(renew_token));

    let protected = Router::new()
        .route("/logout", post(logout))
        .route("/current-user", get(current_user))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    public.merge(protected)
}

async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state.users.store(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<AppState>,
    client: ClientInfo,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let response = state.auth.login(input, &client).await?;
    Ok(Json(response))
}

async fn renew_token(
    State(state): State<AppState>,
    client: ClientInfo,
    ValidatedJson(input): ValidatedJson<RenewTokenRequest>,
) -> Result<Json<AuthResponse>> {
    let response = state.auth.renew(&input.refresh_token, &client).await?;
    Ok(Json(response))
}

async fn logout(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> Result<Json<MessageBody>> {
    state.auth.logout(context.payload.session_id).await?;
    Ok(Json(MessageBody::new("Logout success !")))
}

async fn current_user(Extension(context): Extension<AuthContext>) -> Json<User> {
    Json(context.user)
}
