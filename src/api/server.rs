//! HTTP API server

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::database;
use crate::error::Result;
use crate::token::TokenMaker;

use super::routes;
use super::state::{AppState, Stores};

/// Connect to PostgreSQL and serve the API until the process is stopped
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let client = database::connect(&config.database).await?;
    database::migrate(&client).await?;

    let tokens = Arc::new(TokenMaker::new(&config.auth.jwt_key)?);
    let state = AppState::new(&config, Stores::postgres(client), tokens);

    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Create the router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    routes::routes(&state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
