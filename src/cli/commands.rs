//! CLI command implementations

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{self, AppState, Stores};
use crate::cli::{info, print_user_table, success, warn, OutputFormat};
use crate::config::{self, loader::CONFIG_FILENAME, Config};
use crate::database;
use crate::pagination::Pagination;
use crate::token::TokenMaker;

/// Write a default movie-api.toml with a freshly generated signing key
pub async fn init(force: bool) -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() && !force {
        warn(&format!("{} already exists (use --force to overwrite)", CONFIG_FILENAME));
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Edit the [database] section, then run 'movie-api migrate' and 'movie-api serve'");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(config_path: Option<&Path>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config(config_path)?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server on {}:{}", host, port));
    api::run_server(config, &host, port).await?;

    Ok(())
}

/// Create or update the database schema
pub async fn migrate(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let client = database::connect(&config.database).await?;
    database::migrate(&client).await?;

    success("Database schema is up to date");
    Ok(())
}

/// List one page of users
pub async fn list_users(
    config_path: Option<&Path>,
    page: i64,
    per_page: i64,
    format: OutputFormat,
) -> Result<()> {
    let state = connect_state(config_path).await?;
    let (users, meta) = state
        .users
        .fetch_pagination(Pagination::new(page, per_page))
        .await?;

    match format {
        OutputFormat::Table => print_user_table(&users, &meta),
        OutputFormat::Json => {
            let page = api::response::Paginated::new(users, meta);
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
    }

    Ok(())
}

/// Permanently delete a user; their sessions go with them
pub async fn purge_user(config_path: Option<&Path>, id: Uuid) -> Result<()> {
    let state = connect_state(config_path).await?;
    state
        .users
        .delete(id)
        .await
        .with_context(|| format!("failed to purge user {}", id))?;

    success(&format!("Purged user {}", id));
    Ok(())
}

/// Delete sessions whose refresh token has expired
pub async fn prune_sessions(config_path: Option<&Path>) -> Result<()> {
    let state = connect_state(config_path).await?;
    let removed = state.auth.prune_sessions().await?;

    if removed == 0 {
        info("No expired sessions");
    } else {
        success(&format!("Removed {} expired session(s)", removed));
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    config::load_config(path).context("Failed to load configuration")
}

async fn connect_state(config_path: Option<&Path>) -> Result<AppState> {
    let config = load_config(config_path)?;
    let client = database::connect(&config.database).await?;
    let tokens = Arc::new(TokenMaker::new(&config.auth.jwt_key)?);
    Ok(AppState::new(&config, Stores::postgres(client), tokens))
}
