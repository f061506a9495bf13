//! PostgreSQL connection and schema

use std::sync::Arc;
use std::time::Duration;
use tokio_postgres::{Client, NoTls};

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

const SCHEMA: &str = include_str!("schema.sql");
const CONNECT_ATTEMPTS: u32 = 10;
const CONNECT_BACKOFF: Duration = Duration::from_secs(2);

/// Connect to PostgreSQL, retrying while the server comes up.
///
/// The returned client is shared by every repository; tokio-postgres
/// pipelines concurrent queries over the one connection.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<Client>> {
    let conn_string = config.connection_string();
    let mut attempt = 1;

    loop {
        match tokio_postgres::connect(&conn_string, NoTls).await {
            Ok((client, connection)) => {
                // Spawn the connection handler
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        tracing::error!("PostgreSQL connection error: {}", e);
                    }
                });
                tracing::info!(host = %config.host, db = %config.db_name, "Connected to Postgres");
                return Ok(Arc::new(client));
            }
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                tracing::warn!(attempt, "Postgres not yet ready: {}", e);
                attempt += 1;
                tokio::time::sleep(CONNECT_BACKOFF).await;
            }
            Err(e) => return Err(Error::Database(e)),
        }
    }
}

/// Create tables and indexes if they do not exist
pub async fn migrate(client: &Client) -> Result<()> {
    client.batch_execute(SCHEMA).await?;
    tracing::info!("Database schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_index_is_case_insensitive() {
        assert!(SCHEMA.contains("ON users (lower(email)) WHERE deleted_at IS NULL"));
        assert!(!SCHEMA.contains("ON users (email)"));
    }
}
