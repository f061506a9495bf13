//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::{Config, MAX_TOKEN_TTL_SECS};

pub const CONFIG_FILENAME: &str = "movie-api.toml";

/// Load configuration from an explicit path, or search for movie-api.toml
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => find_config_file()?,
    };
    let config = load_config_from_path(&config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.auth.jwt_key.is_empty() {
        return Err(Error::Config("auth.jwt_key must be set".to_string()));
    }
    if config.auth.access_token_ttl_secs == 0 {
        return Err(Error::Config("auth.access_token_ttl_secs must be positive".to_string()));
    }
    if config.auth.refresh_token_ttl_secs > MAX_TOKEN_TTL_SECS {
        return Err(Error::Config(format!(
            "auth.refresh_token_ttl_secs must not exceed {}",
            MAX_TOKEN_TTL_SECS
        )));
    }
    if config.auth.access_token_ttl_secs > config.auth.refresh_token_ttl_secs {
        return Err(Error::Config(
            "auth.access_token_ttl_secs must not exceed auth.refresh_token_ttl_secs".to_string(),
        ));
    }
    if config.context.timeout_secs == 0 {
        return Err(Error::Config("context.timeout_secs must be positive".to_string()));
    }
    Ok(())
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // Constant pattern, covered by the tests below
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("interpolation pattern is valid");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content with a fresh signing key
pub fn default_config_content() -> String {
    let key = format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    );

    format!(
        r#"# Movie API configuration

[server]
host = "0.0.0.0"
port = 8080

[database]
host = "${{DB_HOST:-localhost}}"
port = 5432
user = "${{DB_USER:-postgres}}"
password = "${{DB_PASSWORD:-postgres}}"
db_name = "${{DB_NAME:-movies}}"

[context]
# Deadline for every service call, in seconds
timeout_secs = 2

[auth]
jwt_key = "${{JWT_KEY:-{key}}}"
access_token_ttl_secs = 900      # 15 minutes
refresh_token_ttl_secs = 86400   # 24 hours
"#
    )
}
