//! Error types for the movie API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::response::ErrorBody;

#[derive(Error, Debug)]
pub enum Error {
    #[error("token is invalid")]
    InvalidToken,

    #[error("token has expired")]
    ExpiredToken,

    #[error("session is expired")]
    SessionExpired,

    #[error("session is revoked")]
    SessionRevoked,

    #[error("{0}")]
    Unauthorized(String),

    #[error("Forbidden Access")]
    Forbidden,

    #[error("Requested data is not found")]
    NotFound,

    #[error("Requested data already exist")]
    Conflict,

    #[error("Login failed. Email or password is incorrect.")]
    IncorrectCredential,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0}")]
    UnprocessableEntity(String),

    #[error("request timed out")]
    Timeout,

    #[error("Token signing error: {0}")]
    Signing(String),

    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Config file not found. Run 'movie-api init' first.")]
    ConfigNotFound,

    #[error("{0}")]
    Internal(String),
}

impl Error {
    /// Generic access denial used by the auth gate.
    pub fn unauthorized() -> Self {
        Error::Unauthorized("Unauthorized".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidToken
            | Error::ExpiredToken
            | Error::SessionExpired
            | Error::SessionRevoked
            | Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Conflict => StatusCode::CONFLICT,
            Error::IncorrectCredential | Error::BadRequest(_) | Error::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Error::Signing(_)
            | Error::Password(_)
            | Error::Database(_)
            | Error::Config(_)
            | Error::Io(_)
            | Error::TomlParse(_)
            | Error::ConfigNotFound
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to HTTP clients. Server-side details stay in the logs.
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() && !matches!(self, Error::Timeout) {
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        }
    }
}

/// Map a Postgres unique violation to `Conflict`, everything else to `Database`.
pub fn from_pg(err: tokio_postgres::Error) -> Error {
    match err.code() {
        Some(code) if code == &tokio_postgres::error::SqlState::UNIQUE_VIOLATION => {
            Error::Conflict
        }
        _ => Error::Database(err),
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = ErrorBody {
            message: self.public_message(),
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
