//! CLI interface for the movie API

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "movie-api")]
#[command(version)]
#[command(about = "Movie catalog REST API", long_about = None)]
pub struct Cli {
    /// Path to movie-api.toml (defaults to searching upward from the current directory)
    #[arg(short, long, global = true, env = "MOVIE_API_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default movie-api.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create or update the database schema
    Migrate,

    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Manage login sessions
    Sessions {
        #[command(subcommand)]
        action: SessionsAction,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List registered users
    List {
        #[arg(long, default_value = "1")]
        page: i64,

        #[arg(long, default_value = "100")]
        per_page: i64,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Permanently delete a user and their sessions
    Purge {
        /// Id of the user
        id: Uuid,
    },
}

#[derive(Subcommand)]
pub enum SessionsAction {
    /// Delete sessions whose refresh token has expired
    Prune,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
