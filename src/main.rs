use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_api::cli::{self, Cli, Commands, SessionsAction, UsersAction};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Init { force } => cli::commands::init(force).await,
        Commands::Serve { host, port } => cli::commands::serve(config, host, port).await,
        Commands::Migrate => cli::commands::migrate(config).await,
        Commands::Users { action } => match action {
            UsersAction::List {
                page,
                per_page,
                format,
            } => cli::commands::list_users(config, page, per_page, format).await,
            UsersAction::Purge { id } => cli::commands::purge_user(config, id).await,
        },
        Commands::Sessions { action } => match action {
            SessionsAction::Prune => cli::commands::prune_sessions(config).await,
        },
    };

    if let Err(e) = result {
        cli::error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}
