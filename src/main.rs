use std::fs::OpenOptions;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use headlines::app::AppContext;
use headlines::cli::{commands, Cli, Commands};
use headlines::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    match &cli.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .with(EnvFilter::from_default_env())
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(EnvFilter::from_default_env())
                .init();
        }
    }

    let config = Config::load()?;
    let ctx = AppContext::new(config, cli.db)?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Top { category, country } => {
            commands::top(&ctx, category, country).await?;
        }
        Commands::Search { query } => {
            commands::search(&ctx, &query).await?;
        }
        Commands::Everything { query } => {
            commands::everything(&ctx, query).await?;
        }
        Commands::All { categories } => {
            commands::all(&ctx, categories).await?;
        }
        Commands::Favorites => {
            commands::list_favorites(&ctx)?;
        }
        Commands::Unfavorite { url } => {
            commands::unfavorite(&ctx, &url)?;
        }
        Commands::Tui => {
            headlines::tui::run(&ctx).await?;
        }
    }

    Ok(())
}
