pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Category;

#[derive(Parser)]
#[command(name = "headlines")]
#[command(about = "A terminal news reader with local favorites", long_about = None)]
pub struct Cli {
    /// Path to the favorites database
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Append log output to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Top headlines for one category
    Top {
        #[arg(short, long)]
        category: Category,

        /// Two-letter country code (default: from config)
        #[arg(long)]
        country: Option<String>,
    },
    /// Search all articles
    Search {
        query: String,
    },
    /// Articles matching a query, newest first (default query: from config)
    Everything {
        query: Option<String>,
    },
    /// Top headlines across several categories, merged newest first
    All {
        /// Category to include; repeatable (default: from config)
        #[arg(short, long = "category")]
        categories: Vec<Category>,
    },
    /// List saved favorites
    Favorites,
    /// Remove a favorite by URL
    Unfavorite {
        url: String,
    },
    /// Launch the TUI (default)
    Tui,
}
