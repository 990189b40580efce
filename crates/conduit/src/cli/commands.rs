//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::page::Page;

/// Feed command arguments.
#[derive(Debug, Args)]
pub struct FeedCommand {
    /// Route to render (`/`, `/user/articles`, `/user/articles/favorite`)
    #[arg(short, long, default_value = "/")]
    pub path: String,

    /// Open this page, overriding the page in the path
    #[arg(long)]
    pub page: Option<Page>,

    /// Act as this user when deriving the author or favorites filter
    #[arg(short, long)]
    pub username: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Arguments shared by `favorite` and `unfavorite`.
#[derive(Debug, Args)]
pub struct FavoriteCommand {
    /// Slug of the article
    pub slug: String,
}

/// Login command arguments.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Account password
    #[arg(short, long)]
    pub password: String,
}

/// Register command arguments.
#[derive(Debug, Args)]
pub struct RegisterCommand {
    /// Public username
    #[arg(short, long)]
    pub username: String,

    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Account password
    #[arg(short, long)]
    pub password: String,

    /// Password confirmation, defaults to the password
    #[arg(long)]
    pub repeat_password: Option<String>,

    /// Agree to the terms and conditions
    #[arg(long)]
    pub agree: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
