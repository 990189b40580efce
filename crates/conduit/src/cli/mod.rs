//! Command-line interface for conduit.
//!
//! This module provides the CLI structure, command definitions and the
//! renderers for feed output.

mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, FavoriteCommand, FeedCommand, LoginCommand, OutputFormat, RegisterCommand,
};

use crate::logging::Verbosity;

/// conduit - Browse and curate a RealWorld article feed
///
/// Renders the global, personal and favorites feeds page by page, toggles
/// favorites and signs in or registers against a RealWorld-compatible API.
#[derive(Debug, Parser)]
#[command(name = "conduit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// API token, overriding the configured one
    #[arg(long, global = true, env = "CONDUIT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render one page of the article feed
    Feed(FeedCommand),

    /// Favorite an article
    Favorite(FavoriteCommand),

    /// Remove an article from favorites
    Unfavorite(FavoriteCommand),

    /// Sign in and print the session token
    Login(LoginCommand),

    /// Create an account and print the session token
    Register(RegisterCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}
