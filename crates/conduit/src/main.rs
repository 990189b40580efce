//! `conduit` - CLI for browsing a RealWorld article feed
//!
//! This binary renders feed pages, toggles favorites and runs the
//! authorization form against a RealWorld-compatible API.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::future::Future;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{info, warn};

use conduit::api::{ApiResult, AuthApi, HttpClient};
use conduit::auth_form::{fields, AuthorizationForm};
use conduit::cli::render::render_feed;
use conduit::cli::{Cli, Command, ConfigCommand, FeedCommand, LoginCommand, RegisterCommand};
use conduit::location::{Location, NavigationState};
use conduit::store::{Action, Store, User};
use conduit::{init_logging, Config, FavoriteDirection, Feed, FeedController};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration, letting --token win over the file
    let mut config =
        Config::load_from(cli.config.clone()).context("failed to load configuration")?;
    if let Some(token) = cli.token {
        config.api.token = Some(token);
    }

    match cli.command {
        Command::Feed(cmd) => handle_feed(&config, cmd).await,
        Command::Favorite(cmd) => handle_favorite(&config, &cmd.slug, FavoriteDirection::Add).await,
        Command::Unfavorite(cmd) => {
            handle_favorite(&config, &cmd.slug, FavoriteDirection::Remove).await
        }
        Command::Login(cmd) => handle_login(&config, cmd).await,
        Command::Register(cmd) => handle_register(&config, cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

async fn handle_feed(config: &Config, cmd: FeedCommand) -> anyhow::Result<()> {
    let api = HttpClient::new(config)?;
    let mut store = Store::new();

    if config.api.token.is_some() {
        match api.current_user().await {
            Ok(user) => store.dispatch(Action::SignIn(user)),
            Err(e) if e.is_unauthorized() => {
                warn!("token was rejected; run `conduit login` for a new one");
            }
            Err(e) => warn!(error = %e, "could not restore session"),
        }
    }
    if let Some(username) = cmd.username.filter(|_| store.username().is_none()) {
        store.dispatch(Action::SignIn(User {
            email: String::new(),
            token: String::new(),
            username,
            bio: None,
            image: None,
        }));
    }

    let mut location = Location::parse(&cmd.path)?;
    if let Some(page) = cmd.page {
        location.state = NavigationState::with_articles_page(page);
    }

    let mut feed = Feed::new(api, FeedController::from_config(config));
    let view = feed.render(&mut store, &mut location).await;
    info!(href = %location.href(), filter = ?feed.controller().filter(), "rendered feed");

    println!("{}", render_feed(&view, cmd.format)?);
    Ok(())
}

async fn handle_favorite(
    config: &Config,
    slug: &str,
    direction: FavoriteDirection,
) -> anyhow::Result<()> {
    if config.api.token.is_none() {
        bail!("favorites require a token; run `conduit login` first");
    }

    let api = HttpClient::new(config)?;
    let mut feed = Feed::new(api, FeedController::from_config(config));
    let currently_favorited = direction == FavoriteDirection::Remove;

    match feed.toggle_favorite(slug, currently_favorited).await {
        Ok(article) => println!(
            "{} ({} favorites, favorited: {})",
            article.slug, article.favorites_count, article.favorited
        ),
        Err(e) if e.source.is_unauthorized() => {
            warn!(slug = %e.slug, "favorite rejected; run `conduit login` for a new token");
        }
        Err(e) => warn!(error = %e, "favorite toggle failed"),
    }
    Ok(())
}

async fn handle_login(config: &Config, cmd: LoginCommand) -> anyhow::Result<()> {
    let api = HttpClient::new(config)?;
    let client = &api;
    let mut store = Store::new();

    let mut form = AuthorizationForm::login();
    form.set_value(fields::EMAIL, cmd.email);
    form.set_value(fields::PASSWORD, cmd.password);

    let attempt = form.submit(&mut store, |data| async move {
        client
            .login(data.get(fields::EMAIL), data.get(fields::PASSWORD))
            .await
    });
    match attempt {
        Ok(attempt) => finish_auth(form, &mut store, attempt).await,
        Err(invalid) => {
            for (field, message) in &invalid.fields {
                eprintln!("{field}: {message}");
            }
            Err(invalid.into())
        }
    }
}

async fn handle_register(config: &Config, cmd: RegisterCommand) -> anyhow::Result<()> {
    let api = HttpClient::new(config)?;
    let client = &api;
    let mut store = Store::new();

    let repeat = cmd.repeat_password.unwrap_or_else(|| cmd.password.clone());
    let mut form = AuthorizationForm::register();
    form.set_value(fields::USERNAME, cmd.username);
    form.set_value(fields::EMAIL, cmd.email);
    form.set_value(fields::PASSWORD, cmd.password);
    form.set_value(fields::REPEAT_PASSWORD, repeat);
    form.set_agreed(cmd.agree);

    let attempt = form.submit(&mut store, |data| async move {
        client
            .register(
                data.get(fields::USERNAME),
                data.get(fields::EMAIL),
                data.get(fields::PASSWORD),
            )
            .await
    });
    match attempt {
        Ok(attempt) => finish_auth(form, &mut store, attempt).await,
        Err(invalid) => {
            for (field, message) in &invalid.fields {
                eprintln!("{field}: {message}");
            }
            Err(invalid.into())
        }
    }
}

async fn finish_auth(
    mut form: AuthorizationForm,
    store: &mut Store,
    attempt: impl Future<Output = ApiResult<User>>,
) -> anyhow::Result<()> {
    match attempt.await {
        Ok(user) => {
            info!(username = %user.username, "signed in");
            println!("{}: signed in as {}", form.mode().title(), user.username);
            println!("{}", user.token);
            store.dispatch(Action::SignIn(user));
            form.unmount(store);
            Ok(())
        }
        Err(e) => {
            form.apply_server_error(store, &e);
            eprintln!("{} failed", form.mode().title());
            if let Some(message) = form.general_error() {
                eprintln!("{message}");
            }
            if let Some(message) = &store.state().notification.error_message {
                eprintln!("{message}");
            }
            form.unmount(store);
            bail!("authorization failed: {e}");
        }
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                let mut shown = config.clone();
                if shown.api.token.is_some() {
                    shown.api.token = Some("<redacted>".to_string());
                }
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[API]");
                println!("  Base URL:           {}", config.api.base_url);
                println!(
                    "  Token:              {}",
                    if config.api.token.is_some() { "set" } else { "not set" }
                );
                println!("  Timeout (secs):     {}", config.api.timeout_secs);
                println!();
                println!("[Feed]");
                println!("  Articles per page:  {}", config.feed.articles_limit);
                println!("  Cache TTL (secs):   {}", config.feed.cache_ttl_secs);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
