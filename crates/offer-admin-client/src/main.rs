//! Offer admin command line client
//!
//! Loads the offers table from the marketplace backend and moderates offers.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use clap::{Parser, Subcommand};
use offer_admin_client::render::render;
use offer_admin_client::{
    ApiClient, ClientError, ClientResult, Mutation, NotificationKind, OfferAdminView,
    RetryPolicy, Session,
};
use offer_admin_core::{Config, OfferId};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Command line interface for the offer admin client
#[derive(Parser)]
#[command(
    name = "offer-admin",
    version = env!("CARGO_PKG_VERSION"),
    about = "Moderate marketplace offers from the command line"
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable structured JSON logging
    #[arg(long)]
    json: bool,

    /// Bearer token, overriding configuration and cookie file
    #[arg(long, env = "OFFER_ADMIN_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Show the offers table
    List {
        /// Search box text (kept with the view, not used for filtering)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List users and the admin avatar
    Users,

    /// Accept an offer
    Accept {
        /// Offer ID
        id: OfferId,
    },

    /// Reject (deny) an offer
    Reject {
        /// Offer ID
        id: OfferId,
    },

    /// Archive an offer
    Archive {
        /// Offer ID
        id: OfferId,
    },

    /// Delete an offer
    Delete {
        /// Offer ID
        id: OfferId,
    },

    /// Forget the stored session token
    Logout,

    /// Inspect configuration
    Config {
        /// Show resolved configuration
        #[arg(short, long)]
        show: bool,
    },
}

/// Main entry point
///
/// # Errors
///
/// Returns error if configuration is invalid or a requested action fails
#[tokio::main]
async fn main() -> ClientResult<()> {
    // Load .env file if it exists (for development convenience)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    if cli.json {
        config.logging.format = "json".to_string();
    }
    offer_admin_core::init_logging(&config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.api.base_url,
        "Offer admin starting"
    );

    let mut session = Session::from_config(&config.auth)?;
    if let Some(token) = cli.token.clone() {
        session = session.with_token(token);
    }

    match cli.command {
        Some(Commands::List { search }) => show_offers(&config, &session, search).await,
        None => show_offers(&config, &session, None).await,
        Some(Commands::Users) => show_users(&config, &session).await,
        Some(Commands::Accept { id }) => moderate(&config, &session, Mutation::Accept, id).await,
        Some(Commands::Reject { id }) => moderate(&config, &session, Mutation::Reject, id).await,
        Some(Commands::Archive { id }) => moderate(&config, &session, Mutation::Archive, id).await,
        Some(Commands::Delete { id }) => moderate(&config, &session, Mutation::Delete, id).await,
        Some(Commands::Logout) => {
            let notice = session.log_out()?;
            println!("{notice}");
            Ok(())
        }
        Some(Commands::Config { show }) => {
            if show {
                show_config(&config)?;
            }
            Ok(())
        }
    }
}

/// Load configuration from an explicit file or the default locations
///
/// # Errors
///
/// Returns error if the configuration cannot be read or fails validation
fn load_config(path: Option<&Path>) -> ClientResult<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

fn build_view(config: &Config, session: &Session) -> ClientResult<OfferAdminView<ApiClient>> {
    let client = ApiClient::from_config(config, session.token().map(str::to_string))?;
    if !session.is_authenticated() {
        warn!("No admin token configured; user list and mutations will fail");
    }
    Ok(OfferAdminView::new(client, RetryPolicy::from(&config.retry)))
}

/// Mount the view and print the offers table
///
/// # Errors
///
/// Returns error if the client cannot be built
async fn show_offers(config: &Config, session: &Session, search: Option<String>) -> ClientResult<()> {
    let mut view = build_view(config, session)?;
    if let Some(term) = search {
        view.set_search_term(term);
    }
    view.mount().await;

    print!("{}", render(view.state(), view.backend()));
    Ok(())
}

/// Print users, marking the admin
///
/// # Errors
///
/// Returns error if the users fetch fails
async fn show_users(config: &Config, session: &Session) -> ClientResult<()> {
    let mut view = build_view(config, session)?;
    view.fetch_users().await?;

    for user in &view.state().users {
        let avatar = user
            .avatar
            .as_deref()
            .map_or_else(|| "-".to_string(), |file| view.backend().avatar_url(file));
        let marker = if user.is_admin() { "*" } else { " " };
        println!("{marker} {:>6}  {:<10} {avatar}", user.id, user.role);
    }
    Ok(())
}

/// Mount the view, apply one mutation, and print the outcome and table
///
/// # Errors
///
/// Returns the backend error if the mutation fails
async fn moderate(
    config: &Config,
    session: &Session,
    mutation: Mutation,
    id: OfferId,
) -> ClientResult<()> {
    let mut view = build_view(config, session)?;
    view.mount().await;

    if view.state().offer(id).is_none() {
        warn!(offer_id = id, "Offer is not in the current list");
    }

    let outcome = view.run_mutation(mutation, id).await;

    for notification in view.take_notifications() {
        match notification.kind {
            NotificationKind::Success => println!("{notification}"),
            NotificationKind::Failure => eprintln!("{notification}"),
        }
    }
    print!("{}", render(view.state(), view.backend()));

    outcome
}

/// Show configuration as TOML
///
/// # Errors
///
/// Returns error if configuration cannot be serialized
fn show_config(config: &Config) -> ClientResult<()> {
    let mut shown = config.clone();
    if shown.auth.token.is_some() {
        shown.auth.token = Some("<redacted>".to_string());
    }
    let config_toml = toml::to_string_pretty(&shown).map_err(|e| {
        ClientError::configuration(format!("Failed to serialize configuration: {e}"))
    })?;
    println!("{config_toml}");
    Ok(())
}
