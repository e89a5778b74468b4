//! Little Oat CLI - the storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the catalog as rendered product cards
//! oat products
//!
//! # Work with the saved cart
//! oat cart add phonics-pack
//! oat cart show
//! oat cart remove phonics-pack
//! oat cart clear --yes
//! oat cart checkout
//!
//! # Desktop app download counts
//! oat downloads
//!
//! # Record a page view
//! oat track /shop
//! ```
//!
//! The cart is kept in a JSON file (`STOREFRONT_STORAGE_PATH`, or
//! `--storage`) so it survives between invocations like a browser profile.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use little_oat_storefront::{FileStore, Storefront, StorefrontConfig};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod terminal;

use commands::CliError;
use terminal::TerminalUi;

#[derive(Parser)]
#[command(name = "oat")]
#[command(author, version, about = "Little Oat Learners storefront CLI")]
struct Cli {
    /// Local storage file (overrides `STOREFRONT_STORAGE_PATH`)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the catalog and print the product grid
    Products,
    /// Manage the saved cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Show desktop app download counts per platform
    Downloads,
    /// Send one anonymous page view
    Track {
        /// Page path, e.g. `/shop`
        page: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart contents and total
    Show,
    /// Add a product from the catalog by id
    Add {
        /// Product id
        id: String,
    },
    /// Remove a product by id
    Remove {
        /// Product id
        id: String,
    },
    /// Empty the cart
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Send the cart to checkout and print the payment link
    Checkout,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Command output goes to stdout; logs go to stderr.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "little_oat_storefront=info,little_oat_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mut config: StorefrontConfig) -> Result<(), CliError> {
    if let Some(path) = cli.storage {
        config.storage_path = path;
    }

    let assume_yes = matches!(cli.command, Commands::Cart { action: CartAction::Clear { yes: true } });
    let ui = Arc::new(TerminalUi::new(assume_yes));
    let storage = Arc::new(FileStore::new(config.storage_path.clone()));
    let page = Storefront::new(config, storage, ui)?;

    match cli.command {
        Commands::Products => commands::catalog::products(&page).await,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&page),
            CartAction::Add { id } => commands::cart::add(&page, &id).await,
            CartAction::Remove { id } => commands::cart::remove(&page, &id),
            CartAction::Clear { .. } => commands::cart::clear(&page),
            CartAction::Checkout => commands::cart::checkout(&page).await,
        },
        Commands::Downloads => commands::site::downloads(&page).await,
        Commands::Track { page: path } => commands::site::track(&page, &path).await,
    }
}
