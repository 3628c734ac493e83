//! AirShop CLI - storefront and admin tools over the REST backend.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! airshop catalog list --category women --brand DIOR --sort price-asc
//! airshop catalog search sauv
//!
//! # Fill the cart and check out
//! airshop cart add 12 --quantity 2
//! airshop checkout --first-name Анна --last-name Иванова --email anna@example.ru \
//!     --phone "+7 999 000-00-00" --address "ул. Тверская, 1" --city Москва \
//!     --zip 101000 --payment card
//!
//! # Track an order
//! airshop order status AirShop-1741000000000-42
//!
//! # Admin
//! airshop admin login -u admin
//! airshop admin orders list --status pending
//! airshop admin products update 12 --price 11900 --visible false
//! ```
//!
//! # Commands
//!
//! - `catalog` - Browse, search and facet the product list
//! - `cart` - Show and change the local cart
//! - `checkout` - Place an order for the cart
//! - `order` - Look up an order by number
//! - `admin` - Authenticated catalog, order, settings and payment management
//!
//! State (cart, search history, admin token) lives in `AIRSHOP_DATA_DIR`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use airshop_storefront::config::{ConfigError, StorefrontConfig};

mod commands;

use commands::{CliError, Context};

#[derive(Parser)]
#[command(name = "airshop")]
#[command(author, version, about = "AirShop storefront and admin CLI")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Backend base URL, overriding `AIRSHOP_API_URL`
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Place an order for the cart contents
    Checkout(commands::checkout::CheckoutArgs),
    /// Look up orders
    Order {
        #[command(subcommand)]
        action: commands::order::OrderAction,
    },
    /// Store administration
    Admin {
        #[command(subcommand)]
        action: commands::admin::AdminAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(config.checkout.payment_mode.to_string().into()),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

/// Tracing is configured from the config, so report this one directly.
#[allow(clippy::print_stderr)]
fn config_failed(error: &ConfigError) -> ! {
    eprintln!("Configuration error: {error}");
    std::process::exit(2);
}

/// Tell the user why the command failed. Only reportable errors are logged
/// at ERROR, which the Sentry layer turns into a single event; user mistakes
/// go straight to stderr.
#[allow(clippy::print_stderr)]
fn report_failure(error: &CliError) {
    if error.is_reportable() {
        tracing::error!("Command failed: {error}");
    } else {
        eprintln!("Error: {error}");
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => config_failed(&e),
    };

    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "airshop_storefront=info,airshop_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        report_failure(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mut config: StorefrontConfig) -> Result<(), CliError> {
    if let Some(api_url) = cli.api_url.as_deref() {
        config.api.base_url = airshop_storefront::config::parse_base_url(api_url)?;
    }
    let ctx = Context::open(&config, cli.json)?;

    match cli.command {
        Commands::Catalog { action } => commands::catalog::run(&ctx, action).await,
        Commands::Cart { action } => commands::cart::run(&ctx, action).await,
        Commands::Checkout(args) => commands::checkout::run(&ctx, args).await,
        Commands::Order { action } => commands::order::run(&ctx, action).await,
        Commands::Admin { action } => commands::admin::run(&ctx, action).await,
    }
}
