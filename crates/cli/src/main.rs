//! Lynora CLI - Shop the storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse featured-first, or filter and sort
//! lynora shop
//! lynora shop --size M --color Red --max 150 --sort price-low
//!
//! # Product details and related dresses
//! lynora product crimson-evening-gown
//!
//! # Manage the cart
//! lynora cart add crimson-evening-gown --size M --color Red -q 2
//! lynora cart show
//! lynora cart update <ITEM_ID> 0
//!
//! # Place the order
//! lynora checkout --first-name Ada --last-name Lovelace --email ada@example.com \
//!     --address "12 Analytical Row" --city Portland --state OR --zip 97201
//!
//! # Request a custom design
//! lynora customize --text "Bride Squad" --font "Brush Script" --color "#C0FFEE"
//! ```
//!
//! # Environment Variables
//!
//! - `LYNORA_SUPABASE_URL` / `LYNORA_SUPABASE_ANON_KEY` - data service
//! - `LYNORA_SESSION_FILE` - where the anonymous session id is kept
//! - `SENTRY_DSN` - optional error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lynora_core::CartItemId;
use lynora_storefront::catalog::SortMode;
use lynora_storefront::config::StorefrontConfig;
use lynora_storefront::models::{FontStyle, Placement};
use lynora_storefront::state::AppState;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "lynora")]
#[command(author, version, about = "Lynora storefront from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog with filters
    Shop(ShopArgs),
    /// Show one product and related dresses
    Product {
        /// Product slug
        slug: String,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for everything in the cart
    Checkout(CheckoutArgs),
    /// Submit a custom design request
    Customize(CustomizeArgs),
}

#[derive(Args)]
struct ShopArgs {
    /// Category slug (repeatable)
    #[arg(long)]
    category: Vec<String>,

    /// Size (repeatable)
    #[arg(long)]
    size: Vec<String>,

    /// Color (repeatable)
    #[arg(long)]
    color: Vec<String>,

    /// Minimum price in dollars
    #[arg(long)]
    min: Option<Decimal>,

    /// Maximum price in dollars
    #[arg(long)]
    max: Option<Decimal>,

    /// Sort order (`featured`, `new`, `price-low`, `price-high`, `name`)
    #[arg(long, default_value = "featured")]
    sort: String,
}

#[derive(Subcommand)]
enum CartAction {
    /// List cart lines and totals
    Show,
    /// Add a product (size and color default to the first offered)
    Add {
        /// Product slug
        slug: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        #[arg(long)]
        size: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },
    /// Add one unit with the default size and color
    QuickAdd {
        /// Product slug
        slug: String,
    },
    /// Change a line's quantity (0 or less removes it)
    Update {
        item: CartItemId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove { item: CartItemId },
    /// Empty the cart
    Clear,
}

#[derive(Args)]
struct CheckoutArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long = "zip")]
    zip_code: String,
    #[arg(long, default_value = "United States")]
    country: String,
}

#[derive(Args)]
struct CustomizeArgs {
    /// Text to print on the dress
    #[arg(long, default_value = "")]
    text: String,

    #[arg(long, default_value = "Arial")]
    font: FontStyle,

    /// Text color as `#RRGGBB`
    #[arg(long, default_value = "#000000")]
    color: String,

    #[arg(long, default_value = "center")]
    placement: Placement,

    /// Anything else we should know
    #[arg(long, default_value = "")]
    notes: String,
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

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lynora_storefront=info,lynora_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            e.report();
            return ExitCode::FAILURE;
        }
    };

    match run(cli, &state).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            output::error(&e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, state: &AppState) -> lynora_storefront::error::Result<()> {
    match cli.command {
        Commands::Shop(args) => {
            let filter = commands::shop::ShopFilter {
                categories: args.category,
                sizes: args.size,
                colors: args.color,
                min: args.min,
                max: args.max,
                sort: SortMode::parse(&args.sort),
            };
            commands::shop::browse(state, filter).await?;
        }
        Commands::Product { slug } => commands::shop::product(state, &slug).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(state).await?,
            CartAction::Add {
                slug,
                quantity,
                size,
                color,
            } => {
                commands::cart::add(state, &slug, quantity, size.as_deref(), color.as_deref())
                    .await?;
            }
            CartAction::QuickAdd { slug } => commands::cart::quick_add(state, &slug).await?,
            CartAction::Update { item, quantity } => {
                commands::cart::update(state, item, quantity).await?;
            }
            CartAction::Remove { item } => commands::cart::remove(state, item).await?,
            CartAction::Clear => commands::cart::clear(state).await?,
        },
        Commands::Checkout(args) => {
            let form = lynora_storefront::checkout::CheckoutForm {
                first_name: args.first_name,
                last_name: args.last_name,
                email: args.email,
                phone: args.phone,
                address: args.address,
                city: args.city,
                state: args.state,
                zip_code: args.zip_code,
                country: args.country,
            };
            commands::checkout::submit(state, &form).await?;
        }
        Commands::Customize(args) => {
            let request = lynora_storefront::customize::CustomizationRequest {
                custom_text: args.text,
                font_style: args.font,
                text_color: args.color,
                placement: args.placement,
                notes: args.notes,
            };
            commands::customize::submit(state, &request).await?;
        }
    }
    Ok(())
}
