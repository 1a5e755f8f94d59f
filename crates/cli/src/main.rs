//! ToolLink CLI - inventory management from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List items in the metals warehouse that match "rebar"
//! tl-cli list --warehouse WM --search rebar
//!
//! # Create an item from a quick-add template
//! tl-cli create --quick "River Sand" --quantity 40 --supplier "Coastal Quarries"
//!
//! # Add stock to an existing item
//! tl-cli adjust 65f1c0de --type add --quantity 25 --reason "Delivery 4471"
//!
//! # Show warehouses, categories and quick-add templates
//! tl-cli catalog
//! ```
//!
//! # Commands
//!
//! - `list` / `show` / `low-stock` / `stats` - Read inventory
//! - `create` / `update` / `delete` / `adjust` - Change inventory
//! - `catalog` - Print the compiled-in warehouse catalog (no backend needed)
//!
//! Configuration comes from `TOOLLINK_*` environment variables; see
//! [`toollink_client::ClientConfig`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use toollink_client::{ClientConfig, ConfigError};
use toollink_core::{AdjustmentType, ItemId, Warehouse, WarehouseFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod output;

use commands::ItemArgs;

#[derive(Parser)]
#[command(name = "tl-cli")]
#[command(author, version, about = "ToolLink inventory tools")]
struct Cli {
    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List inventory items
    List {
        /// Case-insensitive text matched against name, id and category
        #[arg(short, long, default_value = "")]
        search: String,

        /// Exact category, or `all`
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Warehouse code or name, or `all`
        #[arg(short, long, default_value = "all")]
        warehouse: WarehouseFilter,

        /// Only show items at or below their threshold
        #[arg(long)]
        low_stock: bool,
    },
    /// Show one item
    Show {
        id: ItemId,
    },
    /// Create an item
    Create {
        /// Start from a quick-add template (see `catalog`)
        #[arg(long)]
        quick: Option<String>,

        #[command(flatten)]
        item: ItemArgs,
    },
    /// Update an item, replacing the whole record
    Update {
        id: ItemId,

        #[command(flatten)]
        item: ItemArgs,
    },
    /// Delete an item
    Delete {
        id: ItemId,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Set, add to, or subtract from an item's stock
    Adjust {
        id: ItemId,

        #[arg(short = 't', long = "type", default_value = "set")]
        adjustment_type: AdjustmentType,

        #[arg(short, long)]
        quantity: u32,

        #[arg(short, long, default_value = "")]
        reason: String,
    },
    /// Show inventory statistics
    Stats {
        /// Compute from the item list instead of asking the backend
        #[arg(long)]
        local: bool,
    },
    /// List items at or below their threshold
    LowStock,
    /// Show warehouses, categories and quick-add templates
    Catalog {
        /// Only this warehouse
        #[arg(short, long)]
        warehouse: Option<Warehouse>,
    },
}

fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

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
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "toollink_cli=info,toollink_client=info".into());

    // Logs go to stderr so that stdout stays clean for command output
    let json = std::env::var("TOOLLINK_LOG_JSON").is_ok();
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Sentry must be initialized before the tracing subscriber
    let config = ClientConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(
    cli: Cli,
    config: Result<ClientConfig, ConfigError>,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = output::Format::from_json_flag(cli.json);

    // The catalog is compiled in and works without a backend
    if let Commands::Catalog { warehouse } = cli.command {
        output::catalog(format, warehouse)?;
        return Ok(());
    }

    let config = config?;
    let view = commands::connect(&config)?;

    match cli.command {
        Commands::List {
            search,
            category,
            warehouse,
            low_stock,
        } => {
            commands::items::list(&view, format, search, &category, warehouse, low_stock).await?;
        }
        Commands::Show { id } => commands::items::show(&view, format, &id).await?,
        Commands::Create { quick, item } => {
            commands::items::create(&view, &config, quick.as_deref(), item).await?;
        }
        Commands::Update { id, item } => commands::items::update(&view, &id, item).await?,
        Commands::Delete { id, yes } => commands::items::delete(&view, &id, yes).await?,
        Commands::Adjust {
            id,
            adjustment_type,
            quantity,
            reason,
        } => {
            commands::items::adjust(&view, format, &id, adjustment_type, quantity, reason).await?;
        }
        Commands::Stats { local } => commands::stats::stats(&view, format, local).await?,
        Commands::LowStock => commands::stats::low_stock(&view, format).await?,
        Commands::Catalog { .. } => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_filters() {
        let Ok(Cli {
            command:
                Commands::List {
                    warehouse,
                    low_stock,
                    category,
                    ..
                },
            ..
        }) = Cli::try_parse_from(["tl-cli", "list", "-w", "metal yard", "--low-stock"])
        else {
            panic!("expected list command");
        };
        assert_eq!(warehouse, WarehouseFilter::Only(Warehouse::Metals));
        assert!(low_stock);
        assert_eq!(category, "all");
    }

    #[test]
    fn test_parse_adjust() {
        let cli = Cli::try_parse_from([
            "tl-cli", "adjust", "abc", "--type", "subtract", "-q", "4", "-r", "breakage",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Adjust {
                adjustment_type: AdjustmentType::Subtract,
                quantity: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_negative_quantity_reaches_validation() {
        let cli = Cli::try_parse_from(["tl-cli", "create", "--name", "Sand", "--quantity", "-5"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Create { ref item, .. }) if item.quantity == Some(-5)
        ));
    }
}
