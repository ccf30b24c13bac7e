mod compare;
mod ingest;
mod receipts;

use std::path::PathBuf;

use basket_core::TotalsMode;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "basket-cli")]
#[command(about = "Grocery basket price comparison")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Find the single cheapest store for a basket across every retailer
    Compare {
        /// Product names, e.g. `Milk Bread`
        #[arg(required = true)]
        items: Vec<String>,
        /// `best_effort` or `full_basket_only`; defaults to `BASKET_TOTALS_MODE`
        #[arg(long)]
        mode: Option<TotalsMode>,
        /// Print the result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show each retailer's own cheapest listings, grouped by store
    Breakdown {
        #[arg(required = true)]
        items: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Parse promotion or receipt text into a catalog JSON file or the database
    Ingest {
        /// Text extracted from a catalogue or receipt
        input: PathBuf,
        /// Where to write the records
        #[arg(long, default_value = "products_data.json")]
        output: PathBuf,
        /// Store name to stamp on every record
        #[arg(long)]
        store: Option<String>,
        /// Keyword to look for (repeatable); defaults to the built-in list
        #[arg(long = "keyword")]
        keywords: Vec<String>,
        /// Print the records instead of writing them
        #[arg(long)]
        dry_run: bool,
        /// Store the records in the `products` table instead of a JSON file
        #[arg(long, conflicts_with_all = ["output", "dry_run"])]
        db: bool,
        /// With --db, drop the store's existing products first
        #[arg(long, requires = "db")]
        replace: bool,
    },
    /// Manage remembered receipt prices
    Receipts {
        #[command(subcommand)]
        command: ReceiptsCommands,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ReceiptsCommands {
    /// List every stored receipt
    List,
    /// Insert or replace the receipt for a product
    Add {
        product: String,
        price: Decimal,
        /// Purchase date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Update the receipt for a product that already has one
    Update {
        product: String,
        price: Decimal,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete the receipt for a product
    Delete { product: String },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Apply pending migrations
    Migrate,
    /// Check the database connection
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = basket_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Compare { items, mode, json }) => {
            compare::run_compare(&config, &items, mode.unwrap_or(config.totals_mode), json)
                .await?;
        }
        Some(Commands::Breakdown { items, json }) => {
            compare::run_breakdown(&config, &items, json).await?;
        }
        Some(Commands::Ingest {
            input,
            output,
            store,
            keywords,
            dry_run,
            db,
            replace,
        }) => {
            let store = store.as_deref();
            if db {
                let pool = connect(&config).await?;
                basket_db::run_migrations(&pool).await?;
                let target = ingest::IngestTarget::Database {
                    pool: &pool,
                    replace_store: replace,
                };
                ingest::run_ingest(&input, store, &keywords, target).await?;
            } else if dry_run {
                ingest::run_ingest(&input, store, &keywords, ingest::IngestTarget::DryRun).await?;
            } else {
                let target = ingest::IngestTarget::File(&output);
                ingest::run_ingest(&input, store, &keywords, target).await?;
            }
        }
        Some(Commands::Receipts { command }) => {
            let pool = connect(&config).await?;
            match command {
                ReceiptsCommands::List => receipts::run_list(&pool).await?,
                ReceiptsCommands::Add {
                    product,
                    price,
                    date,
                } => receipts::run_add(&pool, &product, price, date).await?,
                ReceiptsCommands::Update {
                    product,
                    price,
                    date,
                } => receipts::run_update(&pool, &product, price, date).await?,
                ReceiptsCommands::Delete { product } => {
                    receipts::run_delete(&pool, &product).await?;
                }
            }
        }
        Some(Commands::Db { command }) => {
            let pool = connect(&config).await?;
            match command {
                DbCommands::Migrate => {
                    let applied = basket_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
                DbCommands::Ping => {
                    basket_db::health_check(&pool).await?;
                    println!("database ok");
                }
            }
        }
        None => Cli::command().print_help()?,
    }

    Ok(())
}

async fn connect(config: &basket_core::AppConfig) -> anyhow::Result<sqlx::SqlitePool> {
    let pool_config = basket_db::PoolConfig::from_app_config(config);
    Ok(basket_db::connect_pool(&config.database_url, pool_config).await?)
}

#[cfg(test)]
mod tests;
