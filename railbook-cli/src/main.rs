use clap::{Parser, Subcommand};
use railbook_store::app_config::Config;
use railbook_store::DbClient;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod menu;

#[derive(Parser)]
#[command(name = "railbook", about = "Train seat reservation system")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Bulk-load the train catalog from a CSV export
    Import {
        /// Path to the CSV file
        file: PathBuf,
        /// Capacity to assign to every imported train (default from config)
        #[arg(long)]
        seats: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "railbook=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let db = DbClient::connect(&config.database.path).await?;
    db.migrate().await?;
    tracing::info!(path = %config.database.path, "store ready");

    match cli.command {
        Some(Command::Import { file, seats }) => {
            let seats = seats.unwrap_or(config.catalog.default_seats);
            let report = railbook_catalog::import_trains(&db.pool, &file, seats).await?;
            println!(
                "Imported {} of {} rows ({} skipped), {} seats per train.",
                report.imported, report.rows_read, report.skipped, seats
            );
        }
        None => menu::run(&config, &db).await?,
    }

    Ok(())
}
