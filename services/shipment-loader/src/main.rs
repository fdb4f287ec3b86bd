//! Shipload Shipment Loader
//!
//! Loads shipment CSV exports into the product/shipment SQLite store.
//!
//! Usage: `shipment-loader [DATA_DIR]`. Without an argument the directory
//! comes from configuration (`SHIPLOAD__INPUT__DATA_DIR`, default `./data`).

use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tracing::{error, info};

mod loader;
mod pipeline;
mod report;

use loader::Loader;
use shipload_database::{initialize_database, DatabaseConfig, SqliteShipmentSink};
use shipload_utils::{init_logging, AppConfig};

#[derive(Parser, Debug)]
#[command(name = "shipment-loader")]
#[command(about = "Load shipment CSV exports into the product/shipment store")]
#[command(version)]
struct Cli {
    /// Directory holding the three CSV inputs
    data_dir: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_validated()?;
    init_logging(&config.logging)?;
    info!("Starting Shipload shipment loader");

    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.input.data_dir.clone());

    let pool = initialize_database(&DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        connection_timeout: Duration::from_secs(config.database.connection_timeout_seconds),
    })
    .await?;

    let loader = Loader::new(SqliteShipmentSink::new(pool.clone()), config.input.clone());

    let outcome = match loader.populate(&data_dir).await {
        Ok(report) => {
            report.log_summary();

            let products = loader.sink().products().count().await?;
            let shipments = loader.sink().shipments().count().await?;
            info!(products, shipments, "Store totals");
            tracing::debug!(report = %serde_json::to_string(&report)?, "Load report");
            Ok(())
        }
        Err(e) => {
            error!(
                code = e.error_code(),
                "{}. Ensure the CSV files exist in {}",
                e,
                data_dir
            );
            Err(e.into())
        }
    };

    pool.close().await;
    outcome
}
