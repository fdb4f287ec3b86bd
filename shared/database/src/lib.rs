pub mod sqlite;
pub mod migrations;
pub mod repositories;
pub mod sink;

pub use sqlite::{SqlitePool, create_sqlite_pool};
pub use repositories::*;
pub use sink::{ShipmentSink, SqliteShipmentSink};

use anyhow::Result;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://shipment_database.db".to_string(),
            max_connections: 1,
            connection_timeout: Duration::from_secs(30),
        }
    }
}

/// Connect and make sure the product and shipment tables exist
pub async fn initialize_database(config: &DatabaseConfig) -> Result<SqlitePool> {
    let pool = create_sqlite_pool(&config.url, config.max_connections, config.connection_timeout).await?;

    migrations::run_sqlite_migrations(&pool).await?;

    Ok(pool)
}
