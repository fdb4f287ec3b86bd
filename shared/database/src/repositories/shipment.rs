//! Shipment Repository
//!
//! Append-only access to shipment rows.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use shipload_models::{NewShipment, Shipment};

#[derive(Clone)]
pub struct ShipmentRepository {
    pool: SqlitePool,
}

impl ShipmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a shipment row, returning its id
    pub async fn create(&self, shipment: &NewShipment) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO shipment (product_id, quantity, origin, destination)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(shipment.product_id)
        .bind(shipment.quantity)
        .bind(&shipment.origin)
        .bind(&shipment.destination)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to insert shipment for product id {}", shipment.product_id))?;

        Ok(result.last_insert_rowid())
    }

    /// Find all shipments in insertion order
    pub async fn find_all(&self) -> Result<Vec<Shipment>> {
        let rows: Vec<Shipment> = sqlx::query_as(
            r#"
            SELECT id, product_id, quantity, origin, destination
            FROM shipment
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch all shipments")?;

        Ok(rows)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shipment")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count shipments")?;

        Ok(count)
    }
}
