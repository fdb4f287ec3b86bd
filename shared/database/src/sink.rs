//! Persistence sink
//!
//! The narrow write surface the ingestion pipelines need: upsert a product by
//! name, resolve its id, append a shipment. Every call commits on its own.

use anyhow::Result;
use async_trait::async_trait;

use shipload_models::NewShipment;

use crate::repositories::{ProductRepository, ShipmentRepository};
use crate::sqlite::SqlitePool;

#[async_trait]
pub trait ShipmentSink: Send + Sync {
    /// Insert the product if absent, no-op otherwise
    async fn upsert_product(&self, name: &str) -> Result<()>;

    /// Surrogate id of a product, `None` if it does not exist
    async fn resolve_product_id(&self, name: &str) -> Result<Option<i64>>;

    /// Append a shipment row, returning its id
    async fn append_shipment(&self, shipment: &NewShipment) -> Result<i64>;
}

/// `ShipmentSink` backed by the SQLite product and shipment tables
#[derive(Clone)]
pub struct SqliteShipmentSink {
    products: ProductRepository,
    shipments: ShipmentRepository,
}

impl SqliteShipmentSink {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool.clone()),
            shipments: ShipmentRepository::new(pool),
        }
    }

    pub fn products(&self) -> &ProductRepository {
        &self.products
    }

    pub fn shipments(&self) -> &ShipmentRepository {
        &self.shipments
    }
}

#[async_trait]
impl ShipmentSink for SqliteShipmentSink {
    async fn upsert_product(&self, name: &str) -> Result<()> {
        if self.products.insert_if_absent(name).await? {
            tracing::debug!(product = %name, "Created product");
        }
        Ok(())
    }

    async fn resolve_product_id(&self, name: &str) -> Result<Option<i64>> {
        self.products.find_id_by_name(name).await
    }

    async fn append_shipment(&self, shipment: &NewShipment) -> Result<i64> {
        self.shipments.create(shipment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_store;

    #[tokio::test]
    async fn test_product_before_shipment() {
        let (_dir, pool) = temp_store().await;
        let sink = SqliteShipmentSink::new(pool);

        sink.upsert_product("Widget").await.unwrap();
        sink.upsert_product("Widget").await.unwrap();
        let product_id = sink.resolve_product_id("Widget").await.unwrap().unwrap();

        sink.append_shipment(&NewShipment {
            product_id,
            quantity: 3,
            origin: "Berlin".to_string(),
            destination: "Paris".to_string(),
        })
        .await
        .unwrap();

        assert_eq!(sink.products().count().await.unwrap(), 1);
        assert_eq!(sink.shipments().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_product_resolves_to_none() {
        let (_dir, pool) = temp_store().await;
        let sink = SqliteShipmentSink::new(pool);

        assert_eq!(sink.resolve_product_id("Ghost").await.unwrap(), None);
    }
}
