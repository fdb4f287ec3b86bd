//! Shipment domain models.
//!
//! `ShipmentRecord` is what the ingestion pipelines produce: it still names its
//! product. `NewShipment` is the same record once the product name has been
//! resolved to a surrogate id, and `Shipment` is the persisted row.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Persisted shipment row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Shipment {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub origin: String,
    pub destination: String,
}

/// Insert payload for a shipment row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewShipment {
    pub product_id: i64,
    pub quantity: i64,
    pub origin: String,
    pub destination: String,
}

/// Normalized shipment line emitted by the direct and aggregating pipelines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShipmentRecord {
    pub product_name: String,
    pub quantity: i64,
    pub origin: String,
    pub destination: String,
}

impl ShipmentRecord {
    pub fn new(
        product_name: impl Into<String>,
        quantity: i64,
        origin: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            quantity,
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    /// Bind this record to a resolved product id
    pub fn for_product(&self, product_id: i64) -> NewShipment {
        NewShipment {
            product_id,
            quantity: self.quantity,
            origin: self.origin.clone(),
            destination: self.destination.clone(),
        }
    }
}
