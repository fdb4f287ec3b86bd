//! Transient per-shipment aggregation state.
//!
//! One `ShipmentAggregate` exists per shipment identifier seen in the header
//! stream. Each product line adds one unit to the product's running count.
//! Products keep the order in which they were first seen so that flushing is
//! deterministic.

use std::collections::HashMap;

use crate::shipment::ShipmentRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentAggregate {
    pub shipment_id: String,
    pub origin: String,
    pub destination: String,
    products: Vec<(String, i64)>,
    positions: HashMap<String, usize>,
}

impl ShipmentAggregate {
    pub fn new(
        shipment_id: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            shipment_id: shipment_id.into(),
            origin: origin.into(),
            destination: destination.into(),
            products: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Record one unit of `product_name` in this shipment
    pub fn add_unit(&mut self, product_name: &str) {
        match self.positions.get(product_name) {
            Some(&idx) => self.products[idx].1 += 1,
            None => {
                self.positions
                    .insert(product_name.to_string(), self.products.len());
                self.products.push((product_name.to_string(), 1));
            }
        }
    }

    /// Running count for a product, zero if never seen
    #[cfg(test)]
    pub fn count_for(&self, product_name: &str) -> i64 {
        self.positions
            .get(product_name)
            .map(|&idx| self.products[idx].1)
            .unwrap_or(0)
    }

    /// Number of distinct products in this shipment
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Flatten into one shipment record per product.
    /// An aggregate without product lines yields nothing.
    pub fn into_records(self) -> Vec<ShipmentRecord> {
        let Self {
            origin,
            destination,
            products,
            ..
        } = self;

        products
            .into_iter()
            .map(|(name, count)| ShipmentRecord::new(name, count, origin.clone(), destination.clone()))
            .collect()
    }
}
