//! # Shipload Domain Models
//!
//! Core types shared by the loader, the record source and the persistence layer.
//!
//! ## Key Models
//!
//! - **Product**: a product row, unique by name
//! - **Shipment**: a persisted shipment row referencing a product
//! - **NewShipment**: insert payload for a shipment row
//! - **ShipmentRecord**: normalized output of both ingestion pipelines
//! - **ShipmentAggregate**: per-shipment running product counts built by the
//!   aggregating pipeline

pub mod product;
pub mod shipment;
pub mod aggregate;

#[cfg(test)]
pub mod property_tests;

pub use product::*;
pub use shipment::*;
pub use aggregate::*;
