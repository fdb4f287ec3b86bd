//! Repository module for database operations
//!
//! Typed repositories for the product and shipment tables.

pub mod product;
pub mod shipment;

pub use product::ProductRepository;
pub use shipment::ShipmentRepository;
