//! Product domain model.
//!
//! A product is created on first sighting of its name and never mutated
//! afterwards. The name is the natural key; `id` is the store's surrogate.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
}

impl Product {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
