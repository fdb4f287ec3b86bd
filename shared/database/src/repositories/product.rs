//! Product Repository
//!
//! Insert-if-absent and lookup by name for product rows.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use shipload_models::Product;

#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a product unless one with the same name exists.
    /// Returns `true` when a new row was created.
    pub async fn insert_if_absent(&self, name: &str) -> Result<bool> {
        let result = sqlx::query("INSERT OR IGNORE INTO product (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to insert product '{}'", name))?;

        Ok(result.rows_affected() > 0)
    }

    /// Find the surrogate id for a product name
    pub async fn find_id_by_name(&self, name: &str) -> Result<Option<i64>> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM product WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to look up product '{}'", name))?;

        Ok(id)
    }

    /// Find all products
    pub async fn find_all(&self) -> Result<Vec<Product>> {
        let rows: Vec<Product> = sqlx::query_as("SELECT id, name FROM product ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch all products")?;

        Ok(rows)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count products")?;

        Ok(count)
    }
}
