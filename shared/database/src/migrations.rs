use anyhow::Result;
use sqlx::SqlitePool;

/// Create the product and shipment tables if absent. Existing tables are
/// left untouched.
pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<()> {
    tracing::debug!("Ensuring SQLite schema");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS product (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shipment (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id INTEGER,
            quantity INTEGER,
            origin TEXT,
            destination TEXT,
            FOREIGN KEY (product_id) REFERENCES product(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::debug!("SQLite schema ready");
    Ok(())
}
