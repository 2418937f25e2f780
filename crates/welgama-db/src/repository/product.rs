//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Stock Movements
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                            │
//! │                                                                     │
//! │  ❌ WRONG: read stock, check in Rust, write absolute value          │
//! │     (two concurrent sales both pass the check and oversell)         │
//! │                                                                     │
//! │  ✅ CORRECT: atomic conditional delta, enforced by the store        │
//! │     UPDATE products SET quantity = quantity - n                     │
//! │     WHERE id = ? AND quantity >= n                                  │
//! │                                                                     │
//! │  Zero rows affected = stock is short at commit time, regardless     │
//! │  of what the cart-building flow saw earlier. The settlement         │
//! │  transaction rolls back and the sale is rejected.                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use welgama_core::Product;

const PRODUCT_COLUMNS: &str = "id, name, category, unit, cost_price_cents, selling_price_cents, \
     quantity, low_stock_threshold, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products, sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Lists products whose stock is at or below their low-stock threshold.
    pub async fn list_low_stock(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE quantity <= low_stock_threshold ORDER BY name"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by ID inside a transaction.
    ///
    /// Settlement uses this to take the name/cost snapshots from the same
    /// transaction that decrements stock.
    pub async fn get_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, category, unit,
                cost_price_cents, selling_price_cents,
                quantity, low_stock_threshold,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.unit)
        .bind(product.cost_price_cents)
        .bind(product.selling_price_cents)
        .bind(product.quantity)
        .bind(product.low_stock_threshold)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product's details.
    ///
    /// Does NOT touch `quantity`; stock moves only through
    /// [`Self::adjust_stock`] and [`Self::decrement_stock_checked`], so a
    /// concurrent edit can never silently overwrite a stock movement.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                category = ?3,
                unit = ?4,
                cost_price_cents = ?5,
                selling_price_cents = ?6,
                low_stock_threshold = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.unit)
        .bind(product.cost_price_cents)
        .bind(product.selling_price_cents)
        .bind(product.low_stock_threshold)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Adjusts stock by a signed delta, refusing to go below zero.
    ///
    /// ## Returns
    /// * `Ok(true)` - adjustment applied
    /// * `Ok(false)` - adjustment would drive quantity negative
    /// * `Err(NotFound)` - product doesn't exist
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<bool> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity + ?2, updated_at = ?3
            WHERE id = ?1 AND quantity + ?2 >= 0
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Zero rows: missing product or a delta that would go negative
        match self.get_by_id(id).await? {
            None => Err(DbError::not_found("Product", id)),
            Some(_) => Ok(false),
        }
    }

    /// Atomically decrements stock inside a settlement transaction.
    ///
    /// The `quantity >= n` guard is the authoritative availability check:
    /// the earlier cart-flow check is advisory only.
    ///
    /// ## Returns
    /// * `Ok(true)` - stock decremented
    /// * `Ok(false)` - insufficient stock (or unknown product); caller
    ///   rolls back the transaction
    pub async fn decrement_stock_checked(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
    ) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity - ?2, updated_at = ?3
            WHERE id = ?1 AND quantity >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a product.
    ///
    /// The `sale_items.product_id` RESTRICT rule makes this fail with a
    /// foreign-key violation for any product referenced by a sale.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics and seed checks).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
