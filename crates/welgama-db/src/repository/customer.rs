//! # Customer Repository
//!
//! Database operations for credit-book customers.
//!
//! ## The Cached Balance
//! `customers.balance_cents` is a derived-but-stored aggregate: it exists
//! so the books screen reads one column instead of summing dues across
//! sales on every view. It is only ever written inside the same
//! transaction as the sale/payment rows that change it, and the
//! reconciliation query below recomputes the true value from source
//! sales for drift detection.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use welgama_core::Customer;

const CUSTOMER_COLUMNS: &str =
    "id, name, phone, address, balance_cents, created_at, updated_at";

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists all customers, sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name");
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1");
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Inserts a new customer.
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, name = %customer.name, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (
                id, name, phone, address, balance_cents, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(customer.phone.as_deref())
        .bind(customer.address.as_deref())
        .bind(customer.balance_cents)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a customer's contact details.
    ///
    /// Does NOT touch `balance_cents`; the balance moves only through
    /// the transactional methods below.
    pub async fn update(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, "Updating customer");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE customers SET
                name = ?2,
                phone = ?3,
                address = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(customer.phone.as_deref())
        .bind(customer.address.as_deref())
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", &customer.id));
        }

        Ok(())
    }

    /// Deletes a customer. Fails with a foreign-key violation while the
    /// customer has recorded sales or payments.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Increments the cached balance inside a transaction (credit sale,
    /// partially-paid sale).
    pub async fn increment_balance(
        conn: &mut SqliteConnection,
        id: &str,
        delta_cents: i64,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE customers
            SET balance_cents = balance_cents + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta_cents)
        .bind(now)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Deducts an applied payment from the cached balance inside a
    /// transaction, clamping at zero.
    ///
    /// The `MAX(..., 0)` clamp enforces the balance invariant in the
    /// store itself: an over-applied amount can never persist a negative
    /// balance.
    pub async fn deduct_balance_clamped(
        conn: &mut SqliteConnection,
        id: &str,
        amount_cents: i64,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE customers
            SET balance_cents = MAX(balance_cents - ?2, 0), updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(amount_cents)
        .bind(now)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Overwrites the cached balance (reconciliation repair only).
    pub async fn set_balance(&self, id: &str, balance_cents: i64) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE customers SET balance_cents = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(balance_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Recomputes the customer's outstanding balance from source sales:
    /// the sum of `total - paid` across unpaid/partial sales.
    pub async fn computed_outstanding(&self, id: &str) -> DbResult<i64> {
        let outstanding: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT SUM(total_cents - amount_paid_cents)
            FROM sales
            WHERE customer_id = ?1 AND payment_status != 'paid'
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(outstanding.unwrap_or(0))
    }
}

/// Helper to generate a new customer ID.
pub fn generate_customer_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn customer(id: &str, balance: i64) -> Customer {
        let now = Utc::now();
        Customer {
            id: id.to_string(),
            name: format!("Customer {id}"),
            phone: Some("0771234567".to_string()),
            address: None,
            balance_cents: balance,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.insert(&customer("c1", 0)).await.unwrap();

        let customers = repo.list().await.unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].phone.as_deref(), Some("0771234567"));
    }

    #[tokio::test]
    async fn test_balance_deduct_clamps_at_zero() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.insert(&customer("c1", 100)).await.unwrap();

        let mut tx = db.begin().await.unwrap();
        CustomerRepository::deduct_balance_clamped(&mut tx, "c1", 150)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let loaded = repo.get_by_id("c1").await.unwrap().unwrap();
        assert_eq!(loaded.balance_cents, 0);
    }

    #[tokio::test]
    async fn test_increment_balance() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.insert(&customer("c1", 0)).await.unwrap();

        let mut tx = db.begin().await.unwrap();
        CustomerRepository::increment_balance(&mut tx, "c1", 25000)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let loaded = repo.get_by_id("c1").await.unwrap().unwrap();
        assert_eq!(loaded.balance_cents, 25000);
    }

    #[tokio::test]
    async fn test_update_preserves_balance() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.insert(&customer("c1", 5000)).await.unwrap();

        let mut edited = customer("c1", 999999); // balance field is ignored
        edited.name = "Renamed".to_string();
        repo.update(&edited).await.unwrap();

        let loaded = repo.get_by_id("c1").await.unwrap().unwrap();
        assert_eq!(loaded.name, "Renamed");
        assert_eq!(loaded.balance_cents, 5000);
    }
}
