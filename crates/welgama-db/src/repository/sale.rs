//! # Sale Repository
//!
//! Database operations for sales, sale items, and payments.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Sale Lifecycle                               │
//! │                                                                     │
//! │  1. SETTLE (one transaction, welgama-pos)                           │
//! │     └── insert(sale) + add_item() per line + stock decrements       │
//! │                                                                     │
//! │  2. PAYMENTS (credit/partial sales only)                            │
//! │     └── add_payment() + apply_payment() per allocation              │
//! │         Credit → Partial → Paid, forward only                       │
//! │                                                                     │
//! │  3. DELIVERY (pending_delivery sales only)                          │
//! │     └── mark_delivered()                                            │
//! │                                                                     │
//! │  No void, no reversal: after creation only payments and the         │
//! │  delivery flag can mutate a sale.                                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use welgama_core::{Payment, PaymentStatus, Sale, SaleItem};

const SALE_COLUMNS: &str = "id, receipt_number, customer_id, total_cents, payment_status, \
     order_status, amount_paid_cents, change_given_cents, is_delivered, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, sale_id, product_id, name_snapshot, quantity, unit_price_cents, \
     cost_price_cents, discount_value, discount_type, subtotal_cents, created_at";

const PAYMENT_COLUMNS: &str = "id, sale_id, customer_id, amount_cents, note, created_at";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Lists recent sales, newest first.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales ORDER BY created_at DESC LIMIT ?1");
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Lists a customer's outstanding (unpaid/partial) sales, oldest
    /// first: the allocator's working set, already in allocation order.
    pub async fn list_outstanding(&self, customer_id: &str) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales \
             WHERE customer_id = ?1 AND payment_status != 'paid' \
             ORDER BY created_at ASC"
        );
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Lists sales awaiting delivery, oldest first.
    pub async fn list_pending_delivery(&self) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales \
             WHERE order_status = 'pending_delivery' ORDER BY created_at ASC"
        );
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Gets all items for a sale.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM sale_items WHERE sale_id = ?1 ORDER BY created_at");
        let items = sqlx::query_as::<_, SaleItem>(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Gets all payments for a sale, oldest first.
    pub async fn get_payments(&self, sale_id: &str) -> DbResult<Vec<Payment>> {
        let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE sale_id = ?1 ORDER BY created_at");
        let payments = sqlx::query_as::<_, Payment>(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }

    /// Gets total amount paid for a sale from its payment rows.
    pub async fn get_total_paid(&self, sale_id: &str) -> DbResult<i64> {
        let total: Option<i64> =
            sqlx::query_scalar("SELECT SUM(amount_cents) FROM payments WHERE sale_id = ?1")
                .bind(sale_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(total.unwrap_or(0))
    }

    // -------------------------------------------------------------------------
    // Transactional writes (settlement / allocation)
    // -------------------------------------------------------------------------

    /// Inserts a sale inside a settlement transaction.
    pub async fn insert(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, receipt_number = %sale.receipt_number, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, receipt_number, customer_id, total_cents,
                payment_status, order_status,
                amount_paid_cents, change_given_cents, is_delivered,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.receipt_number)
        .bind(sale.customer_id.as_deref())
        .bind(sale.total_cents)
        .bind(sale.payment_status)
        .bind(sale.order_status)
        .bind(sale.amount_paid_cents)
        .bind(sale.change_given_cents)
        .bind(sale.is_delivered)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Adds a line item inside a settlement transaction.
    ///
    /// ## Snapshot Pattern
    /// Product name, price, and cost are copied onto the item, preserving
    /// sale history even if the product is edited later.
    pub async fn add_item(conn: &mut SqliteConnection, item: &SaleItem) -> DbResult<()> {
        debug!(sale_id = %item.sale_id, product_id = %item.product_id, "Adding sale item");

        sqlx::query(
            r#"
            INSERT INTO sale_items (
                id, sale_id, product_id, name_snapshot,
                quantity, unit_price_cents, cost_price_cents,
                discount_value, discount_type, subtotal_cents,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&item.id)
        .bind(&item.sale_id)
        .bind(&item.product_id)
        .bind(&item.name_snapshot)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(item.cost_price_cents)
        .bind(item.discount_value)
        .bind(item.discount_type)
        .bind(item.subtotal_cents)
        .bind(item.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Records a payment row inside an allocation transaction.
    pub async fn add_payment(conn: &mut SqliteConnection, payment: &Payment) -> DbResult<()> {
        debug!(sale_id = %payment.sale_id, amount = %payment.amount_cents, "Recording payment");

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, sale_id, customer_id, amount_cents, note, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.sale_id)
        .bind(payment.customer_id.as_deref())
        .bind(payment.amount_cents)
        .bind(payment.note.as_deref())
        .bind(payment.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Applies an allocated amount to a sale inside an allocation
    /// transaction: bumps the cumulative paid amount and moves the
    /// payment status forward.
    pub async fn apply_payment(
        conn: &mut SqliteConnection,
        sale_id: &str,
        amount_cents: i64,
        new_status: PaymentStatus,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE sales SET
                amount_paid_cents = amount_paid_cents + ?2,
                payment_status = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(sale_id)
        .bind(amount_cents)
        .bind(new_status)
        .bind(now)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", sale_id));
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Delivery
    // -------------------------------------------------------------------------

    /// Marks a pending-delivery sale as delivered.
    pub async fn mark_delivered(&self, sale_id: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE sales SET
                is_delivered = 1,
                order_status = 'completed',
                updated_at = ?2
            WHERE id = ?1 AND order_status = 'pending_delivery'
            "#,
        )
        .bind(sale_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale (pending delivery)", sale_id));
        }

        Ok(())
    }
}

/// Generates a receipt number in format: YYMMDD-HHMMSS-NNNN
///
/// The trailing component breaks ties for sales settled within the same
/// second on one terminal.
pub fn generate_receipt_number() -> String {
    let now = Utc::now();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let tiebreak = (nanos % 10000) as u16;
    format!("{}-{:04}", now.format("%y%m%d-%H%M%S"), tiebreak)
}

/// Generates a new sale ID.
pub fn generate_sale_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new sale item ID.
pub fn generate_sale_item_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new payment ID.
pub fn generate_payment_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use welgama_core::{DiscountType, OrderStatus};

    fn sale(id: &str, customer: Option<&str>, total: i64, status: PaymentStatus) -> Sale {
        let now = Utc::now();
        Sale {
            id: id.to_string(),
            receipt_number: generate_receipt_number(),
            customer_id: customer.map(str::to_string),
            total_cents: total,
            payment_status: status,
            order_status: OrderStatus::Completed,
            amount_paid_cents: match status {
                PaymentStatus::Paid => total,
                _ => 0,
            },
            change_given_cents: 0,
            is_delivered: true,
            created_at: now,
            updated_at: now,
        }
    }

    async fn insert_customer(db: &Database, id: &str) {
        let now = Utc::now();
        db.customers()
            .insert(&welgama_core::Customer {
                id: id.to_string(),
                name: "Test Customer".to_string(),
                phone: None,
                address: None,
                balance_cents: 0,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_insert_and_get_sale() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let s = sale("s1", None, 10000, PaymentStatus::Paid);
        let mut tx = db.begin().await.unwrap();
        SaleRepository::insert(&mut tx, &s).await.unwrap();
        tx.commit().await.unwrap();

        let loaded = db.sales().get_by_id("s1").await.unwrap().unwrap();
        assert_eq!(loaded.total_cents, 10000);
        assert_eq!(loaded.payment_status, PaymentStatus::Paid);
        assert!(loaded.customer_id.is_none());
    }

    #[tokio::test]
    async fn test_items_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let now = Utc::now();
        db.products()
            .insert(&welgama_core::Product {
                id: "p1".to_string(),
                name: "PVC Pipe".to_string(),
                category: "Plumbing".to_string(),
                unit: "pcs".to_string(),
                cost_price_cents: 20000,
                selling_price_cents: 30000,
                quantity: 10,
                low_stock_threshold: 2,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let s = sale("s1", None, 30000, PaymentStatus::Paid);
        let mut tx = db.begin().await.unwrap();
        SaleRepository::insert(&mut tx, &s).await.unwrap();
        SaleRepository::add_item(
            &mut tx,
            &SaleItem {
                id: generate_sale_item_id(),
                sale_id: "s1".to_string(),
                product_id: "p1".to_string(),
                name_snapshot: "PVC Pipe".to_string(),
                quantity: 1,
                unit_price_cents: 30000,
                cost_price_cents: 20000,
                discount_value: 0,
                discount_type: DiscountType::Amount,
                subtotal_cents: 30000,
                created_at: now,
            },
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let items = db.sales().get_items("s1").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name_snapshot, "PVC Pipe");
    }

    #[tokio::test]
    async fn test_outstanding_ordering() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        insert_customer(&db, "c1").await;

        let mut older = sale("older", Some("c1"), 10000, PaymentStatus::Credit);
        older.created_at = Utc::now() - chrono::Duration::days(7);
        let newer = sale("newer", Some("c1"), 5000, PaymentStatus::Credit);
        let paid = sale("paid", Some("c1"), 2000, PaymentStatus::Paid);

        let mut tx = db.begin().await.unwrap();
        // Insert newest first to prove ordering comes from the query
        SaleRepository::insert(&mut tx, &newer).await.unwrap();
        SaleRepository::insert(&mut tx, &older).await.unwrap();
        SaleRepository::insert(&mut tx, &paid).await.unwrap();
        tx.commit().await.unwrap();

        let outstanding = db.sales().list_outstanding("c1").await.unwrap();
        assert_eq!(outstanding.len(), 2);
        assert_eq!(outstanding[0].id, "older");
        assert_eq!(outstanding[1].id, "newer");
    }

    #[tokio::test]
    async fn test_payments_and_totals() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        insert_customer(&db, "c1").await;

        let s = sale("s1", Some("c1"), 10000, PaymentStatus::Credit);
        let mut tx = db.begin().await.unwrap();
        SaleRepository::insert(&mut tx, &s).await.unwrap();
        SaleRepository::add_payment(
            &mut tx,
            &Payment {
                id: generate_payment_id(),
                sale_id: "s1".to_string(),
                customer_id: Some("c1".to_string()),
                amount_cents: 4000,
                note: None,
                created_at: Utc::now(),
            },
        )
        .await
        .unwrap();
        SaleRepository::apply_payment(&mut tx, "s1", 4000, PaymentStatus::Partial)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(db.sales().get_total_paid("s1").await.unwrap(), 4000);

        let loaded = db.sales().get_by_id("s1").await.unwrap().unwrap();
        assert_eq!(loaded.amount_paid_cents, 4000);
        assert_eq!(loaded.payment_status, PaymentStatus::Partial);
    }

    #[tokio::test]
    async fn test_mark_delivered_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut s = sale("s1", None, 10000, PaymentStatus::Paid);
        s.order_status = OrderStatus::PendingDelivery;
        s.is_delivered = false;

        let mut tx = db.begin().await.unwrap();
        SaleRepository::insert(&mut tx, &s).await.unwrap();
        tx.commit().await.unwrap();

        db.sales().mark_delivered("s1").await.unwrap();

        let loaded = db.sales().get_by_id("s1").await.unwrap().unwrap();
        assert!(loaded.is_delivered);
        assert_eq!(loaded.order_status, OrderStatus::Completed);

        // Second attempt: no longer pending
        assert!(db.sales().mark_delivered("s1").await.is_err());
    }
}
