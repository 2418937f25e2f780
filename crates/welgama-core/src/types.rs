//! # Domain Types
//!
//! Core domain types used throughout Welgama POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐             │
//! │  │   Product    │   │   Customer   │   │     Sale     │             │
//! │  │ ──────────── │   │ ──────────── │   │ ──────────── │             │
//! │  │ id (UUID)    │   │ id (UUID)    │   │ id (UUID)    │             │
//! │  │ quantity     │   │ balance      │   │ total_cents  │             │
//! │  │ prices       │   │ (credit owed)│   │ statuses     │             │
//! │  └──────────────┘   └──────────────┘   └──────┬───────┘             │
//! │                                               │                     │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────┴───────┐             │
//! │  │   Payment    │   │    Draft     │   │   SaleItem   │             │
//! │  │ (per sale)   │   │ (staged cart)│   │ (snapshots)  │             │
//! │  └──────────────┘   └──────────────┘   └──────────────┘             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has a UUID v4 `id` used for database relations. Sales also
//! carry a human-readable `receipt_number`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Status Enums
// =============================================================================

/// Payment status of a sale.
///
/// Derivable from amounts: `Paid` iff paid >= total, `Partial` iff
/// 0 < paid < total, `Credit` iff paid == 0 at creation. Transitions only
/// move forward: Credit → Partial → Paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Fully paid (at the counter or after allocation).
    Paid,
    /// Recorded in the book with zero payment.
    Credit,
    /// Partially paid; a positive due remains.
    Partial,
}

/// Fulfilment status of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Goods handed over at the counter.
    Completed,
    /// Awaiting delivery to the customer.
    PendingDelivery,
}

/// How a line discount is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Fixed amount in cents.
    Amount,
    /// Whole-number percentage (0-100) of the gross line total.
    Percentage,
}

impl Default for DiscountType {
    fn default() -> Self {
        DiscountType::Amount
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Category name (managed via the catalog tables).
    pub category: String,

    /// Unit of measure name (pcs, kg, m, ...).
    pub unit: String,

    /// Purchase cost in cents (for margin reporting).
    pub cost_price_cents: i64,

    /// Selling price in cents.
    pub selling_price_cents: i64,

    /// Current stock level. Decremented exactly once per sale item.
    pub quantity: i64,

    /// Stock level at or below which the product is flagged low.
    pub low_stock_threshold: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the selling price as a Money type.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }

    /// Returns the cost price as a Money type.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// Checks whether stock is at or below the low-stock threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A credit-book customer.
///
/// `balance_cents` is a cached aggregate of outstanding dues, updated
/// transactionally with every credit sale and payment. Invariant: never
/// negative, and (procedurally) equal to the sum of dues across the
/// customer's unpaid/partial sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub balance_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Returns the running credit balance as Money.
    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_cents(self.balance_cents)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale transaction.
///
/// Created atomically with its line items. Immutable thereafter except via
/// new payments (allocation) or the delivery flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub receipt_number: String,
    /// None = walk-in sale.
    pub customer_id: Option<String>,
    pub total_cents: i64,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub amount_paid_cents: i64,
    pub change_given_cents: i64,
    pub is_delivered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the cumulative amount paid as Money.
    #[inline]
    pub fn amount_paid(&self) -> Money {
        Money::from_cents(self.amount_paid_cents)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
/// Uses the snapshot pattern to freeze product data at time of sale:
/// later product edits must never retroactively affect historical sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Unit selling price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Unit cost in cents at time of sale (frozen).
    pub cost_price_cents: i64,
    /// Discount value: cents for `Amount`, percent for `Percentage`.
    pub discount_value: i64,
    pub discount_type: DiscountType,
    /// Line total after discount.
    pub subtotal_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl SaleItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Payment
// =============================================================================

/// A payment applied to a sale.
/// A sale can accumulate multiple payments over time; the allocator
/// guarantees their sum never exceeds the sale total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: String,
    pub sale_id: String,
    pub customer_id: Option<String>,
    pub amount_cents: i64,
    /// Informational note (residual disclosure); never used in calculations.
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Returns the payment amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Cart Line (settlement input)
// =============================================================================

/// One line of a cart handed to settlement.
///
/// The caller (cart-building flow) locks the unit price and pre-computes
/// the subtotal; settlement re-derives nothing except the sale total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub discount_value: i64,
    pub discount_type: DiscountType,
    pub subtotal_cents: i64,
}

impl CartLine {
    /// Returns the pre-computed line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Draft
// =============================================================================

/// A saved, not-yet-committed cart.
/// Staging only: no stock or balance effect until converted into a Sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Draft {
    pub id: String,
    pub customer_id: Option<String>,
    /// JSON-serialized `Vec<CartLine>`.
    pub items: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Draft {
    /// Deserializes the staged cart lines.
    pub fn lines(&self) -> Result<Vec<CartLine>, serde_json::Error> {
        serde_json::from_str(&self.items)
    }
}

// =============================================================================
// Expense
// =============================================================================

/// An entry in the independent expense ledger. No relation to sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub reason: String,
    pub amount_cents: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Activity Log
// =============================================================================

/// An append-only audit trail entry. Never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ActivityEntry {
    pub id: String,
    /// Machine-readable action tag: `sale.complete`, `payment.record`, ...
    pub action: String,
    /// Human description.
    pub description: String,
    /// Free-form JSON metadata, stored as text.
    pub metadata: String,
    pub actor_id: String,
    pub actor_name: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Catalog Lookups
// =============================================================================

/// A product category managed through the inventory screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A unit of measure (pcs, kg, m, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UnitOfMeasure {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Actor
// =============================================================================

/// The authenticated actor identity supplied by the (external) auth layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub role: String,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Actor {
            id: id.into(),
            name: name.into(),
            role: role.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_low_stock_flag() {
        let now = Utc::now();
        let product = Product {
            id: "p1".to_string(),
            name: "4-inch Nails 1kg".to_string(),
            category: "Fasteners".to_string(),
            unit: "kg".to_string(),
            cost_price_cents: 30000,
            selling_price_cents: 42000,
            quantity: 3,
            low_stock_threshold: 5,
            created_at: now,
            updated_at: now,
        };
        assert!(product.is_low_stock());
    }

    #[test]
    fn test_draft_lines_round_trip() {
        let lines = vec![CartLine {
            product_id: "p1".to_string(),
            quantity: 2,
            unit_price_cents: 42000,
            discount_value: 0,
            discount_type: DiscountType::Amount,
            subtotal_cents: 84000,
        }];
        let now = Utc::now();
        let draft = Draft {
            id: "d1".to_string(),
            customer_id: None,
            items: serde_json::to_string(&lines).unwrap(),
            created_at: now,
            updated_at: now,
        };

        let parsed = draft.lines().unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].subtotal_cents, 84000);
    }

    #[test]
    fn test_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Paid).unwrap(),
            "\"paid\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::PendingDelivery).unwrap(),
            "\"pending_delivery\""
        );
        assert_eq!(
            serde_json::to_string(&DiscountType::Percentage).unwrap(),
            "\"percentage\""
        );
    }
}
