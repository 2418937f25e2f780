//! # welgama-pos: Operations Layer for Welgama POS
//!
//! The boundary the excluded web/API layer calls into. Every operation
//! takes the authenticated [`Actor`] the auth layer resolved, returns a
//! serializable response, and converts every failure into the uniform
//! [`error::OpError`] `{code, message}` shape; no exception escapes.
//!
//! ## Module Organization
//! ```text
//! welgama_pos/
//! ├── lib.rs          ◄─── You are here (the Pos handle)
//! ├── error.rs        ◄─── OpError: uniform boundary failure shape
//! ├── telemetry.rs    ◄─── tracing-subscriber initialization
//! ├── recorder.rs     ◄─── Activity recorder (channel + worker)
//! ├── settlement.rs   ◄─── settle_immediate_sale / settle_credit_sale
//! ├── payments.rs     ◄─── allocate_payment / reconcile_balance
//! ├── inventory.rs    ◄─── products, stock adjustments, catalog
//! ├── books.rs        ◄─── customers and their outstanding sales
//! ├── drafts.rs       ◄─── staged carts
//! ├── expenses.rs     ◄─── expense ledger
//! └── history.rs      ◄─── sale history and activity queries
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use welgama_db::{Database, DbConfig};
//! use welgama_pos::{recorder, Pos};
//!
//! welgama_pos::telemetry::init();
//!
//! let db = Database::new(DbConfig::new("./welgama.db")).await?;
//! let (activity, worker) = recorder::channel(db.clone(), recorder::DEFAULT_BUFFER);
//! tokio::spawn(worker.run());
//!
//! let pos = Pos::new(db, activity);
//! let receipt = pos.settle_immediate_sale(&actor, None, &cart, None, true).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod books;
pub mod drafts;
pub mod error;
pub mod expenses;
pub mod history;
pub mod inventory;
pub mod payments;
pub mod recorder;
pub mod settlement;
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ErrorCode, OpError};
pub use recorder::{ActivityRecorder, ActivityWorker};

use welgama_db::Database;

/// The operations handle: one per process, cheap to clone.
///
/// Holds the database pool and the activity recorder. Each operation is
/// request-scoped: it runs to completion within the caller's request, with
/// no background state beyond the activity worker.
#[derive(Debug, Clone)]
pub struct Pos {
    db: Database,
    recorder: ActivityRecorder,
}

impl Pos {
    /// Creates the operations handle.
    pub fn new(db: Database, recorder: ActivityRecorder) -> Self {
        Pos { db, recorder }
    }

    /// Returns the underlying database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Returns the activity recorder.
    pub fn recorder(&self) -> &ActivityRecorder {
        &self.recorder
    }

    /// Records an ad-hoc audit entry. Fire and forget: no return value,
    /// and never affects any business operation's outcome.
    pub fn record_activity(
        &self,
        actor: &welgama_core::Actor,
        action_tag: &str,
        description: impl Into<String>,
        metadata: serde_json::Value,
    ) {
        self.recorder.record(actor, action_tag, description, metadata);
    }
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use chrono::Utc;
    use welgama_core::{Actor, Customer, Product};
    use welgama_db::DbConfig;

    /// Builds a Pos over a fresh in-memory database with a live activity
    /// worker.
    pub async fn test_pos() -> Pos {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (recorder, worker) = crate::recorder::channel(db.clone(), 64);
        tokio::spawn(worker.run());
        Pos::new(db, recorder)
    }

    pub fn test_actor() -> Actor {
        Actor::new("u1", "Test Cashier", "cashier")
    }

    pub async fn seed_product(pos: &Pos, id: &str, price_cents: i64, quantity: i64) {
        let now = Utc::now();
        pos.db()
            .products()
            .insert(&Product {
                id: id.to_string(),
                name: format!("Product {id}"),
                category: "General".to_string(),
                unit: "pcs".to_string(),
                cost_price_cents: price_cents / 2,
                selling_price_cents: price_cents,
                quantity,
                low_stock_threshold: 2,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    pub async fn seed_customer(pos: &Pos, id: &str) {
        let now = Utc::now();
        pos.db()
            .customers()
            .insert(&Customer {
                id: id.to_string(),
                name: format!("Customer {id}"),
                phone: None,
                address: None,
                balance_cents: 0,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }
}
