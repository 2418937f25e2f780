//! # welgama-db: Database Layer for Welgama POS
//!
//! Database access for the Welgama POS system: SQLite for local storage,
//! sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Welgama POS Data Flow                           │
//! │                                                                     │
//! │  Operation (welgama-pos: settle_immediate_sale, ...)                │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                   welgama-db (THIS CRATE)                     │ │
//! │  │                                                               │ │
//! │  │   ┌────────────┐   ┌──────────────┐   ┌──────────────┐       │ │
//! │  │   │  Database  │   │ Repositories │   │  Migrations  │       │ │
//! │  │   │ (pool.rs)  │◄──│ product/sale │   │  (embedded)  │       │ │
//! │  │   │            │   │ customer/... │   │ 001_init.sql │       │ │
//! │  │   └────────────┘   └──────────────┘   └──────────────┘       │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (WAL mode, foreign keys ON)                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Transactions
//!
//! Reads go through `&self` methods using the pool. Writes that must be
//! atomic with other writes (sale + items + stock, payments + statuses +
//! balance) are associated functions taking `&mut SqliteConnection`, so
//! the operations layer can compose them inside a single transaction.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use welgama_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/welgama.db")).await?;
//! let products = db.products().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::activity::ActivityRepository;
pub use repository::catalog::CatalogRepository;
pub use repository::customer::CustomerRepository;
pub use repository::draft::DraftRepository;
pub use repository::expense::ExpenseRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
