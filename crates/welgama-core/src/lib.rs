//! # welgama-core: Pure Business Logic for Welgama POS
//!
//! This crate is the heart of the Welgama POS system. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Welgama POS Architecture                        │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │              Web / API layer (external collaborator)          │ │
//! │  └─────────────────────────────┬─────────────────────────────────┘ │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐ │
//! │  │                  welgama-pos (operations)                     │ │
//! │  │   settle_immediate_sale, allocate_payment, adjust_stock, ...  │ │
//! │  └─────────────────────────────┬─────────────────────────────────┘ │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐ │
//! │  │             ★ welgama-core (THIS CRATE) ★                     │ │
//! │  │                                                               │ │
//! │  │   ┌─────────┐ ┌─────────┐ ┌────────────┐ ┌────────────────┐  │ │
//! │  │   │  types  │ │  money  │ │ allocation │ │   settlement   │  │ │
//! │  │   └─────────┘ └─────────┘ └────────────┘ └────────────────┘  │ │
//! │  │                                                               │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │ │
//! │  └─────────────────────────────┬─────────────────────────────────┘ │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐ │
//! │  │                 welgama-db (database layer)                   │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Sale, Payment, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`balance`] - Outstanding-due and aggregate balance calculation
//! - [`allocation`] - Payment allocation across outstanding sales
//! - [`settlement`] - Sale settlement planning (totals, change, status)
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, always
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are in cents (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod balance;
pub mod error;
pub mod money;
pub mod settlement;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use allocation::{plan_allocation, AllocationPlan, OutstandingSale, SaleAllocation};
pub use balance::{customer_outstanding, sale_due, sale_due_raw, settle_against_balance};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use settlement::{line_subtotal, plan_credit_sale, plan_immediate_sale, SettlementPlan};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in a cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
