//! # Repository Module
//!
//! Database repository implementations for Welgama POS.
//!
//! ## Repository Pattern
//! Each aggregate gets one repository struct wrapping the pool. Reads are
//! `&self` methods. Writes that participate in a multi-table transaction
//! (settlement, allocation) are associated functions taking a
//! `&mut SqliteConnection`, so the operations layer decides the
//! transaction boundary, not the repository.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD and stock movements
//! - [`catalog::CatalogRepository`] - Category and unit lookup tables
//! - [`customer::CustomerRepository`] - Customers and balance updates
//! - [`sale::SaleRepository`] - Sales, sale items, and payments
//! - [`draft::DraftRepository`] - Staged carts
//! - [`expense::ExpenseRepository`] - Expense ledger
//! - [`activity::ActivityRepository`] - Append-only audit trail

pub mod activity;
pub mod catalog;
pub mod customer;
pub mod draft;
pub mod expense;
pub mod product;
pub mod sale;
