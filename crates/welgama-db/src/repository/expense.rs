//! # Expense Repository
//!
//! The independent expense ledger. No relation to sales.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use welgama_core::Expense;

const EXPENSE_COLUMNS: &str = "id, user_id, reason, amount_cents, created_at";

/// Repository for expense ledger operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Inserts an expense.
    pub async fn insert(&self, expense: &Expense) -> DbResult<()> {
        debug!(id = %expense.id, amount = %expense.amount_cents, "Inserting expense");

        sqlx::query(
            r#"
            INSERT INTO expenses (id, user_id, reason, amount_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.user_id)
        .bind(&expense.reason)
        .bind(expense.amount_cents)
        .bind(expense.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists recent expenses, newest first.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<Expense>> {
        let sql = format!("SELECT {EXPENSE_COLUMNS} FROM expenses ORDER BY created_at DESC LIMIT ?1");
        let expenses = sqlx::query_as::<_, Expense>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(expenses)
    }

    /// Deletes an expense by ID.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id));
        }

        Ok(())
    }
}

/// Helper to generate a new expense ID.
pub fn generate_expense_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
