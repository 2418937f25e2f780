//! # Expense Operations
//!
//! The independent expense ledger: money going out that has nothing to
//! do with sales (fuel, wages, electricity).

use chrono::Utc;
use tracing::info;

use welgama_core::validation::{validate_payment_amount, validate_reason};
use welgama_core::{Actor, CoreError, Expense, Money};
use welgama_db::repository::expense::generate_expense_id;

use crate::error::OpError;
use crate::Pos;

impl Pos {
    /// Records an expense against the acting user.
    pub async fn add_expense(
        &self,
        actor: &Actor,
        reason: &str,
        amount_cents: i64,
    ) -> Result<Expense, OpError> {
        validate_reason(reason).map_err(CoreError::from)?;
        validate_payment_amount(amount_cents).map_err(CoreError::from)?;

        let expense = Expense {
            id: generate_expense_id(),
            user_id: actor.id.clone(),
            reason: reason.trim().to_string(),
            amount_cents,
            created_at: Utc::now(),
        };

        self.db().expenses().insert(&expense).await?;

        info!(id = %expense.id, amount = %Money::from_cents(amount_cents), "Expense recorded");

        self.recorder().record(
            actor,
            "expense.add",
            format!("Expense: {} ({})", expense.reason, Money::from_cents(amount_cents)),
            serde_json::json!({ "expenseId": expense.id, "amountCents": amount_cents }),
        );

        Ok(expense)
    }

    /// Lists recent expenses, newest first.
    pub async fn list_expenses(&self, limit: i64) -> Result<Vec<Expense>, OpError> {
        Ok(self.db().expenses().list_recent(limit).await?)
    }

    /// Deletes an expense.
    pub async fn delete_expense(&self, actor: &Actor, expense_id: &str) -> Result<(), OpError> {
        self.db().expenses().delete(expense_id).await?;

        self.recorder().record(
            actor,
            "expense.delete",
            format!("Expense {expense_id} deleted"),
            serde_json::json!({ "expenseId": expense_id }),
        );

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::testutil::{test_actor, test_pos};

    #[tokio::test]
    async fn test_expense_lifecycle() {
        let pos = test_pos().await;

        let expense = pos
            .add_expense(&test_actor(), "Lorry fuel", 550000)
            .await
            .unwrap();
        assert_eq!(expense.user_id, "u1");

        let listed = pos.list_expenses(10).await.unwrap();
        assert_eq!(listed.len(), 1);

        pos.delete_expense(&test_actor(), &expense.id).await.unwrap();
        assert!(pos.list_expenses(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_expense_validation() {
        let pos = test_pos().await;

        let err = pos
            .add_expense(&test_actor(), "", 1000)
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ValidationError);

        let err = pos
            .add_expense(&test_actor(), "fuel", 0)
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ValidationError);
    }
}
