//! # Draft Operations
//!
//! Staged carts. A draft never touches stock or balances; converting one
//! is "load its lines, settle them, delete it".

use serde::{Deserialize, Serialize};

use welgama_core::validation::validate_cart;
use welgama_core::{Actor, CartLine, CoreError, Draft};

use crate::error::OpError;
use crate::Pos;

/// A draft with its lines parsed back out of storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    pub draft: Draft,
    pub lines: Vec<CartLine>,
}

impl Pos {
    /// Saves the current cart as a draft.
    pub async fn save_draft(
        &self,
        actor: &Actor,
        customer_id: Option<&str>,
        lines: &[CartLine],
    ) -> Result<Draft, OpError> {
        validate_cart(lines).map_err(CoreError::from)?;

        if let Some(cid) = customer_id {
            self.db()
                .customers()
                .get_by_id(cid)
                .await?
                .ok_or_else(|| CoreError::CustomerNotFound(cid.to_string()))?;
        }

        let draft = self.db().drafts().save(customer_id, lines).await?;

        self.recorder().record(
            actor,
            "draft.save",
            format!("Draft saved with {} line(s)", lines.len()),
            serde_json::json!({ "draftId": draft.id, "lineCount": lines.len() }),
        );

        Ok(draft)
    }

    /// Lists saved drafts, newest first.
    pub async fn list_drafts(&self) -> Result<Vec<Draft>, OpError> {
        Ok(self.db().drafts().list().await?)
    }

    /// Loads a draft with its parsed lines, ready to hand to settlement.
    pub async fn get_draft(&self, draft_id: &str) -> Result<DraftView, OpError> {
        let draft = self
            .db()
            .drafts()
            .get_by_id(draft_id)
            .await?
            .ok_or_else(|| OpError::not_found("Draft", draft_id))?;

        let lines = draft
            .lines()
            .map_err(|e| OpError::internal(format!("draft {draft_id} is corrupt: {e}")))?;

        Ok(DraftView { draft, lines })
    }

    /// Deletes a draft (after conversion, or on discard).
    pub async fn delete_draft(&self, actor: &Actor, draft_id: &str) -> Result<(), OpError> {
        self.db().drafts().delete(draft_id).await?;

        self.recorder().record(
            actor,
            "draft.delete",
            format!("Draft {draft_id} deleted"),
            serde_json::json!({ "draftId": draft_id }),
        );

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{seed_customer, seed_product, test_actor, test_pos};
    use welgama_core::DiscountType;

    fn line(product_id: &str, price: i64) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            quantity: 2,
            unit_price_cents: price,
            discount_value: 0,
            discount_type: DiscountType::Amount,
            subtotal_cents: price * 2,
        }
    }

    #[tokio::test]
    async fn test_draft_has_no_stock_or_balance_effect() {
        let pos = test_pos().await;
        seed_product(&pos, "p1", 10000, 10).await;
        seed_customer(&pos, "c1").await;

        pos.save_draft(&test_actor(), Some("c1"), &[line("p1", 10000)])
            .await
            .unwrap();

        let product = pos.db().products().get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(product.quantity, 10);
        let customer = pos.db().customers().get_by_id("c1").await.unwrap().unwrap();
        assert_eq!(customer.balance_cents, 0);
    }

    #[tokio::test]
    async fn test_draft_conversion_flow() {
        let pos = test_pos().await;
        seed_product(&pos, "p1", 10000, 10).await;

        let draft = pos
            .save_draft(&test_actor(), None, &[line("p1", 10000)])
            .await
            .unwrap();

        // Convert: load lines, settle, delete
        let view = pos.get_draft(&draft.id).await.unwrap();
        let receipt = pos
            .settle_immediate_sale(&test_actor(), None, &view.lines, None, true)
            .await
            .unwrap();
        pos.delete_draft(&test_actor(), &draft.id).await.unwrap();

        assert_eq!(receipt.total_cents, 20000);
        assert!(pos.list_drafts().await.unwrap().is_empty());

        let product = pos.db().products().get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(product.quantity, 8);
    }

    #[tokio::test]
    async fn test_empty_draft_rejected() {
        let pos = test_pos().await;

        let err = pos
            .save_draft(&test_actor(), None, &[])
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ValidationError);
    }
}
