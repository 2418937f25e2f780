//! # History Operations
//!
//! Read-side views: order history with line items and payments, pending
//! deliveries, and the activity log.

use serde::{Deserialize, Serialize};

use welgama_core::{ActivityEntry, Payment, Sale, SaleItem};

use crate::error::OpError;
use crate::Pos;

/// One sale in the order history, with everything attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleHistoryEntry {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
    pub payments: Vec<Payment>,
}

impl Pos {
    /// Loads recent sales with their items and payments, newest first.
    pub async fn sale_history(&self, limit: i64) -> Result<Vec<SaleHistoryEntry>, OpError> {
        let sales = self.db().sales().list_recent(limit).await?;

        let mut history = Vec::with_capacity(sales.len());
        for sale in sales {
            let items = self.db().sales().get_items(&sale.id).await?;
            let payments = self.db().sales().get_payments(&sale.id).await?;
            history.push(SaleHistoryEntry {
                sale,
                items,
                payments,
            });
        }

        Ok(history)
    }

    /// Loads one sale with items and payments.
    pub async fn sale_details(&self, sale_id: &str) -> Result<SaleHistoryEntry, OpError> {
        let sale = self
            .db()
            .sales()
            .get_by_id(sale_id)
            .await?
            .ok_or_else(|| OpError::not_found("Sale", sale_id))?;

        let items = self.db().sales().get_items(sale_id).await?;
        let payments = self.db().sales().get_payments(sale_id).await?;

        Ok(SaleHistoryEntry {
            sale,
            items,
            payments,
        })
    }

    /// Lists sales still awaiting delivery, oldest first.
    pub async fn pending_deliveries(&self) -> Result<Vec<Sale>, OpError> {
        Ok(self.db().sales().list_pending_delivery().await?)
    }

    /// Pages through the activity log, newest first.
    pub async fn activity_log(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityEntry>, OpError> {
        Ok(self.db().activity().list(limit, offset).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::testutil::{seed_customer, seed_product, test_actor, test_pos};
    use welgama_core::{CartLine, DiscountType};

    fn line(product_id: &str, price: i64) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            quantity: 1,
            unit_price_cents: price,
            discount_value: 0,
            discount_type: DiscountType::Amount,
            subtotal_cents: price,
        }
    }

    #[tokio::test]
    async fn test_history_includes_items_and_payments() {
        let pos = test_pos().await;
        seed_customer(&pos, "c1").await;
        seed_product(&pos, "p1", 10000, 10).await;

        let receipt = pos
            .settle_credit_sale(&test_actor(), "c1", &[line("p1", 10000)], true)
            .await
            .unwrap();
        pos.allocate_payment(&test_actor(), "c1", &[receipt.sale_id.clone()], 4000)
            .await
            .unwrap();

        let history = pos.sale_history(10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].items.len(), 1);
        assert_eq!(history[0].payments.len(), 1);
        assert_eq!(history[0].payments[0].amount_cents, 4000);

        let details = pos.sale_details(&receipt.sale_id).await.unwrap();
        assert_eq!(details.sale.amount_paid_cents, 4000);
    }

    #[tokio::test]
    async fn test_pending_deliveries() {
        let pos = test_pos().await;
        seed_product(&pos, "p1", 10000, 10).await;

        let receipt = pos
            .settle_immediate_sale(&test_actor(), None, &[line("p1", 10000)], None, false)
            .await
            .unwrap();

        let pending = pos.pending_deliveries().await.unwrap();
        assert_eq!(pending.len(), 1);

        pos.mark_delivered(&test_actor(), &receipt.sale_id).await.unwrap();
        assert!(pos.pending_deliveries().await.unwrap().is_empty());
    }
}
