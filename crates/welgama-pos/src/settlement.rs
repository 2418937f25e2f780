//! # Sale Settlement Operations
//!
//! Persists the outcome a pure [`welgama_core::settlement`] plan
//! describes: the sale row, its line items (price/cost snapshots), the
//! stock decrements, and, for credit/partial sales, the customer
//! balance increment, all inside ONE transaction. Readers never observe
//! a sale without its stock effects.
//!
//! ## Settlement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  validate input (no writes yet)                                     │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  plan (pure): total, paid, change, statuses, balance delta          │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  BEGIN ────────────────────────────────────────────────┐            │
//! │    insert sale                                         │            │
//! │    per line: snapshot product, decrement stock         │ one        │
//! │              (quantity >= n or ROLLBACK), insert item  │ atomic     │
//! │    credit/partial: customer.balance += due             │ txn        │
//! │  COMMIT ───────────────────────────────────────────────┘            │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  activity entry (best-effort, after commit)                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use welgama_core::settlement::{plan_credit_sale, plan_immediate_sale, SettlementPlan};
use welgama_core::{Actor, CartLine, CoreError, Money, Sale, SaleItem};
use welgama_db::repository::product::ProductRepository;
use welgama_db::repository::sale::{
    generate_receipt_number, generate_sale_id, generate_sale_item_id, SaleRepository,
};
use welgama_db::repository::customer::CustomerRepository;

use crate::error::OpError;
use crate::Pos;

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleImmediateResponse {
    pub sale_id: String,
    pub receipt_number: String,
    pub total_cents: i64,
    pub change_given_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleCreditResponse {
    pub sale_id: String,
    pub receipt_number: String,
    pub total_cents: i64,
}

// =============================================================================
// Operations
// =============================================================================

impl Pos {
    /// Settles an immediate (counter) sale.
    ///
    /// `amount_paid_cents` defaults to the total when omitted. An amount
    /// above the total comes back as change; an amount below it leaves a
    /// due, which requires a customer to owe it.
    pub async fn settle_immediate_sale(
        &self,
        actor: &Actor,
        customer_id: Option<&str>,
        lines: &[CartLine],
        amount_paid_cents: Option<i64>,
        is_delivered: bool,
    ) -> Result<SettleImmediateResponse, OpError> {
        let plan = plan_immediate_sale(lines, amount_paid_cents.map(Money::from_cents), is_delivered)?;

        if plan.balance_delta.is_positive() && customer_id.is_none() {
            return Err(CoreError::CustomerRequired {
                reason: "a partially paid sale leaves a due on the book".to_string(),
            }
            .into());
        }

        let sale = self
            .persist_settlement(actor, customer_id, lines, &plan, "sale.complete")
            .await?;

        Ok(SettleImmediateResponse {
            sale_id: sale.id,
            receipt_number: sale.receipt_number,
            total_cents: sale.total_cents,
            change_given_cents: sale.change_given_cents,
        })
    }

    /// Settles a credit sale ("add to book"): zero payment at creation,
    /// the full total lands on the customer's balance.
    pub async fn settle_credit_sale(
        &self,
        actor: &Actor,
        customer_id: &str,
        lines: &[CartLine],
        is_delivered: bool,
    ) -> Result<SettleCreditResponse, OpError> {
        let plan = plan_credit_sale(lines, is_delivered)?;

        let sale = self
            .persist_settlement(actor, Some(customer_id), lines, &plan, "sale.credit")
            .await?;

        Ok(SettleCreditResponse {
            sale_id: sale.id,
            receipt_number: sale.receipt_number,
            total_cents: sale.total_cents,
        })
    }

    /// Marks a pending-delivery sale as delivered.
    pub async fn mark_delivered(&self, actor: &Actor, sale_id: &str) -> Result<(), OpError> {
        self.db().sales().mark_delivered(sale_id).await?;

        info!(sale_id = %sale_id, "Sale marked delivered");

        self.recorder().record(
            actor,
            "sale.deliver",
            format!("Sale {sale_id} delivered"),
            serde_json::json!({ "saleId": sale_id }),
        );

        Ok(())
    }

    /// Executes a settlement plan as one atomic transaction.
    async fn persist_settlement(
        &self,
        actor: &Actor,
        customer_id: Option<&str>,
        lines: &[CartLine],
        plan: &SettlementPlan,
        action: &str,
    ) -> Result<Sale, OpError> {
        // The customer must exist before anything is written
        if let Some(cid) = customer_id {
            self.db()
                .customers()
                .get_by_id(cid)
                .await?
                .ok_or_else(|| CoreError::CustomerNotFound(cid.to_string()))?;
        }

        let now = Utc::now();
        let sale = Sale {
            id: generate_sale_id(),
            receipt_number: generate_receipt_number(),
            customer_id: customer_id.map(str::to_string),
            total_cents: plan.total.cents(),
            payment_status: plan.payment_status,
            order_status: plan.order_status,
            amount_paid_cents: plan.amount_paid.cents(),
            change_given_cents: plan.change_given.cents(),
            is_delivered: plan.order_status == welgama_core::OrderStatus::Completed,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.db().begin().await?;

        SaleRepository::insert(&mut tx, &sale).await?;

        for line in lines {
            // Snapshot name and cost from the same transaction that
            // decrements the stock
            let product = ProductRepository::get_in(&mut tx, &line.product_id)
                .await?
                .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

            let decremented =
                ProductRepository::decrement_stock_checked(&mut tx, &line.product_id, line.quantity)
                    .await?;
            if !decremented {
                // Dropping the transaction rolls everything back: no
                // sale, no items, no stock effects
                return Err(CoreError::InsufficientStock {
                    name: product.name,
                    available: product.quantity,
                    requested: line.quantity,
                }
                .into());
            }

            SaleRepository::add_item(
                &mut tx,
                &SaleItem {
                    id: generate_sale_item_id(),
                    sale_id: sale.id.clone(),
                    product_id: line.product_id.clone(),
                    name_snapshot: product.name,
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price_cents,
                    cost_price_cents: product.cost_price_cents,
                    discount_value: line.discount_value,
                    discount_type: line.discount_type,
                    subtotal_cents: line.subtotal_cents,
                    created_at: now,
                },
            )
            .await?;
        }

        if plan.balance_delta.is_positive() {
            if let Some(cid) = customer_id {
                CustomerRepository::increment_balance(&mut tx, cid, plan.balance_delta.cents())
                    .await?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| welgama_db::DbError::TransactionFailed(e.to_string()))?;

        info!(
            sale_id = %sale.id,
            receipt_number = %sale.receipt_number,
            total = %plan.total,
            items = lines.len(),
            status = ?plan.payment_status,
            "Sale settled"
        );

        self.recorder().record(
            actor,
            action,
            format!(
                "Sale {}: {} item(s), total {}",
                sale.receipt_number,
                lines.len(),
                plan.total
            ),
            serde_json::json!({
                "saleId": sale.id,
                "customerId": customer_id,
                "totalCents": plan.total.cents(),
                "amountPaidCents": plan.amount_paid.cents(),
                "changeGivenCents": plan.change_given.cents(),
                "itemCount": lines.len(),
                "delivered": sale.is_delivered,
            }),
        );

        Ok(sale)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
