//! # Payment Operations
//!
//! Applies a customer payment across outstanding sales and keeps the
//! cached customer balance honest.
//!
//! The distribution itself is planned by the pure
//! [`welgama_core::allocation`] module; this module validates ownership,
//! executes the plan inside ONE transaction (payment rows + sale status
//! updates + balance deduction), and emits the audit entry. Readers never
//! observe a partially-applied distribution.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use welgama_core::allocation::{plan_allocation, OutstandingSale};
use welgama_core::balance::settle_against_balance;
use welgama_core::validation::validate_payment_amount;
use welgama_core::{Actor, CoreError, Money, Payment};
use welgama_db::repository::customer::CustomerRepository;
use welgama_db::repository::sale::{generate_payment_id, SaleRepository};

use crate::error::OpError;
use crate::Pos;

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocatePaymentResponse {
    /// Amount actually consumed by due sales.
    pub applied_cents: i64,
    /// Overpayment returned to the payer.
    pub change_cents: i64,
    /// Customer balance after the allocation.
    pub remaining_balance_cents: i64,
    /// Number of sales that received a payment.
    pub sales_touched: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileBalanceResponse {
    pub stored_balance_cents: i64,
    pub computed_balance_cents: i64,
    /// `stored - computed`; zero means no drift.
    pub drift_cents: i64,
    pub repaired: bool,
}

// =============================================================================
// Operations
// =============================================================================

impl Pos {
    /// Applies a payment across the customer's selected outstanding
    /// sales, oldest first.
    ///
    /// Every target sale must exist, belong to the customer, and is
    /// skipped if already settled. Excess beyond the total due comes back
    /// as change; it is never retained as credit.
    pub async fn allocate_payment(
        &self,
        actor: &Actor,
        customer_id: &str,
        sale_ids: &[String],
        amount_cents: i64,
    ) -> Result<AllocatePaymentResponse, OpError> {
        // Rejected before any read or write
        validate_payment_amount(amount_cents).map_err(|e| CoreError::InvalidPaymentAmount {
            reason: e.to_string(),
        })?;

        let customer = self
            .db()
            .customers()
            .get_by_id(customer_id)
            .await?
            .ok_or_else(|| CoreError::CustomerNotFound(customer_id.to_string()))?;

        let mut targets = Vec::with_capacity(sale_ids.len());
        for sale_id in sale_ids {
            let sale = self
                .db()
                .sales()
                .get_by_id(sale_id)
                .await?
                .ok_or_else(|| CoreError::SaleNotFound(sale_id.clone()))?;

            let owned = sale.customer_id.as_deref() == Some(customer_id);
            if !owned {
                return Err(CoreError::SaleNotOwned {
                    sale_id: sale.id,
                    customer_id: customer_id.to_string(),
                }
                .into());
            }

            targets.push(OutstandingSale {
                sale_id: sale.id.clone(),
                date: sale.created_at,
                total: sale.total(),
                paid: sale.amount_paid(),
            });
        }

        let plan = plan_allocation(&targets, Money::from_cents(amount_cents))?;

        let now = Utc::now();
        let mut tx = self.db().begin().await?;

        for alloc in &plan.allocations {
            SaleRepository::add_payment(
                &mut tx,
                &Payment {
                    id: generate_payment_id(),
                    sale_id: alloc.sale_id.clone(),
                    customer_id: Some(customer_id.to_string()),
                    amount_cents: alloc.amount.cents(),
                    note: alloc.note.clone(),
                    created_at: now,
                },
            )
            .await?;

            SaleRepository::apply_payment(
                &mut tx,
                &alloc.sale_id,
                alloc.amount.cents(),
                alloc.new_status,
            )
            .await?;
        }

        if plan.applied.is_positive() {
            CustomerRepository::deduct_balance_clamped(&mut tx, customer_id, plan.applied.cents())
                .await?;
        }

        tx.commit()
            .await
            .map_err(|e| welgama_db::DbError::TransactionFailed(e.to_string()))?;

        let remaining_balance = settle_against_balance(customer.balance(), plan.applied);

        info!(
            customer_id = %customer_id,
            applied = %plan.applied,
            change = %plan.change,
            sales_touched = plan.sales_touched(),
            "Payment allocated"
        );

        self.recorder().record(
            actor,
            "payment.record",
            format!(
                "Payment of {} from {}: applied {}, change {}",
                Money::from_cents(amount_cents),
                customer.name,
                plan.applied,
                plan.change
            ),
            serde_json::json!({
                "customerId": customer_id,
                "amountCents": amount_cents,
                "appliedCents": plan.applied.cents(),
                "changeCents": plan.change.cents(),
                "remainingBalanceCents": remaining_balance.cents(),
                "salesTouched": plan.sales_touched(),
            }),
        );

        Ok(AllocatePaymentResponse {
            applied_cents: plan.applied.cents(),
            change_cents: plan.change.cents(),
            remaining_balance_cents: remaining_balance.cents(),
            sales_touched: plan.sales_touched(),
        })
    }

    /// Recomputes a customer's balance from source sales and reports
    /// drift against the cached column. With `repair`, the cached value
    /// is overwritten by the computed one.
    ///
    /// The cached balance is only ever written transactionally alongside
    /// the sales/payments that change it, so drift indicates a bug; this
    /// routine exists to detect (and in tests, inject and repair) exactly
    /// that.
    pub async fn reconcile_balance(
        &self,
        actor: &Actor,
        customer_id: &str,
        repair: bool,
    ) -> Result<ReconcileBalanceResponse, OpError> {
        let customer = self
            .db()
            .customers()
            .get_by_id(customer_id)
            .await?
            .ok_or_else(|| CoreError::CustomerNotFound(customer_id.to_string()))?;

        let computed = self.db().customers().computed_outstanding(customer_id).await?;
        let drift = customer.balance_cents - computed;

        let repaired = repair && drift != 0;
        if repaired {
            self.db().customers().set_balance(customer_id, computed).await?;

            info!(
                customer_id = %customer_id,
                stored = customer.balance_cents,
                computed = computed,
                "Customer balance repaired"
            );

            self.recorder().record(
                actor,
                "customer.reconcile",
                format!(
                    "Balance for {} corrected from {} to {}",
                    customer.name,
                    Money::from_cents(customer.balance_cents),
                    Money::from_cents(computed)
                ),
                serde_json::json!({
                    "customerId": customer_id,
                    "storedCents": customer.balance_cents,
                    "computedCents": computed,
                }),
            );
        }

        Ok(ReconcileBalanceResponse {
            stored_balance_cents: customer.balance_cents,
            computed_balance_cents: computed,
            drift_cents: drift,
            repaired,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
