//! # Payment Allocation
//!
//! Distributes a single customer payment across a set of outstanding
//! sales, oldest debt first.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 Payment Allocation (oldest first)                   │
//! │                                                                     │
//! │  Payment: Rs 120          Sales (sorted by date ascending):         │
//! │                                                                     │
//! │  remaining = 120  ──►  Sale A (due 100) ──► pay 100, now Paid       │
//! │  remaining = 20   ──►  Sale B (due 50)  ──► pay 20, now Partial     │
//! │  remaining = 0    ──►  stop                                         │
//! │                                                                     │
//! │  applied = 120, change = 0                                          │
//! │                                                                     │
//! │  Anything left after ALL selected sales are fully paid is change    │
//! │  returned to the payer - never retained as credit.                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This module only PLANS the allocation; it is pure and touches nothing.
//! The operations layer executes the plan inside one atomic transaction
//! (payment inserts + sale updates + customer balance update) so readers
//! never observe a partially-applied distribution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::PaymentStatus;

// =============================================================================
// Inputs / Outputs
// =============================================================================

/// A sale eligible for allocation, as read from the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutstandingSale {
    pub sale_id: String,
    /// Sale date; the ascending sort on this field decides which sales
    /// get paid down first when the amount is insufficient for all.
    pub date: DateTime<Utc>,
    pub total: Money,
    /// Cumulative payments already recorded against the sale.
    pub paid: Money,
}

impl OutstandingSale {
    /// Signed due; negative values signal an upstream invariant breach.
    #[inline]
    pub fn due(&self) -> Money {
        crate::balance::sale_due_raw(self.total, self.paid)
    }
}

/// One planned payment against one sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleAllocation {
    pub sale_id: String,
    /// Amount to record as a new Payment row.
    pub amount: Money,
    /// Status the sale transitions to once the payment is recorded.
    pub new_status: PaymentStatus,
    /// Residual disclosure when money remains after this sale.
    /// Informational only; never feeds back into any calculation.
    pub note: Option<String>,
}

/// The full result of planning an allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationPlan {
    /// Per-sale payments, in the order they should be recorded.
    pub allocations: Vec<SaleAllocation>,
    /// Amount actually consumed by due sales.
    pub applied: Money,
    /// Overpayment returned to the payer: `max(remaining, 0)`.
    pub change: Money,
}

impl AllocationPlan {
    /// Number of sales receiving a payment under this plan.
    pub fn sales_touched(&self) -> usize {
        self.allocations.len()
    }
}

// =============================================================================
// Planning
// =============================================================================

/// Plans the distribution of `amount` across `sales`.
///
/// ## Rules (deterministic, reproduced exactly)
/// 1. Sort target sales by date ascending, oldest debt first.
/// 2. Skip sales with `due <= 0` (already settled; no duplicate payment).
/// 3. Each sale receives `min(remaining, due)`.
/// 4. Status becomes `Paid` when cumulative payments reach the total,
///    otherwise `Partial`.
/// 5. Stop early once the remaining amount hits zero.
/// 6. `applied = amount - remaining`; leftover is change, never credit.
///
/// Rejects non-positive amounts before planning anything.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use welgama_core::allocation::{plan_allocation, OutstandingSale};
/// use welgama_core::Money;
///
/// let sales = vec![
///     OutstandingSale {
///         sale_id: "older".into(),
///         date: Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap(),
///         total: Money::from_cents(10000),
///         paid: Money::zero(),
///     },
///     OutstandingSale {
///         sale_id: "newer".into(),
///         date: Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap(),
///         total: Money::from_cents(5000),
///         paid: Money::zero(),
///     },
/// ];
///
/// let plan = plan_allocation(&sales, Money::from_cents(12000)).unwrap();
/// assert_eq!(plan.allocations[0].sale_id, "older");
/// assert_eq!(plan.allocations[0].amount.cents(), 10000);
/// assert_eq!(plan.allocations[1].amount.cents(), 2000);
/// assert!(plan.change.is_zero());
/// ```
pub fn plan_allocation(sales: &[OutstandingSale], amount: Money) -> CoreResult<AllocationPlan> {
    if !amount.is_positive() {
        return Err(CoreError::InvalidPaymentAmount {
            reason: format!("amount must be positive, got {}", amount),
        });
    }

    // Oldest debt first. Stable sort: equal dates keep caller order.
    let mut ordered: Vec<&OutstandingSale> = sales.iter().collect();
    ordered.sort_by_key(|s| s.date);

    let mut remaining = amount;
    let mut allocations = Vec::new();

    for sale in ordered {
        if !remaining.is_positive() {
            break;
        }

        let due = sale.due();
        // A negative due means payments already exceed the total, a state
        // this system never writes. Surface it in debug builds, skip like
        // any settled sale otherwise.
        debug_assert!(
            !due.is_negative(),
            "sale {} has negative due {}",
            sale.sale_id,
            due
        );
        if !due.is_positive() {
            continue;
        }

        let portion = remaining.min(due);
        remaining -= portion;

        let new_status = if sale.paid + portion >= sale.total {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Partial
        };

        let note = if remaining.is_positive() {
            Some(format!("{} remaining after this payment", remaining))
        } else {
            None
        };

        allocations.push(SaleAllocation {
            sale_id: sale.sale_id.clone(),
            amount: portion,
            new_status,
            note,
        });
    }

    let applied = amount - remaining;
    let change = remaining.max(Money::zero());

    Ok(AllocationPlan {
        allocations,
        applied,
        change,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn outstanding(id: &str, day: u32, total: i64, paid: i64) -> OutstandingSale {
        OutstandingSale {
            sale_id: id.to_string(),
            date: Utc.with_ymd_and_hms(2026, 3, day, 10, 0, 0).unwrap(),
            total: Money::from_cents(total),
            paid: Money::from_cents(paid),
        }
    }

    #[test]
    fn test_oldest_first_split() {
        // Dues [100, 50] (older first), payment 120:
        // 100 to the first, 20 to the second, second stays Partial (due 30)
        let sales = vec![
            outstanding("newer", 20, 5000, 0),
            outstanding("older", 1, 10000, 0),
        ];

        let plan = plan_allocation(&sales, Money::from_cents(12000)).unwrap();

        assert_eq!(plan.allocations.len(), 2);
        assert_eq!(plan.allocations[0].sale_id, "older");
        assert_eq!(plan.allocations[0].amount.cents(), 10000);
        assert_eq!(plan.allocations[0].new_status, PaymentStatus::Paid);

        assert_eq!(plan.allocations[1].sale_id, "newer");
        assert_eq!(plan.allocations[1].amount.cents(), 2000);
        assert_eq!(plan.allocations[1].new_status, PaymentStatus::Partial);

        assert_eq!(plan.applied.cents(), 12000);
        assert!(plan.change.is_zero());
    }

    #[test]
    fn test_overpayment_becomes_change() {
        // Single sale due 50, payment 80 → applied 50, change 30, Paid
        let sales = vec![outstanding("s1", 1, 5000, 0)];

        let plan = plan_allocation(&sales, Money::from_cents(8000)).unwrap();

        assert_eq!(plan.allocations.len(), 1);
        assert_eq!(plan.allocations[0].amount.cents(), 5000);
        assert_eq!(plan.allocations[0].new_status, PaymentStatus::Paid);
        assert_eq!(plan.applied.cents(), 5000);
        assert_eq!(plan.change.cents(), 3000);
    }

    #[test]
    fn test_settled_sales_are_skipped() {
        // Re-running allocation against an already-settled sale must skip
        // it and create no duplicate payment
        let sales = vec![outstanding("settled", 1, 5000, 5000)];

        let plan = plan_allocation(&sales, Money::from_cents(2000)).unwrap();

        assert!(plan.allocations.is_empty());
        assert!(plan.applied.is_zero());
        assert_eq!(plan.change.cents(), 2000);
    }

    #[test]
    fn test_partial_payment_on_partial_sale() {
        // Sale total 100, already paid 40, payment 30 → due drops to 30
        let sales = vec![outstanding("s1", 1, 10000, 4000)];

        let plan = plan_allocation(&sales, Money::from_cents(3000)).unwrap();

        assert_eq!(plan.allocations[0].amount.cents(), 3000);
        assert_eq!(plan.allocations[0].new_status, PaymentStatus::Partial);
        assert_eq!(plan.applied.cents(), 3000);
        assert!(plan.change.is_zero());
    }

    #[test]
    fn test_early_stop_leaves_later_sales_untouched() {
        let sales = vec![
            outstanding("a", 1, 5000, 0),
            outstanding("b", 2, 5000, 0),
            outstanding("c", 3, 5000, 0),
        ];

        let plan = plan_allocation(&sales, Money::from_cents(6000)).unwrap();

        assert_eq!(plan.allocations.len(), 2);
        assert_eq!(plan.allocations[0].sale_id, "a");
        assert_eq!(plan.allocations[1].sale_id, "b");
        assert_eq!(plan.allocations[1].amount.cents(), 1000);
        assert!(plan.change.is_zero());
    }

    #[test]
    fn test_residual_note_on_non_final_allocations() {
        let sales = vec![
            outstanding("a", 1, 5000, 0),
            outstanding("b", 2, 5000, 0),
        ];

        let plan = plan_allocation(&sales, Money::from_cents(7000)).unwrap();

        // Money remained after sale "a" → disclosed on its payment
        assert!(plan.allocations[0].note.is_some());
        // Nothing remained after sale "b"
        assert!(plan.allocations[1].note.is_none());
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let sales = vec![outstanding("s1", 1, 5000, 0)];

        assert!(plan_allocation(&sales, Money::zero()).is_err());
        assert!(plan_allocation(&sales, Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_payments_never_exceed_total() {
        // Property: after allocation, per-sale payments stay <= total
        let sales = vec![
            outstanding("a", 1, 3000, 1000),
            outstanding("b", 2, 7000, 0),
        ];

        let plan = plan_allocation(&sales, Money::from_cents(100000)).unwrap();

        for alloc in &plan.allocations {
            let sale = sales.iter().find(|s| s.sale_id == alloc.sale_id).unwrap();
            assert!(sale.paid + alloc.amount <= sale.total);
        }
        // 2000 + 7000 applied, rest is change
        assert_eq!(plan.applied.cents(), 9000);
        assert_eq!(plan.change.cents(), 91000);
    }
}
