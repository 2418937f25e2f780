//! # Sale Settlement Planning
//!
//! Computes everything a sale record needs before anything is persisted:
//! the total, the recorded payment, change, statuses, and the customer
//! balance delta.
//!
//! ## Two Entry Variants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  IMMEDIATE SALE (counter)          CREDIT SALE ("add to book")      │
//! │                                                                     │
//! │  total    = Σ line subtotals       total       = Σ line subtotals   │
//! │  tendered = caller amount          amount_paid = 0                  │
//! │             (defaults to total)    change      = 0                  │
//! │  change   = max(tendered-total,0)  status      = Credit             │
//! │  status   = Paid | Partial         balance     + total              │
//! │  balance  + due (if Partial)                                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Planning is pure; the operations layer persists the sale, its line
//! items (price/cost snapshots), the stock decrements, and the balance
//! update inside one atomic transaction.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartLine, DiscountType, OrderStatus, PaymentStatus};
use crate::validation::validate_cart;

// =============================================================================
// Settlement Plan
// =============================================================================

/// The computed outcome of a settlement, ready to persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// Sum of the cart's pre-computed line subtotals.
    pub total: Money,

    /// Amount recorded against the sale. Capped at the total: any excess
    /// tendered is returned as change, never persisted against the sale.
    pub amount_paid: Money,

    /// Cash handed back to the payer.
    pub change_given: Money,

    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,

    /// Amount the customer's running balance must increase by: the due
    /// left open by this sale. Zero for fully paid sales.
    pub balance_delta: Money,
}

// =============================================================================
// Line Math
// =============================================================================

/// Computes one line's subtotal from its price, quantity, and discount.
///
/// Belongs to the cart-building flow; settlement itself trusts the
/// subtotal the caller locked in.
///
/// ## Example
/// ```rust
/// use welgama_core::settlement::line_subtotal;
/// use welgama_core::types::DiscountType;
/// use welgama_core::Money;
///
/// // 3 × Rs 4.20, 10% off → Rs 11.34
/// let subtotal = line_subtotal(Money::from_cents(420), 3, 10, DiscountType::Percentage);
/// assert_eq!(subtotal.cents(), 1134);
/// ```
pub fn line_subtotal(
    unit_price: Money,
    quantity: i64,
    discount_value: i64,
    discount_type: DiscountType,
) -> Money {
    let gross = unit_price.multiply_quantity(quantity);
    let discount = match discount_type {
        DiscountType::Amount => Money::from_cents(discount_value),
        DiscountType::Percentage => gross.percentage_of(discount_value),
    };
    gross.sub_clamped(discount)
}

// =============================================================================
// Planning
// =============================================================================

/// Plans an immediate (counter) sale.
///
/// `tendered` defaults to the total when omitted, the common "exact cash"
/// case. A tendered amount below the total leaves a due; the operations
/// layer requires a customer to owe it (the plan carries the delta).
///
/// Zero or negative tendered amounts are rejected: recording a sale with
/// no payment at all is a credit sale, not an immediate one.
pub fn plan_immediate_sale(
    lines: &[CartLine],
    tendered: Option<Money>,
    is_delivered: bool,
) -> CoreResult<SettlementPlan> {
    validate_cart(lines)?;

    let total = cart_total(lines);
    let tendered = tendered.unwrap_or(total);

    if tendered.is_negative() || (!tendered.is_positive() && total.is_positive()) {
        return Err(CoreError::InvalidPaymentAmount {
            reason: "an immediate sale needs a payment; use a credit sale for zero payment"
                .to_string(),
        });
    }

    let change_given = tendered.sub_clamped(total);
    let amount_paid = tendered.min(total);
    let balance_delta = total.sub_clamped(amount_paid);

    let payment_status = if amount_paid >= total {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Partial
    };

    Ok(SettlementPlan {
        total,
        amount_paid,
        change_given,
        payment_status,
        order_status: order_status_for(is_delivered),
        balance_delta,
    })
}

/// Plans a credit sale ("add to book"): zero payment at creation, the
/// full total lands on the customer's balance.
pub fn plan_credit_sale(lines: &[CartLine], is_delivered: bool) -> CoreResult<SettlementPlan> {
    validate_cart(lines)?;

    let total = cart_total(lines);

    Ok(SettlementPlan {
        total,
        amount_paid: Money::zero(),
        change_given: Money::zero(),
        payment_status: PaymentStatus::Credit,
        order_status: order_status_for(is_delivered),
        balance_delta: total,
    })
}

fn cart_total(lines: &[CartLine]) -> Money {
    lines
        .iter()
        .fold(Money::zero(), |acc, line| acc + line.subtotal())
}

fn order_status_for(is_delivered: bool) -> OrderStatus {
    if is_delivered {
        OrderStatus::Completed
    } else {
        OrderStatus::PendingDelivery
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(subtotal: i64) -> CartLine {
        CartLine {
            product_id: "p1".to_string(),
            quantity: 1,
            unit_price_cents: subtotal,
            discount_value: 0,
            discount_type: DiscountType::Amount,
            subtotal_cents: subtotal,
        }
    }

    #[test]
    fn test_line_subtotal_amount_discount() {
        // 2 × Rs 50.00 − Rs 5.00 = Rs 95.00
        let subtotal = line_subtotal(Money::from_cents(5000), 2, 500, DiscountType::Amount);
        assert_eq!(subtotal.cents(), 9500);
    }

    #[test]
    fn test_line_subtotal_percentage_discount() {
        // 2 × Rs 50.00 at 25% off = Rs 75.00
        let subtotal = line_subtotal(Money::from_cents(5000), 2, 25, DiscountType::Percentage);
        assert_eq!(subtotal.cents(), 7500);
    }

    #[test]
    fn test_line_subtotal_never_negative() {
        let subtotal = line_subtotal(Money::from_cents(100), 1, 500, DiscountType::Amount);
        assert!(subtotal.is_zero());
    }

    #[test]
    fn test_immediate_exact_payment() {
        // Items totaling 100, paid 100 → change 0, Paid
        let plan =
            plan_immediate_sale(&[line(10000)], Some(Money::from_cents(10000)), true).unwrap();

        assert_eq!(plan.total.cents(), 10000);
        assert_eq!(plan.amount_paid.cents(), 10000);
        assert!(plan.change_given.is_zero());
        assert_eq!(plan.payment_status, PaymentStatus::Paid);
        assert_eq!(plan.order_status, OrderStatus::Completed);
        assert!(plan.balance_delta.is_zero());
    }

    #[test]
    fn test_immediate_overpayment_gives_change() {
        // Items totaling 100, paid 150 → change 50; the excess is
        // returned, not persisted against the sale
        let plan =
            plan_immediate_sale(&[line(10000)], Some(Money::from_cents(15000)), true).unwrap();

        assert_eq!(plan.change_given.cents(), 5000);
        assert_eq!(plan.amount_paid.cents(), 10000);
        assert_eq!(plan.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_immediate_defaults_to_total() {
        let plan = plan_immediate_sale(&[line(4200), line(800)], None, false).unwrap();

        assert_eq!(plan.total.cents(), 5000);
        assert_eq!(plan.amount_paid.cents(), 5000);
        assert_eq!(plan.payment_status, PaymentStatus::Paid);
        assert_eq!(plan.order_status, OrderStatus::PendingDelivery);
    }

    #[test]
    fn test_immediate_partial_payment_leaves_due() {
        let plan =
            plan_immediate_sale(&[line(10000)], Some(Money::from_cents(6000)), true).unwrap();

        assert_eq!(plan.payment_status, PaymentStatus::Partial);
        assert_eq!(plan.amount_paid.cents(), 6000);
        assert_eq!(plan.balance_delta.cents(), 4000);
        assert!(plan.change_given.is_zero());
    }

    #[test]
    fn test_immediate_rejects_zero_payment() {
        let result = plan_immediate_sale(&[line(10000)], Some(Money::zero()), true);
        assert!(matches!(
            result,
            Err(CoreError::InvalidPaymentAmount { .. })
        ));
    }

    #[test]
    fn test_credit_sale_plan() {
        // Items totaling 250 → Credit, paid 0, full total on the balance
        let plan = plan_credit_sale(&[line(25000)], false).unwrap();

        assert_eq!(plan.total.cents(), 25000);
        assert!(plan.amount_paid.is_zero());
        assert!(plan.change_given.is_zero());
        assert_eq!(plan.payment_status, PaymentStatus::Credit);
        assert_eq!(plan.balance_delta.cents(), 25000);
    }

    #[test]
    fn test_empty_cart_rejected() {
        assert!(plan_immediate_sale(&[], None, true).is_err());
        assert!(plan_credit_sale(&[], true).is_err());
    }
}
