//! # Balance Calculator
//!
//! Pure functions computing a sale's outstanding due and a customer's
//! aggregate balance. No side effects, no failure modes: callers pass
//! already-validated data and always get a number back.

use crate::money::Money;
use crate::types::{PaymentStatus, Sale};

/// Raw (signed) outstanding due on a sale: `total - paid`.
///
/// A negative result means more was recorded against the sale than its
/// total, an invariant breach upstream, not a state this system ever
/// writes. The allocator treats it as a bug signal rather than silently
/// hiding it; display paths use [`sale_due`] instead.
#[inline]
pub fn sale_due_raw(total: Money, paid: Money) -> Money {
    total - paid
}

/// Outstanding due on a sale, floored at zero for display purposes.
///
/// ## Example
/// ```rust
/// use welgama_core::balance::sale_due;
/// use welgama_core::Money;
///
/// let due = sale_due(Money::from_cents(10000), Money::from_cents(4000));
/// assert_eq!(due.cents(), 6000);
///
/// // Fully paid sales show zero, never negative
/// let due = sale_due(Money::from_cents(10000), Money::from_cents(10000));
/// assert!(due.is_zero());
/// ```
#[inline]
pub fn sale_due(total: Money, paid: Money) -> Money {
    total.sub_clamped(paid)
}

/// Aggregate outstanding balance across a customer's sales: the sum of
/// each unpaid/partial sale's due. Fully paid sales contribute nothing.
pub fn customer_outstanding(sales: &[Sale]) -> Money {
    sales
        .iter()
        .filter(|s| s.payment_status != PaymentStatus::Paid)
        .fold(Money::zero(), |acc, s| {
            acc + sale_due(s.total(), s.amount_paid())
        })
}

/// New customer balance after applying a payment:
/// `max(current - applied, 0)`.
///
/// The clamp is load-bearing: a hypothetically over-applied amount must
/// never drive the stored balance negative.
#[inline]
pub fn settle_against_balance(current: Money, applied: Money) -> Money {
    current.sub_clamped(applied)
}

// =============================================================================
// Unit Tests
// =============================================================================
