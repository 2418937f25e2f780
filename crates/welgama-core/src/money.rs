//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  In many retail systems:                                            │
//! │    Rs 10.00 / 3 = Rs 3.33 (×3 = Rs 9.99)  → Lost Rs 0.01!           │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Cents                                        │
//! │    1000 cents / 3 = 333 cents (×3 = 999 cents)                      │
//! │    We KNOW we lost 1 cent, and handle it explicitly                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use welgama_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // Rs 10.99
//!
//! // Arithmetic operations
//! let doubled = price * 2;                      // Rs 21.98
//! let total = price + Money::from_cents(500);   // Rs 15.99
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative intermediates (raw dues, drift)
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
///
/// Every monetary value in the system flows through this type:
/// product prices, line subtotals, sale totals, payments, balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use welgama_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents Rs 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (rupees) portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use welgama_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // Rs 2.99
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 897); // Rs 8.97
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Subtracts, flooring the result at zero.
    ///
    /// Used where a negative result has no business meaning: displayed
    /// dues, customer balances, change calculations.
    ///
    /// ## Example
    /// ```rust
    /// use welgama_core::money::Money;
    ///
    /// let balance = Money::from_cents(100);
    /// let applied = Money::from_cents(150);
    /// assert_eq!(balance.sub_clamped(applied), Money::zero());
    /// ```
    #[inline]
    pub const fn sub_clamped(self, other: Money) -> Money {
        let diff = self.0 - other.0;
        Money(if diff > 0 { diff } else { 0 })
    }

    /// Computes a whole-number percentage of this amount, rounded to the
    /// nearest cent.
    ///
    /// ## Implementation
    /// Integer math: `(amount * percent + 50) / 100`. The +50 provides
    /// rounding (50/100 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use welgama_core::money::Money;
    ///
    /// let gross = Money::from_cents(10000); // Rs 100.00
    /// assert_eq!(gross.percentage_of(10).cents(), 1000); // 10% = Rs 10.00
    /// assert_eq!(Money::from_cents(999).percentage_of(10).cents(), 100);
    /// ```
    pub fn percentage_of(&self, percent: i64) -> Money {
        // i128 intermediate to prevent overflow on large amounts
        let part = (self.0 as i128 * percent as i128 + 50) / 100;
        Money::from_cents(part as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// For debugging and log/audit descriptions; UI formatting (localization)
/// belongs to the excluded presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rs {}.{:02}", sign, self.major().abs(), self.minor())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "Rs 10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "Rs 5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-Rs 5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "Rs 0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_sub_clamped() {
        let a = Money::from_cents(100);
        let b = Money::from_cents(150);

        assert_eq!(a.sub_clamped(b), Money::zero());
        assert_eq!(b.sub_clamped(a).cents(), 50);
        assert_eq!(a.sub_clamped(a), Money::zero());
    }

    #[test]
    fn test_percentage_of_with_rounding() {
        // Rs 9.99 at 10% = 99.9 cents → rounds to 100
        assert_eq!(Money::from_cents(999).percentage_of(10).cents(), 100);
        // Rs 100.00 at 10% = Rs 10.00 exactly
        assert_eq!(Money::from_cents(10000).percentage_of(10).cents(), 1000);
        // 0% is always zero
        assert_eq!(Money::from_cents(10000).percentage_of(0).cents(), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(299);
        let line_total = unit_price.multiply_quantity(3);
        assert_eq!(line_total.cents(), 897);
    }

    /// Documents the intentional precision loss on integer division.
    #[test]
    fn test_division_precision_loss_documented() {
        let ten = Money::from_cents(1000);
        let one_third = Money::from_cents(1000 / 3); // 333 cents
        let reconstructed: Money = one_third * 3; // 999 cents

        assert_eq!(reconstructed.cents(), 999);
        let lost = ten - reconstructed;
        assert_eq!(lost.cents(), 1);
    }
}
