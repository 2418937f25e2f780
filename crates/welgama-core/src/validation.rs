//! # Validation Module
//!
//! Input validation utilities for Welgama POS.
//!
//! ## Validation Strategy
//! Validation runs in the operations layer before any write happens;
//! a validation failure never touches the store. The database's
//! NOT NULL / UNIQUE / CHECK / FK constraints are the final backstop.
//!
//! ## Usage
//! ```rust
//! use welgama_core::validation::{validate_name, validate_quantity};
//!
//! validate_name("name", "4-inch Nails 1kg").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::{CartLine, DiscountType};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required display name (product, customer, category, unit).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a mandatory free-text reason (stock adjustments, expenses).
///
/// A quantity change without a reason is not auditable, so the reason is
/// rejected before any write.
pub fn validate_reason(reason: &str) -> ValidationResult<()> {
    let reason = reason.trim();

    if reason.is_empty() {
        return Err(ValidationError::Required {
            field: "reason".to_string(),
        });
    }

    if reason.len() > 500 {
        return Err(ValidationError::TooLong {
            field: "reason".to_string(),
            max: 500,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0); zero is allowed (free items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a payment amount in cents.
///
/// ## Rules
/// - Must be positive (> 0); the allocator never processes non-positive
///   amounts, and this check runs before any write
pub fn validate_payment_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a line discount against its type.
///
/// ## Rules
/// - Amount discounts: non-negative cents
/// - Percentage discounts: 0-100 whole percent
pub fn validate_discount(value: i64, discount_type: DiscountType) -> ValidationResult<()> {
    match discount_type {
        DiscountType::Amount => {
            if value < 0 {
                return Err(ValidationError::OutOfRange {
                    field: "discount".to_string(),
                    min: 0,
                    max: i64::MAX,
                });
            }
        }
        DiscountType::Percentage => {
            if !(0..=100).contains(&value) {
                return Err(ValidationError::OutOfRange {
                    field: "discount".to_string(),
                    min: 0,
                    max: 100,
                });
            }
        }
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the shape of a cart handed to settlement.
///
/// ## Rules
/// - Must not be empty (checked by the settlement planner too; this
///   variant reports it as a validation error with the field name)
/// - Must not exceed MAX_CART_ITEMS lines
/// - Every line: positive quantity, non-negative prices, valid discount
///
/// Stock availability is deliberately NOT checked here: the cart-building
/// flow checks it, and the conditional decrement at commit time is the
/// authoritative guard.
pub fn validate_cart(lines: &[CartLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if lines.len() > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_CART_ITEMS as i64,
        });
    }

    for line in lines {
        validate_quantity(line.quantity)?;
        validate_price_cents(line.unit_price_cents)?;
        validate_price_cents(line.subtotal_cents)?;
        validate_discount(line.discount_value, line.discount_type)?;
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use welgama_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(qty: i64, price: i64, discount: i64, ty: DiscountType) -> CartLine {
        CartLine {
            product_id: "p1".to_string(),
            quantity: qty,
            unit_price_cents: price,
            discount_value: discount,
            discount_type: ty,
            subtotal_cents: price * qty,
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "PVC Pipe 1/2 inch").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_reason_mandatory() {
        assert!(validate_reason("damaged in storage").is_ok());
        assert!(validate_reason("").is_err());
        assert!(validate_reason("  ").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(1).is_ok());
        assert!(validate_payment_amount(0).is_err());
        assert!(validate_payment_amount(-500).is_err());
    }

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount(500, DiscountType::Amount).is_ok());
        assert!(validate_discount(-1, DiscountType::Amount).is_err());

        assert!(validate_discount(0, DiscountType::Percentage).is_ok());
        assert!(validate_discount(100, DiscountType::Percentage).is_ok());
        assert!(validate_discount(101, DiscountType::Percentage).is_err());
    }

    #[test]
    fn test_validate_cart() {
        assert!(validate_cart(&[]).is_err());
        assert!(validate_cart(&[line(2, 42000, 0, DiscountType::Amount)]).is_ok());
        assert!(validate_cart(&[line(0, 42000, 0, DiscountType::Amount)]).is_err());
        assert!(validate_cart(&[line(1, -5, 0, DiscountType::Amount)]).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("123").is_err());
    }
}
