//! # Operation Error Type
//!
//! The uniform failure shape for every boundary operation.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  Error Flow in Welgama POS                          │
//! │                                                                     │
//! │  Validation Error ── CoreError::Validation ──┐                      │
//! │  Business Error ──── CoreError::...  ────────┤                      │
//! │  Store Failure ───── DbError::... ───────────┼──► OpError ──► caller│
//! │                                              │   {code, message}   │
//! │  Audit failure ──── swallowed, never here ───┘                      │
//! │                                                                     │
//! │  Persistence causes are logged server-side via tracing and          │
//! │  flattened to a generic message: callers never see SQL details.     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried; callers treat any `OpError` as a uniform failure
//! to report upward.

use serde::Serialize;
use welgama_core::CoreError;
use welgama_db::DbError;

/// Operation error returned from every boundary operation.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Customer not found: 3f2a..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for operation responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed (rejected before any write)
    ValidationError,

    /// Underlying store failure (cause logged server-side only)
    DatabaseError,

    /// Business rule violation
    BusinessLogic,

    /// Insufficient stock at commit time
    InsufficientStock,

    /// Payment processing error
    PaymentError,

    /// Internal error
    Internal,
}

impl OpError {
    /// Creates a new operation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        OpError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        OpError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        OpError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a business-logic error.
    pub fn business(message: impl Into<String>) -> Self {
        OpError::new(ErrorCode::BusinessLogic, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        OpError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to operation errors.
///
/// Persistence failures are logged with their cause and reported
/// generically; constraint violations keep a user-facing message.
impl From<DbError> for OpError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => OpError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => OpError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                OpError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                OpError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                OpError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                OpError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                OpError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                OpError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                OpError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core (business) errors to operation errors.
impl From<CoreError> for OpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => OpError::not_found("Product", &id),
            CoreError::SaleNotFound(id) => OpError::not_found("Sale", &id),
            CoreError::CustomerNotFound(id) => OpError::not_found("Customer", &id),
            CoreError::InsufficientStock {
                name,
                available,
                requested,
            } => OpError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    name, available, requested
                ),
            ),
            CoreError::EmptyCart => OpError::validation("Cart is empty"),
            CoreError::CustomerRequired { reason } => {
                OpError::validation(format!("A customer is required: {}", reason))
            }
            CoreError::InvalidPaymentAmount { reason } => OpError::new(
                ErrorCode::PaymentError,
                format!("Invalid payment amount: {}", reason),
            ),
            CoreError::SaleNotOwned {
                sale_id,
                customer_id,
            } => OpError::business(format!(
                "Sale {} does not belong to customer {}",
                sale_id, customer_id
            )),
            CoreError::Validation(e) => OpError::validation(e.to_string()),
        }
    }
}

impl std::fmt::Display for OpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for OpError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_flattening() {
        let err: OpError = DbError::QueryFailed("syntax error near SELECT".to_string()).into();
        // Callers get a generic message, never SQL details
        assert_eq!(err.message, "Database operation failed");
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn test_not_found_mapping() {
        let err: OpError = DbError::not_found("Customer", "c9").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Customer not found: c9");
    }

    #[test]
    fn test_serialized_shape() {
        let err = OpError::validation("Cart is empty");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "Cart is empty");
    }
}
