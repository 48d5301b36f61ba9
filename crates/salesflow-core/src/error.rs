//! # Error Types
//!
//! Domain-specific error types for salesflow-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  salesflow-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  salesflow-db errors (separate crate)                                   │
//! │  └── DbError          - Database failures, wraps CoreError              │
//! │                                                                         │
//! │  REST errors (apps/api)                                                 │
//! │  └── ApiError         - What the client sees ({code, message})          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, status, ...)
//! 3. Errors are enum variants, never String
//! 4. Messages are shown to the user verbatim, so they must read well

use thiserror::Error;

use crate::types::SaleStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised while pricing or settling a sale.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Not enough stock on hand for the requested quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout (Desk Lamp × 11)
    ///      │
    ///      ▼
    /// Check stock: available=10
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Desk Lamp", available: 10, requested: 11 }
    ///      │
    ///      ▼
    /// Client alerts: "Insufficient stock for Desk Lamp: available 10, requested 11"
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// A soft-deleted product was put in a cart.
    #[error("Product {product} is inactive and cannot be sold")]
    ProductInactive { product: String },

    /// The requested status change is not part of the sale lifecycle.
    #[error("Cannot change sale status from {} to {}", .from.as_str(), .to.as_str())]
    InvalidStatusTransition { from: SaleStatus, to: SaleStatus },

    /// Payment amount does not fit the sale.
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// A line subtotal or sale total does not fit in cents.
    #[error("{field} is too large")]
    AmountOverflow { field: String },

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Whether the error is a plain input problem (as opposed to a stock
    /// shortage). The REST layer uses this to pick the error code.
    pub fn is_validation(&self) -> bool {
        !matches!(self, CoreError::InsufficientStock { .. })
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any database work starts.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be zero or more.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product: "Desk Lamp".to_string(),
            available: 10,
            requested: 11,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Desk Lamp: available 10, requested 11"
        );

        let err = CoreError::InvalidStatusTransition {
            from: SaleStatus::Refunded,
            to: SaleStatus::Completed,
        };
        assert_eq!(
            err.to_string(),
            "Cannot change sale status from Refunded to Completed"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "salesperson".to_string(),
        };
        assert_eq!(err.to_string(), "salesperson is required");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        };
        assert_eq!(err.to_string(), "password must be at least 6 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert!(core_err.is_validation());
        // Wrapped message is passed through untouched
        assert_eq!(core_err.to_string(), "sku is required");
    }
}
