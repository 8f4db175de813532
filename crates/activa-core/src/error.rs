//! # Error Types
//!
//! Domain-specific error types for activa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  activa-core errors (this file)                                        │
//! │  ├── CoreError        - Cart / pricing rule violations                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  activa-pos errors (host crate)                                        │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error here is locally recoverable. Out-of-range line indices are not
//! errors at all: the cart mutators return `None` and leave the cart as is.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Checkout attempted with no lines in the cart.
    ///
    /// The UI normally disables the checkout button, so reaching this means
    /// the caller skipped that check.
    #[error("Cannot complete a sale with an empty cart")]
    EmptyCart,

    /// A percentage typed by the user could not be used.
    ///
    /// ## When This Occurs
    /// - The text is not a number ("abc", "10%%", "NaN")
    /// - The number has more than two decimals
    /// - A bulk price change below -100% (it would make prices negative)
    ///
    /// The caller must re-prompt. Prices are never touched when this is
    /// returned.
    #[error("Invalid percentage '{input}': {reason}")]
    InvalidPercentage { input: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    pub(crate) fn invalid_percentage(input: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidPercentage {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised when a record coming from a form or from the table store does not
/// satisfy the entity invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., the same size label twice in one product).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoreError::EmptyCart.to_string(),
            "Cannot complete a sale with an empty cart"
        );

        let err = CoreError::invalid_percentage("abc", "not a number");
        assert_eq!(err.to_string(), "Invalid percentage 'abc': not a number");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Duplicate {
            field: "talle".to_string(),
            value: "M".to_string(),
        };
        assert_eq!(err.to_string(), "talle 'M' already exists");

        let err = ValidationError::MustBeNonNegative {
            field: "precio".to_string(),
        };
        assert_eq!(err.to_string(), "precio must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "nombre".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
