//! # API Error Type
//!
//! Unified error type for the commands the UI invokes.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Activa POS                             │
//! │                                                                         │
//! │  UI                          Rust Host                                  │
//! │  ──                          ─────────                                  │
//! │                                                                         │
//! │  invoke('bulk_update_prices', { input: 'diez' })                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Core rule broken? ── CoreError::InvalidPercentage ──┐          │  │
//! │  │         │                                             │          │  │
//! │  │         ▼                                             ▼          │  │
//! │  │  Collaborator failed? ── ReceiptError / HistoryError ─ ApiError ►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  catch (e) {                                                            │
//! │    // e.code    = "INVALID_PERCENTAGE"                                  │
//! │    // e.message = "Invalid percentage 'diez': not a number"             │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use activa_core::{CoreError, ValidationError};
use serde::Serialize;

use crate::history::HistoryError;
use crate::receipt::ReceiptError;

/// Error returned from every fallible command.
///
/// ## Serialization
/// ```json
/// {
///   "code": "EMPTY_CART",
///   "message": "Cannot complete a sale with an empty cart"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
///
/// ## Usage in the UI
/// ```typescript
/// switch (e.code) {
///   case 'EMPTY_CART':          // keep HACER VENTA disabled
///   case 'INVALID_PERCENTAGE':  // re-open the percentage prompt
///   case 'VALIDATION_ERROR':    // show the form message
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Checkout with nothing in the cart
    EmptyCart,

    /// Percentage input could not be used
    InvalidPercentage,

    /// Input validation failed
    ValidationError,

    /// Product, size or sale not found
    NotFound,

    /// Receipt could not be rendered or written
    ReceiptError,

    /// Sales history rejected the sale
    HistoryError,

    /// Anything else
    InternalError,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InternalError, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyCart => ApiError::new(ErrorCode::EmptyCart, err.to_string()),
            CoreError::InvalidPercentage { .. } => {
                ApiError::new(ErrorCode::InvalidPercentage, err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ReceiptError> for ApiError {
    fn from(err: ReceiptError) -> Self {
        tracing::error!(error = %err, "receipt generation failed");
        ApiError::new(ErrorCode::ReceiptError, err.to_string())
    }
}

impl From<HistoryError> for ApiError {
    fn from(err: HistoryError) -> Self {
        tracing::error!(error = %err, "sales history rejected sale");
        ApiError::new(ErrorCode::HistoryError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
