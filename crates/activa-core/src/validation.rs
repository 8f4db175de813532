//! # Validation Module
//!
//! Field rules applied when a product, size row or category is built from a
//! form or from a record read out of the table store.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: UI form        - required inputs, number inputs              │
//! │  Layer 2: THIS MODULE    - entity invariants (price >= 0, unique       │
//! │                            size labels, lengths)                        │
//! │  Layer 3: Table store    - keys, foreign keys                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use activa_core::validation::{validate_price, validate_size_label};
//!
//! assert!(validate_price("precio", 25000).is_ok());
//! assert!(validate_price("precio", -1).is_err());
//! assert!(validate_size_label("XL").is_ok());
//! ```

use crate::error::ValidationError;
use crate::{MAX_PERCENT_BPS, MAX_PRICE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

pub const MAX_PRODUCT_NAME_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MAX_CATEGORY_NAME_LEN: usize = 60;
pub const MAX_SIZE_LABEL_LEN: usize = 10;
pub const MAX_SEARCH_QUERY_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates a product name and returns it trimmed.
///
/// ## Example
/// ```rust
/// use activa_core::validation::validate_product_name;
///
/// assert_eq!(validate_product_name("  Remera Pro Run ").unwrap(), "Remera Pro Run");
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    validate_required_text("nombre", name, MAX_PRODUCT_NAME_LEN)
}

/// Validates a category name and returns it trimmed.
pub fn validate_category_name(name: &str) -> ValidationResult<String> {
    validate_required_text("categoria", name, MAX_CATEGORY_NAME_LEN)
}

/// Validates a size label ("S", "XL", "42") and returns it trimmed.
pub fn validate_size_label(label: &str) -> ValidationResult<String> {
    validate_required_text("talle", label, MAX_SIZE_LABEL_LEN)
}

/// Descriptions are optional; only the length is checked.
pub fn validate_description(description: &str) -> ValidationResult<String> {
    let description = description.trim();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "descripcion".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }
    Ok(description.to_string())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (matches everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price or cost in whole currency units.
///
/// ## Rules
/// - Must be non-negative; zero is allowed (promotional items)
/// - Must not exceed `MAX_PRICE`
pub fn validate_price(field: &str, units: i64) -> ValidationResult<()> {
    if units < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    if units > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE,
        });
    }

    Ok(())
}

/// Validates a percentage magnitude in basis points (0 to `MAX_PERCENT_BPS`).
pub fn validate_percent_bps(field: &str, bps: i64) -> ValidationResult<()> {
    if bps < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    if bps > MAX_PERCENT_BPS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PERCENT_BPS,
        });
    }

    Ok(())
}

/// Validates a stock count or threshold and narrows it to `u32`.
pub fn validate_stock_count(field: &str, count: i64) -> ValidationResult<u32> {
    if count < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    u32::try_from(count).map_err(|_| ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: u32::MAX as i64,
    })
}

// =============================================================================
// Collection Validators
// =============================================================================

/// True when two size labels name the same size: trimmed,
/// case-insensitive, so "m" and " M " are equal.
pub fn same_size_label(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Rejects a size label that already appears in `existing`.
pub fn validate_unique_size<'a>(
    label: &str,
    existing: impl IntoIterator<Item = &'a str>,
) -> ValidationResult<()> {
    if existing
        .into_iter()
        .any(|other| same_size_label(other, label))
    {
        return Err(ValidationError::Duplicate {
            field: "talle".to_string(),
            value: label.trim().to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
