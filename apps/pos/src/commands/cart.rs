//! # Cart Commands
//!
//! Commands behind the right-hand panel of the Ventas screen.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────────┐     ┌──────────┐   │
//! │  │  Empty   │────►│ In Cart  │────►│  Adjustment  │────►│  Sale    │   │
//! │  │  Cart    │     │          │     │  (optional)  │     │  (sale.rs│   │
//! │  └──────────┘     └──────────┘     └──────────────┘     └──────────┘   │
//! │                        │                  │                             │
//! │                   add_to_cart       toggle_adjustment                   │
//! │                   update_cart_item  set_adjustment                      │
//! │                   remove_from_cart  edit_adjustment                     │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────► (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use activa_core::{
    remaining_stock, Adjustment, AdjustmentKind, AdjustmentMethod, Cart, CartLine, Money,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::SessionState;

/// Cart response including lines and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLine>,
    pub totals: CartTotals,
}

/// Totals block under the cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: u32,
    pub subtotal: Money,
    pub adjustment: Adjustment,
    pub adjustment_amount: Money,
    pub total_final: Money,
    /// The discount exceeds the subtotal; the UI warns before checkout.
    pub over_adjusted: bool,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
            adjustment: cart.adjustment(),
            adjustment_amount: cart.adjustment_amount(),
            total_final: cart.final_total(),
            over_adjusted: cart.is_over_adjusted(),
        }
    }
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.lines().to_vec(),
            totals: CartTotals::from(cart),
        }
    }
}

/// Gets the current cart contents.
pub fn get_cart(session: &SessionState) -> CartResponse {
    debug!("get_cart command");
    session.with_session(|s| CartResponse::from(s.cart()))
}

/// Adds one unit of a product in a size.
///
/// ## Behavior
/// - Same product and size already in the cart: quantity + 1
/// - Otherwise: new line, price frozen at the current catalog price
///
/// ## Errors
/// - `NOT_FOUND`: unknown product or size
/// - `VALIDATION_ERROR`: no units of that size left once the cart is counted
///   (the size button should have been disabled)
pub fn add_to_cart(
    session: &SessionState,
    product_id: &str,
    size: &str,
) -> Result<CartResponse, ApiError> {
    debug!(product_id, size, "add_to_cart command");

    session.with_session_mut(|s| {
        let product = s
            .product(product_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Product", product_id))?;
        let label = product
            .size(size)
            .map(|row| row.size().to_string())
            .ok_or_else(|| ApiError::not_found("Size", size))?;

        if remaining_stock(&product, &label, s.cart()) == 0 {
            warn!(product_id, size = %label, "no stock left for size");
            return Err(ApiError::validation(format!(
                "No stock left for {} ({})",
                product.name(),
                label
            )));
        }

        s.cart_mut().add_item(&product, &label);
        Ok(CartResponse::from(s.cart()))
    })
}

/// Changes the quantity of the line at `index` by `delta` (the +/- buttons).
///
/// Quantity never drops below 1. An index that is no longer in the cart is
/// ignored.
pub fn update_cart_item(session: &SessionState, index: usize, delta: i64) -> CartResponse {
    debug!(index, delta, "update_cart_item command");

    session.with_session_mut(|s| {
        if s.cart_mut().set_quantity(index, delta).is_none() {
            debug!(index, "update_cart_item: index out of range, ignored");
        }
        CartResponse::from(s.cart())
    })
}

/// Removes the line at `index`. Out-of-range indices are ignored.
pub fn remove_from_cart(session: &SessionState, index: usize) -> CartResponse {
    debug!(index, "remove_from_cart command");

    session.with_session_mut(|s| {
        if s.cart_mut().remove_item(index).is_none() {
            debug!(index, "remove_from_cart: index out of range, ignored");
        }
        CartResponse::from(s.cart())
    })
}

/// Discount / surcharge buttons.
pub fn toggle_adjustment(session: &SessionState, kind: AdjustmentKind) -> CartResponse {
    debug!(?kind, "toggle_adjustment command");

    session.with_session_mut(|s| {
        s.cart_mut().toggle_adjustment(kind);
        CartResponse::from(s.cart())
    })
}

/// Replaces the adjustment; the same kind again clears it.
///
/// `magnitude` is basis points for `Percentage`, currency units for `Fixed`.
pub fn set_adjustment(
    session: &SessionState,
    kind: AdjustmentKind,
    method: AdjustmentMethod,
    magnitude: i64,
) -> Result<CartResponse, ApiError> {
    debug!(?kind, ?method, magnitude, "set_adjustment command");

    session.with_session_mut(|s| {
        s.cart_mut().set_adjustment(kind, method, magnitude)?;
        Ok(CartResponse::from(s.cart()))
    })
}

/// Method selector and value input next to the adjustment buttons.
pub fn edit_adjustment(
    session: &SessionState,
    method: AdjustmentMethod,
    magnitude: i64,
) -> Result<CartResponse, ApiError> {
    debug!(?method, magnitude, "edit_adjustment command");

    session.with_session_mut(|s| {
        s.cart_mut().edit_adjustment(method, magnitude)?;
        Ok(CartResponse::from(s.cart()))
    })
}

/// Empties the cart. The typed adjustment stays.
pub fn clear_cart(session: &SessionState) -> CartResponse {
    debug!("clear_cart command");

    session.with_session_mut(|s| {
        s.cart_mut().clear();
        CartResponse::from(s.cart())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::Session;
    use activa_core::{Product, ProductDraft};

    fn state() -> SessionState {
        let products = vec![
            Product::try_from(
                ProductDraft::new("1", "Remera Pro Run", 25000)
                    .size("S", 10)
                    .size("L", 3),
            )
            .unwrap(),
            Product::try_from(ProductDraft::new("2", "Zapatillas Ultra Boost", 85000).size("43", 1))
                .unwrap(),
        ];
        SessionState::new(Session::new(products, Vec::new()))
    }

    #[test]
    fn test_add_and_totals() {
        let state = state();
        add_to_cart(&state, "1", "S").unwrap();
        add_to_cart(&state, "1", "s").unwrap();
        let cart = add_to_cart(&state, "2", "43").unwrap();

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items[0].quantity(), 2);
        assert_eq!(cart.totals.total_quantity, 3);
        assert_eq!(cart.totals.subtotal.units(), 135000);
        assert_eq!(cart.totals.total_final, cart.totals.subtotal);
    }

    #[test]
    fn test_add_unknown_product_or_size() {
        let state = state();
        assert_eq!(add_to_cart(&state, "99", "S").unwrap_err().code, ErrorCode::NotFound);
        assert_eq!(add_to_cart(&state, "1", "XXL").unwrap_err().code, ErrorCode::NotFound);
    }

    #[test]
    fn test_add_beyond_remaining_stock_rejected() {
        let state = state();
        add_to_cart(&state, "2", "43").unwrap();

        let err = add_to_cart(&state, "2", "43").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_cart(&state).totals.total_quantity, 1);
    }

    #[test]
    fn test_quantity_and_remove_out_of_range_are_noops() {
        let state = state();
        add_to_cart(&state, "1", "S").unwrap();
        let before = get_cart(&state);

        assert_eq!(update_cart_item(&state, 3, 1), before);
        assert_eq!(remove_from_cart(&state, 3), before);

        let cart = update_cart_item(&state, 0, -5);
        assert_eq!(cart.items[0].quantity(), 1);

        let cart = remove_from_cart(&state, 0);
        assert!(cart.items.is_empty());
    }

    #[test]
    fn test_adjustment_commands() {
        let state = state();
        for _ in 0..4 {
            add_to_cart(&state, "1", "S").unwrap();
        }

        let cart = set_adjustment(
            &state,
            AdjustmentKind::Discount,
            AdjustmentMethod::Percentage,
            1000,
        )
        .unwrap();
        assert_eq!(cart.totals.total_final.units(), 90000);

        let cart = edit_adjustment(&state, AdjustmentMethod::Fixed, 5000).unwrap();
        assert_eq!(cart.totals.total_final.units(), 95000);

        let cart = toggle_adjustment(&state, AdjustmentKind::Surcharge);
        assert_eq!(cart.totals.total_final.units(), 105000);

        let err = edit_adjustment(&state, AdjustmentMethod::Fixed, -1).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_over_adjusted_flag() {
        let state = state();
        add_to_cart(&state, "1", "S").unwrap();
        let cart =
            set_adjustment(&state, AdjustmentKind::Discount, AdjustmentMethod::Fixed, 30000)
                .unwrap();
        assert!(cart.totals.over_adjusted);
        assert_eq!(cart.totals.total_final.units(), -5000);
    }

    #[test]
    fn test_clear_cart_keeps_adjustment() {
        let state = state();
        add_to_cart(&state, "1", "S").unwrap();
        set_adjustment(&state, AdjustmentKind::Discount, AdjustmentMethod::Fixed, 100).unwrap();

        let cart = clear_cart(&state);
        assert!(cart.items.is_empty());
        assert_eq!(cart.totals.adjustment.kind(), AdjustmentKind::Discount);
    }
}
