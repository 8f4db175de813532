//! # Sale Commands
//!
//! Checkout and the Historial screen.
//!
//! ## Checkout Sequence
//! ```text
//! ┌──────────┐   snapshot   ┌──────────┐   generate   ┌──────────┐
//! │   Cart   │─────────────►│   Sale   │─────────────►│ Receipt  │
//! └──────────┘              └──────────┘              └──────────┘
//!      ▲                         │ record
//!      │ reset                   ▼
//!      │                   ┌──────────────┐
//!      └───────────────────│ SalesHistory │
//!        (only after both  └──────────────┘
//!         steps succeed)
//! ```
//!
//! If the ticket or the history store fails, the cart is left exactly as it
//! was and the cashier can retry.

use activa_core::validation::validate_search_query;
use activa_core::Sale;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::history::SalesHistory;
use crate::receipt::{Receipt, ReceiptGenerator};
use crate::state::SessionState;

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSale {
    pub sale: Sale,
    pub receipt: Receipt,
}

/// Completes the sale for the current cart.
///
/// ## Errors
/// - `EMPTY_CART`: nothing to sell
/// - `RECEIPT_ERROR`: the ticket could not be rendered
/// - `HISTORY_ERROR`: the sale could not be recorded
pub fn complete_sale(
    session: &SessionState,
    receipts: &dyn ReceiptGenerator,
    history: &mut dyn SalesHistory,
) -> Result<CompletedSale, ApiError> {
    debug!("complete_sale command");

    session.with_session_mut(|s| {
        let sale = s.cart().snapshot_sale()?;
        let receipt = receipts.generate(&sale)?;
        history.record(sale.clone())?;

        s.cart_mut().reset();

        info!(
            sale_id = %sale.id(),
            receipt = %sale.receipt_number(),
            items = sale.item_count(),
            total = %sale.total_final(),
            "sale completed"
        );
        Ok(CompletedSale { sale, receipt })
    })
}

/// Historial search by text and optional calendar day.
pub fn search_sales(
    history: &dyn SalesHistory,
    query: &str,
    date: Option<NaiveDate>,
) -> Result<Vec<Sale>, ApiError> {
    let query = validate_search_query(query)?;
    debug!(query = %query, ?date, "search_sales command");

    Ok(history.search(&query, date).into_iter().cloned().collect())
}

/// Full history as a pretty-printed JSON array, newest first.
pub fn export_sales(history: &dyn SalesHistory) -> Result<String, ApiError> {
    debug!("export_sales command");
    Ok(history.export_json()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::history::{local_date, InMemorySalesHistory};
    use crate::receipt::{ReceiptError, ThermalReceipt};
    use crate::state::{ConfigState, Session};
    use activa_core::{AdjustmentKind, AdjustmentMethod, Product, ProductDraft};

    fn state() -> SessionState {
        let products = vec![Product::try_from(
            ProductDraft::new("1", "Remera Pro Run", 25000)
                .cost(12000)
                .size("M", 10),
        )
        .unwrap()];
        SessionState::new(Session::new(products, Vec::new()))
    }

    fn fill_cart(state: &SessionState) {
        state.with_session_mut(|s| {
            let product = s.product("1").cloned().unwrap();
            let cart = s.cart_mut();
            cart.add_item(&product, "M");
            cart.add_item(&product, "M");
            cart.set_adjustment(AdjustmentKind::Discount, AdjustmentMethod::Percentage, 1000)
                .unwrap();
        });
    }

    struct BrokenPrinter;

    impl ReceiptGenerator for BrokenPrinter {
        fn generate(&self, _sale: &Sale) -> Result<Receipt, ReceiptError> {
            Err(ReceiptError::TooNarrow { width: 0 })
        }
    }

    #[test]
    fn test_complete_sale() {
        let state = state();
        fill_cart(&state);
        let printer = ThermalReceipt::new(&ConfigState::default());
        let mut history = InMemorySalesHistory::new();

        let done = complete_sale(&state, &printer, &mut history).unwrap();

        assert_eq!(done.sale.total_final().units(), 45000);
        assert!(done.receipt.content.contains("$45.000"));
        assert_eq!(history.len(), 1);

        // Cart and adjustment are reset for the next customer.
        state.with_session(|s| {
            assert!(s.cart().is_empty());
            assert!(!s.cart().adjustment().is_active());
        });
    }

    #[test]
    fn test_complete_sale_empty_cart() {
        let state = state();
        let printer = ThermalReceipt::new(&ConfigState::default());
        let mut history = InMemorySalesHistory::new();

        let err = complete_sale(&state, &printer, &mut history).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyCart);
        assert!(history.is_empty());
    }

    #[test]
    fn test_failed_receipt_keeps_cart() {
        let state = state();
        fill_cart(&state);
        let mut history = InMemorySalesHistory::new();

        let err = complete_sale(&state, &BrokenPrinter, &mut history).unwrap_err();

        assert_eq!(err.code, ErrorCode::ReceiptError);
        assert!(history.is_empty());
        state.with_session(|s| {
            assert_eq!(s.cart().total_quantity(), 2);
            assert!(s.cart().adjustment().is_active());
        });
    }

    #[test]
    fn test_search_sales() {
        let state = state();
        let printer = ThermalReceipt::new(&ConfigState::default());
        let mut history = InMemorySalesHistory::new();
        fill_cart(&state);
        let done = complete_sale(&state, &printer, &mut history).unwrap();
        let day = local_date(&done.sale);

        assert_eq!(search_sales(&history, "remera", Some(day)).unwrap().len(), 1);
        assert!(search_sales(&history, "remera", day.succ_opt()).unwrap().is_empty());
        assert_eq!(
            search_sales(&history, &"x".repeat(101), None).unwrap_err().code,
            ErrorCode::ValidationError
        );

        let json = export_sales(&history).unwrap();
        assert!(json.contains(done.sale.id()));
    }
}
