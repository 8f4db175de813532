//! # Inventory Commands
//!
//! Product search on the Ventas screen and the Inventario table with its
//! sort, selection and bulk price change.
//!
//! ## Bulk Price Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  [x] Remera Pro Run      click "Ajustar precios"                        │
//! │  [x] Zapatillas Ultra    prompt: "Porcentaje (+/-)"                     │
//! │  [ ] Botella Térmica          │                                         │
//! │                               ▼                                         │
//! │        cancelled ─────► None ─────► nothing happens                     │
//! │        "diez"    ─────► INVALID_PERCENTAGE, prices untouched, re-prompt │
//! │        "10"      ─────► 25000 → 27500, 85000 → 93500, selection cleared │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use activa_core::validation::validate_search_query;
use activa_core::{
    remaining_stock, Money, Percent, Product, ProductDraft, SortKey, SortState, StockReport,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{ConfigState, SessionState};

// =============================================================================
// Response Types
// =============================================================================

/// A product card on the Ventas screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosProduct {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub price: Money,
    /// Every size with the units still sellable; zero means the button is
    /// rendered disabled.
    pub sizes: Vec<SizeButton>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeButton {
    pub size: String,
    pub remaining: u32,
}

/// A row of the Inventario table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRow {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub price: Money,
    pub cost: Money,
    pub total_stock: u64,
    pub stock_critico: u32,
    pub critical: bool,
    pub sizes: Vec<SizeStock>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeStock {
    pub size: String,
    pub quantity: u32,
    pub critical: bool,
}

impl InventoryRow {
    fn new(product: &Product, selected: bool) -> Self {
        let report = StockReport::of(product);
        InventoryRow {
            id: product.id().to_string(),
            name: product.name().to_string(),
            category: product.category_name().map(str::to_string),
            price: product.price(),
            cost: product.cost(),
            total_stock: report.total,
            stock_critico: report.threshold,
            critical: report.critical,
            sizes: product
                .sizes()
                .iter()
                .map(|s| SizeStock {
                    size: s.size().to_string(),
                    quantity: s.quantity(),
                    critical: product.is_size_critical(s),
                })
                .collect(),
            selected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    /// Selected ids, sorted.
    pub selected_ids: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateResponse {
    pub updated: usize,
    pub percent: Option<Percent>,
}

// =============================================================================
// Commands
// =============================================================================

/// Searches products by name for the Ventas screen.
pub fn search_pos_products(
    session: &SessionState,
    query: &str,
) -> Result<Vec<PosProduct>, ApiError> {
    let query = validate_search_query(query)?;
    debug!(query = %query, "search_pos_products command");

    Ok(session.with_session_mut(|s| {
        s.set_pos_query(query);
        s.pos_view()
            .into_iter()
            .map(|p| PosProduct {
                id: p.id().to_string(),
                name: p.name().to_string(),
                category: p.category_name().map(str::to_string),
                price: p.price(),
                sizes: p
                    .sizes()
                    .iter()
                    .map(|row| SizeButton {
                        size: row.size().to_string(),
                        remaining: remaining_stock(p, row.size(), s.cart()),
                    })
                    .collect(),
            })
            .collect()
    }))
}

/// Lists the Inventario table, filtered and sorted.
///
/// `query: None` keeps the current search text.
pub fn list_inventory(
    session: &SessionState,
    query: Option<&str>,
) -> Result<Vec<InventoryRow>, ApiError> {
    let query = query
        .map(validate_search_query)
        .transpose()?;
    debug!(query = ?query, "list_inventory command");

    Ok(session.with_session_mut(|s| {
        if let Some(query) = query {
            s.set_inventory_query(query);
        }
        s.inventory_view()
            .into_iter()
            .map(|p| InventoryRow::new(p, s.selection().contains(p.id())))
            .collect()
    }))
}

/// Column header click.
pub fn sort_inventory(session: &SessionState, key: SortKey) -> SortState {
    debug!(?key, "sort_inventory command");
    session.with_session_mut(|s| {
        s.sort_mut().toggle(key);
        s.sort()
    })
}

/// Row checkbox.
pub fn toggle_select(
    session: &SessionState,
    product_id: &str,
) -> Result<SelectionResponse, ApiError> {
    debug!(product_id, "toggle_select command");
    session.with_session_mut(|s| {
        if s.product(product_id).is_none() {
            return Err(ApiError::not_found("Product", product_id));
        }
        s.selection_mut().toggle(product_id);
        Ok(selection_response(s.selection().ids().iter()))
    })
}

/// Header checkbox: selects every visible row, or clears when they all are.
pub fn toggle_select_all(session: &SessionState) -> SelectionResponse {
    debug!("toggle_select_all command");
    session.with_session_mut(|s| {
        let visible: Vec<String> = s
            .inventory_view()
            .iter()
            .map(|p| p.id().to_string())
            .collect();
        s.selection_mut()
            .toggle_all(visible.iter().map(String::as_str));
        selection_response(s.selection().ids().iter())
    })
}

/// Bulk price change over the selected products.
///
/// ## Arguments
/// * `input` - What the user typed in the percentage prompt, `None` when the
///   prompt was cancelled
///
/// ## Errors
/// - `INVALID_PERCENTAGE`: not a number, below -100%, above 1000%, or a
///   resulting price over the catalog limit; no price changes
/// - `VALIDATION_ERROR`: nothing selected
pub fn bulk_update_prices(
    session: &SessionState,
    input: Option<&str>,
) -> Result<BulkUpdateResponse, ApiError> {
    debug!(input = ?input, "bulk_update_prices command");

    let Some(input) = input else {
        debug!("bulk price prompt cancelled");
        return Ok(BulkUpdateResponse {
            updated: 0,
            percent: None,
        });
    };

    let percent: Percent = input.parse().map_err(|err| {
        warn!(input, "rejected bulk price percentage");
        ApiError::from(err)
    })?;

    session.with_session_mut(|s| {
        if s.selection().is_empty() {
            return Err(ApiError::validation("No products selected"));
        }

        let updated = s.bulk_adjust_selected(percent)?;
        info!(%percent, updated, "prices updated");
        Ok(BulkUpdateResponse {
            updated,
            percent: Some(percent),
        })
    })
}

/// Empty product form, pre-filled with the configured low-stock threshold.
pub fn new_product_form(config: &ConfigState) -> ProductDraft {
    ProductDraft::new("", "", 0).stock_critico(config.default_stock_critico as i64)
}

fn selection_response<'a>(ids: impl Iterator<Item = &'a String>) -> SelectionResponse {
    let mut selected_ids: Vec<String> = ids.cloned().collect();
    selected_ids.sort();
    SelectionResponse {
        count: selected_ids.len(),
        selected_ids,
    }
}
