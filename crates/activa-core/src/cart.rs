//! # Cart Engine
//!
//! The sale in progress: lines, quantity edits, the cart-level adjustment,
//! and the derived subtotal and total.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UI Action                 Cart Method               Effect             │
//! │  ─────────                 ───────────               ──────             │
//! │  Click size "M"  ────────► add_item(p, "M") ───────► qty+1 or new line │
//! │  Click + / -     ────────► set_quantity(i, ±1) ────► max(1, qty+delta) │
//! │  Click trash     ────────► remove_item(i) ─────────► line removed      │
//! │  Discount button ────────► toggle_adjustment(k) ───► kind on/off       │
//! │  Type value      ────────► edit_adjustment(m, v) ──► method/magnitude  │
//! │  HACER VENTA     ────────► complete_sale() ────────► Sale + reset      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method runs to completion and leaves the cart consistent; the totals
//! are recomputed from the lines on each call instead of being cached.

use chrono::Utc;
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::sale::{Adjustment, AdjustmentKind, AdjustmentMethod, CartLine, Sale};
use crate::types::{Product, StockBySize};
use crate::MAX_ITEM_QUANTITY;

/// The sale in progress for one checkout session.
///
/// ## Invariants
/// - Lines are unique by (product id, size): adding the same pair again
///   bumps the quantity
/// - Every line has `1 <= quantity <= MAX_ITEM_QUANTITY`
/// - Size labels are stored as the catalog spells them
/// - At most one adjustment is active
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    adjustment: Adjustment,
}

impl Cart {
    /// Creates a new empty cart with no adjustment.
    pub fn new() -> Self {
        Cart::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&CartLine> {
        self.lines.get(index)
    }

    pub fn adjustment(&self) -> Adjustment {
        self.adjustment
    }

    // =========================================================================
    // Line Mutations
    // =========================================================================

    /// Adds one unit of `product` in `size`.
    ///
    /// ## Behavior
    /// - Same product id and size already in the cart: quantity + 1, up to
    ///   `MAX_ITEM_QUANTITY`
    /// - Otherwise: new line, quantity 1, unit price = current product price
    ///
    /// `size` is matched like [`Product::size`] ("m" finds "M") and the line
    /// keeps the catalog's label.
    ///
    /// Stock is not checked here; the caller only offers sizes that still
    /// have units left (see [`crate::inventory::sellable_sizes`]).
    ///
    /// ## Returns
    /// The index of the affected line.
    pub fn add_item(&mut self, product: &Product, size: &str) -> usize {
        let label = product
            .size(size)
            .map_or_else(|| size.trim(), StockBySize::size);

        if let Some(index) = self
            .lines
            .iter()
            .position(|line| line.matches(product.id(), label))
        {
            let line = &mut self.lines[index];
            line.set_quantity((line.quantity() + 1).min(MAX_ITEM_QUANTITY));
            return index;
        }

        self.lines.push(CartLine::from_product(product, label));
        self.lines.len() - 1
    }

    /// Removes the line at `index`.
    ///
    /// Returns the removed line, or `None` (cart unchanged) when the index is
    /// out of range.
    pub fn remove_item(&mut self, index: usize) -> Option<CartLine> {
        if index < self.lines.len() {
            Some(self.lines.remove(index))
        } else {
            None
        }
    }

    /// Changes the quantity of the line at `index` by `delta`.
    ///
    /// The new quantity is `current + delta` clamped to
    /// `1..=MAX_ITEM_QUANTITY`; use
    /// [`Cart::remove_item`] to drop a line. Returns `None` (cart unchanged)
    /// when the index is out of range.
    pub fn set_quantity(&mut self, index: usize, delta: i64) -> Option<&CartLine> {
        let line = self.lines.get_mut(index)?;
        let wanted = (line.quantity() as i64).saturating_add(delta);
        let quantity = wanted.clamp(1, MAX_ITEM_QUANTITY as i64) as u32;
        line.set_quantity(quantity);
        Some(line)
    }

    /// Removes every line and clears the adjustment.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.adjustment = Adjustment::none();
    }

    /// Removes every line, keeping the adjustment.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    // =========================================================================
    // Adjustment
    // =========================================================================

    /// Replaces the active adjustment.
    ///
    /// Setting the kind that is already active clears the adjustment back to
    /// `None` instead (the discount/surcharge buttons act as toggles).
    pub fn set_adjustment(
        &mut self,
        kind: AdjustmentKind,
        method: AdjustmentMethod,
        magnitude: i64,
    ) -> CoreResult<Adjustment> {
        let next = Adjustment::new(kind, method, magnitude)?;
        self.adjustment = if kind != AdjustmentKind::None && kind == self.adjustment.kind() {
            Adjustment::none()
        } else {
            next
        };
        Ok(self.adjustment)
    }

    /// Flips the adjustment kind, keeping the typed method and magnitude.
    ///
    /// Same kind as the active one → `None`; any other kind → that kind.
    pub fn toggle_adjustment(&mut self, kind: AdjustmentKind) -> Adjustment {
        let next = if kind == self.adjustment.kind() {
            AdjustmentKind::None
        } else {
            kind
        };
        self.adjustment = self.adjustment.with_kind(next);
        self.adjustment
    }

    /// Edits the method and magnitude of the current adjustment without
    /// touching its kind.
    pub fn edit_adjustment(
        &mut self,
        method: AdjustmentMethod,
        magnitude: i64,
    ) -> CoreResult<Adjustment> {
        self.adjustment = Adjustment::new(self.adjustment.kind(), method, magnitude)?;
        Ok(self.adjustment)
    }

    // =========================================================================
    // Totals
    // =========================================================================

    /// Sum of all line subtotals.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Amount the active adjustment takes off or adds (always >= 0).
    pub fn adjustment_amount(&self) -> Money {
        self.adjustment.amount_on(self.subtotal())
    }

    /// Subtotal minus a discount, plus a surcharge, or the subtotal.
    ///
    /// Not clamped at zero; see [`Cart::is_over_adjusted`].
    pub fn final_total(&self) -> Money {
        self.adjustment.apply(self.subtotal())
    }

    /// True when a discount exceeds the subtotal and the total went negative.
    pub fn is_over_adjusted(&self) -> bool {
        self.final_total().is_negative()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Units across all lines (the "N items" badge).
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(CartLine::quantity).sum()
    }

    /// Units of (product, size) already in the cart.
    pub fn quantity_in_cart(&self, product_id: &str, size: &str) -> u32 {
        self.lines
            .iter()
            .filter(|line| line.matches(product_id, size))
            .map(CartLine::quantity)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Builds the `Sale` for the current cart without clearing it.
    ///
    /// Lets the caller hand the sale to its collaborators first and only
    /// [`Cart::reset`] once they accepted it.
    ///
    /// ## Errors
    /// `CoreError::EmptyCart` when there are no lines.
    pub fn snapshot_sale(&self) -> CoreResult<Sale> {
        if self.lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        Ok(Sale::new(
            Utc::now(),
            self.lines.clone(),
            self.subtotal(),
            self.adjustment,
        ))
    }

    /// Produces the `Sale` and resets the cart to empty, no adjustment.
    ///
    /// On an empty cart nothing changes and `EmptyCart` is returned.
    pub fn complete_sale(&mut self) -> CoreResult<Sale> {
        let sale = self.snapshot_sale()?;
        self.reset();
        Ok(sale)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
