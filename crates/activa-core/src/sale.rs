//! # Sale Types
//!
//! Cart lines, the cart-level price adjustment, and the immutable `Sale`
//! record produced at checkout.
//!
//! ## Snapshot Pattern
//! ```text
//! Product (catalog, mutable)          CartLine (frozen at add time)
//! ┌──────────────────────┐            ┌──────────────────────────────┐
//! │ id       "1"         │  add_item  │ product_id      "1"          │
//! │ name     "Remera"    │ ─────────► │ name            "Remera"     │
//! │ price    25000       │            │ unit_price      25000        │
//! │ cost     12000       │            │ unit_cost       12000        │
//! └──────────────────────┘            │ size "M", quantity, subtotal │
//!            │                        └──────────────────────────────┘
//!   bulk +10% later                         unaffected
//!            ▼
//!      price 27500
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::money::{Money, Percent};
use crate::types::Product;
use crate::validation::{same_size_label, validate_percent_bps, validate_price};

// =============================================================================
// Adjustment
// =============================================================================

/// Whether the cart-level adjustment lowers or raises the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AdjustmentKind {
    #[default]
    #[serde(rename = "ninguno")]
    None,
    #[serde(rename = "descuento")]
    Discount,
    #[serde(rename = "aumento")]
    Surcharge,
}

/// How the adjustment magnitude is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentMethod {
    /// Magnitude is a percentage of the subtotal, in basis points.
    #[default]
    Percentage,
    /// Magnitude is an amount in whole currency units.
    Fixed,
}

/// The single discount or surcharge applied to a cart subtotal.
///
/// Applies once to the subtotal, never per line. A `None` kind keeps its
/// method and magnitude around (the inputs stay filled in the UI) but
/// contributes nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Adjustment {
    #[serde(rename = "ajuste_tipo")]
    kind: AdjustmentKind,
    #[serde(rename = "ajuste_metodo")]
    method: AdjustmentMethod,
    /// Basis points for `Percentage`, currency units for `Fixed`.
    #[serde(rename = "ajuste_valor")]
    magnitude: i64,
}

impl Adjustment {
    /// Builds an adjustment.
    ///
    /// ## Errors
    /// `Validation` when the magnitude is negative, a percentage above
    /// `MAX_PERCENT_BPS` or a fixed amount above `MAX_PRICE`.
    pub fn new(kind: AdjustmentKind, method: AdjustmentMethod, magnitude: i64) -> CoreResult<Self> {
        match method {
            AdjustmentMethod::Percentage => validate_percent_bps("ajuste_valor", magnitude)?,
            AdjustmentMethod::Fixed => validate_price("ajuste_valor", magnitude)?,
        }
        Ok(Adjustment {
            kind,
            method,
            magnitude,
        })
    }

    /// No adjustment, percentage method, zero magnitude.
    pub const fn none() -> Self {
        Adjustment {
            kind: AdjustmentKind::None,
            method: AdjustmentMethod::Percentage,
            magnitude: 0,
        }
    }

    pub fn percentage(kind: AdjustmentKind, percent: Percent) -> CoreResult<Self> {
        Adjustment::new(kind, AdjustmentMethod::Percentage, percent.bps())
    }

    pub fn fixed(kind: AdjustmentKind, amount: Money) -> CoreResult<Self> {
        Adjustment::new(kind, AdjustmentMethod::Fixed, amount.units())
    }

    pub fn kind(&self) -> AdjustmentKind {
        self.kind
    }

    pub fn method(&self) -> AdjustmentMethod {
        self.method
    }

    pub fn magnitude(&self) -> i64 {
        self.magnitude
    }

    /// True when this adjustment changes the total.
    pub fn is_active(&self) -> bool {
        self.kind != AdjustmentKind::None && self.magnitude != 0
    }

    /// The amount taken off (discount) or added (surcharge), always >= 0.
    ///
    /// - kind `None` or magnitude 0 → 0
    /// - percentage → `subtotal × magnitude / 100`, rounded half up
    /// - fixed → `magnitude`
    pub fn amount_on(&self, subtotal: Money) -> Money {
        if !self.is_active() {
            return Money::zero();
        }
        match self.method {
            AdjustmentMethod::Percentage => subtotal.percent_of(Percent::from_bps(self.magnitude)),
            AdjustmentMethod::Fixed => Money::from_units(self.magnitude),
        }
    }

    /// Applies the adjustment to a subtotal.
    ///
    /// Not clamped: a discount larger than the subtotal yields a negative
    /// total.
    pub fn apply(&self, subtotal: Money) -> Money {
        let amount = self.amount_on(subtotal);
        match self.kind {
            AdjustmentKind::Discount => subtotal - amount,
            AdjustmentKind::Surcharge => subtotal + amount,
            AdjustmentKind::None => subtotal,
        }
    }

    pub(crate) fn with_kind(self, kind: AdjustmentKind) -> Self {
        Adjustment { kind, ..self }
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One (product, size) entry in a sale in progress.
///
/// ## Invariants
/// - `quantity >= 1`
/// - `subtotal == quantity × unit_price`
///
/// Fields are private; only the cart mutates a line, and every mutation
/// recomputes the subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct CartLine {
    #[serde(rename = "producto_id")]
    product_id: String,
    #[serde(rename = "nombre")]
    name: String,
    #[serde(rename = "talle")]
    size: String,
    #[serde(rename = "cantidad")]
    quantity: u32,
    #[serde(rename = "precio_unitario")]
    unit_price: Money,
    #[serde(rename = "costo_unitario")]
    unit_cost: Money,
    subtotal: Money,
}

impl CartLine {
    /// A fresh line with quantity 1, freezing the product's current price.
    pub(crate) fn from_product(product: &Product, size: &str) -> Self {
        CartLine {
            product_id: product.id().to_string(),
            name: product.name().to_string(),
            size: size.to_string(),
            quantity: 1,
            unit_price: product.price(),
            unit_cost: product.cost(),
            subtotal: product.price(),
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price captured when the line was created.
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn unit_cost(&self) -> Money {
        self.unit_cost
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    /// Cost of the goods on this line (unit cost × quantity).
    pub fn cost_total(&self) -> Money {
        self.unit_cost * self.quantity
    }

    pub(crate) fn matches(&self, product_id: &str, size: &str) -> bool {
        self.product_id == product_id && same_size_label(&self.size, size)
    }

    /// Sets the quantity (floored at 1) and recomputes the subtotal.
    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
        self.subtotal = self.unit_price * self.quantity;
    }
}

// =============================================================================
// Sale
// =============================================================================

/// An immutable record of a completed checkout.
///
/// Created only by [`crate::cart::Cart::snapshot_sale`]; there are no setters.
/// Handed by value to the receipt generator and to sales history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Sale {
    id: String,
    receipt_number: String,
    #[serde(rename = "fecha")]
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
    #[serde(rename = "items")]
    lines: Vec<CartLine>,
    #[serde(rename = "total_bruto")]
    subtotal: Money,
    #[serde(flatten)]
    adjustment: Adjustment,
    #[serde(rename = "ajuste_monto")]
    adjustment_amount: Money,
    #[serde(rename = "total_final")]
    total_final: Money,
}

impl Sale {
    pub(crate) fn new(
        created_at: DateTime<Utc>,
        lines: Vec<CartLine>,
        subtotal: Money,
        adjustment: Adjustment,
    ) -> Self {
        let id = Uuid::new_v4();
        let receipt_number = receipt_number(&id, created_at);
        let adjustment_amount = adjustment.amount_on(subtotal);
        let total_final = adjustment.apply(subtotal);

        Sale {
            id: id.to_string(),
            receipt_number,
            created_at,
            lines,
            subtotal,
            adjustment,
            adjustment_amount,
            total_final,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable number printed on the ticket.
    pub fn receipt_number(&self) -> &str {
        &self.receipt_number
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Gross subtotal (sum of line subtotals).
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn adjustment(&self) -> Adjustment {
        self.adjustment
    }

    /// Amount the adjustment took off or added.
    pub fn adjustment_amount(&self) -> Money {
        self.adjustment_amount
    }

    pub fn total_final(&self) -> Money {
        self.total_final
    }

    /// Units sold across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(CartLine::quantity).sum()
    }

    /// Cost of goods sold across all lines.
    pub fn cost_total(&self) -> Money {
        self.lines.iter().map(CartLine::cost_total).sum()
    }
}

/// `V` + yymmdd-HHMMSS + first four hex digits of the sale id.
fn receipt_number(id: &Uuid, at: DateTime<Utc>) -> String {
    let hex = id.simple().to_string();
    format!(
        "V{}-{}",
        at.format("%y%m%d-%H%M%S"),
        hex[..4].to_uppercase()
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductDraft;
    use chrono::TimeZone;

    fn product(price: i64) -> Product {
        Product::try_from(ProductDraft::new("1", "Remera Pro Run", price).cost(12000)).unwrap()
    }

    #[test]
    fn test_adjustment_none_is_identity() {
        let subtotal = Money::from_units(100_000);
        assert_eq!(Adjustment::none().apply(subtotal), subtotal);

        // A leftover magnitude on a `None` kind is ignored.
        let idle = Adjustment::new(AdjustmentKind::None, AdjustmentMethod::Fixed, 5000).unwrap();
        assert_eq!(idle.amount_on(subtotal), Money::zero());
        assert_eq!(idle.apply(subtotal), subtotal);
    }

    #[test]
    fn test_percentage_discount() {
        let adj = Adjustment::percentage(AdjustmentKind::Discount, Percent::from_whole(10)).unwrap();
        let subtotal = Money::from_units(100_000);
        assert_eq!(adj.amount_on(subtotal).units(), 10_000);
        assert_eq!(adj.apply(subtotal).units(), 90_000);
    }

    #[test]
    fn test_fixed_surcharge() {
        let adj = Adjustment::fixed(AdjustmentKind::Surcharge, Money::from_units(5000)).unwrap();
        assert_eq!(adj.apply(Money::from_units(100_000)).units(), 105_000);
    }

    #[test]
    fn test_magnitude_bounds() {
        use crate::{MAX_PERCENT_BPS, MAX_PRICE};

        let fixed = |m| Adjustment::new(AdjustmentKind::Surcharge, AdjustmentMethod::Fixed, m);
        let pct = |m| Adjustment::new(AdjustmentKind::Surcharge, AdjustmentMethod::Percentage, m);

        assert!(fixed(MAX_PRICE).is_ok());
        assert!(fixed(MAX_PRICE + 1).is_err());
        assert!(fixed(i64::MAX).is_err());
        assert!(pct(MAX_PERCENT_BPS).is_ok());
        assert!(pct(MAX_PERCENT_BPS + 1).is_err());
        assert!(pct(-1).is_err());
    }

    #[test]
    fn test_oversized_discount_is_not_clamped() {
        let adj = Adjustment::fixed(AdjustmentKind::Discount, Money::from_units(150)).unwrap();
        assert_eq!(adj.apply(Money::from_units(100)).units(), -50);
    }

    #[test]
    fn test_negative_magnitude_rejected() {
        assert!(Adjustment::new(AdjustmentKind::Discount, AdjustmentMethod::Fixed, -1).is_err());
    }

    #[test]
    fn test_line_subtotal_follows_quantity() {
        let mut line = CartLine::from_product(&product(25000), "M");
        assert_eq!(line.quantity(), 1);
        assert_eq!(line.subtotal().units(), 25000);

        line.set_quantity(3);
        assert_eq!(line.subtotal().units(), 75000);
        assert_eq!(line.cost_total().units(), 36000);

        line.set_quantity(0);
        assert_eq!(line.quantity(), 1);
        assert_eq!(line.subtotal().units(), 25000);
    }

    #[test]
    fn test_sale_totals_and_receipt_number() {
        let at = Utc.with_ymd_and_hms(2023, 11, 15, 10, 30, 0).unwrap();
        let mut line = CartLine::from_product(&product(25000), "M");
        line.set_quantity(2);
        let adj = Adjustment::fixed(AdjustmentKind::Discount, Money::from_units(5000)).unwrap();

        let sale = Sale::new(at, vec![line], Money::from_units(50000), adj);

        assert_eq!(sale.total_final().units(), 45000);
        assert_eq!(sale.adjustment_amount().units(), 5000);
        assert_eq!(sale.item_count(), 2);
        assert_eq!(sale.cost_total().units(), 24000);
        assert!(sale.receipt_number().starts_with("V231115-103000-"));
        assert_eq!(sale.receipt_number().len(), "V231115-103000-".len() + 4);
    }

    #[test]
    fn test_sale_serializes_with_store_field_names() {
        let at = Utc.with_ymd_and_hms(2023, 11, 15, 14, 15, 0).unwrap();
        let line = CartLine::from_product(&product(85000), "42");
        let sale = Sale::new(at, vec![line], Money::from_units(85000), Adjustment::none());

        let value = serde_json::to_value(&sale).unwrap();
        assert_eq!(value["total_bruto"], 85000);
        assert_eq!(value["total_final"], 85000);
        assert_eq!(value["ajuste_tipo"], "ninguno");
        assert_eq!(value["ajuste_metodo"], "percentage");
        assert_eq!(value["items"][0]["talle"], "42");
        assert_eq!(value["items"][0]["precio_unitario"], 85000);
    }
}
