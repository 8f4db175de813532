//! # Inventory Aggregator
//!
//! Stock totals, low-stock detection and the bulk price change over a
//! selected set of products.
//!
//! ## Stock-Critical Rule
//! ```text
//!   Product "Remera Pro Run"  (stock_critico = 5)
//!   ┌────────┬──────────┬────────────────────────┐
//!   │ talle  │ cantidad │ size critical (<= 5)   │
//!   ├────────┼──────────┼────────────────────────┤
//!   │ S      │ 10       │ no                     │
//!   │ L      │ 3        │ YES                    │
//!   └────────┴──────────┴────────────────────────┘
//!   total_stock = 13         product critical: 13 <= 5 → no
//! ```
//!
//! A product with no size rows has a total of 0 and is therefore always
//! critical.

use std::collections::HashSet;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Percent};
use crate::types::{Product, StockBySize};
use crate::{MAX_PERCENT_BPS, MAX_PRICE};

/// Lowest accepted bulk change. Anything below would make prices negative.
const MIN_BULK_CHANGE: Percent = Percent::from_whole(-100);

/// Highest accepted bulk change.
const MAX_BULK_CHANGE: Percent = Percent::from_bps(MAX_PERCENT_BPS);

// =============================================================================
// Stock Aggregation
// =============================================================================

impl Product {
    /// Sum of the quantities across all size rows.
    pub fn total_stock(&self) -> u64 {
        self.sizes().iter().map(|s| s.quantity() as u64).sum()
    }

    /// `total_stock() <= stock_critico`.
    pub fn is_critical(&self) -> bool {
        self.total_stock() <= self.stock_critico() as u64
    }

    /// Row-level flag: this size alone is at or below the threshold.
    ///
    /// Independent of [`Product::is_critical`]; a product can have critical
    /// sizes without being critical overall.
    pub fn is_size_critical(&self, size: &StockBySize) -> bool {
        size.quantity() <= self.stock_critico()
    }
}

/// Stock summary of one product, as shown in the inventory table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockReport<'a> {
    pub product: &'a Product,
    pub total: u64,
    pub threshold: u32,
    pub critical: bool,
    /// Labels of the sizes at or below the threshold, in catalog order.
    pub critical_sizes: Vec<&'a str>,
}

impl<'a> StockReport<'a> {
    pub fn of(product: &'a Product) -> Self {
        StockReport {
            product,
            total: product.total_stock(),
            threshold: product.stock_critico(),
            critical: product.is_critical(),
            critical_sizes: product
                .sizes()
                .iter()
                .filter(|s| product.is_size_critical(s))
                .map(StockBySize::size)
                .collect(),
        }
    }
}

/// Products whose total stock is at or below their threshold.
pub fn critical_products(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.is_critical()).collect()
}

// =============================================================================
// Remaining Stock (POS size buttons)
// =============================================================================

/// Units of `size` still sellable once what is already in `cart` is taken.
///
/// Unknown size → 0. Never negative, even if the cart somehow holds more
/// than the catalog says is on hand.
pub fn remaining_stock(product: &Product, size: &str, cart: &Cart) -> u32 {
    let Some(row) = product.size(size) else {
        return 0;
    };
    row.quantity()
        .saturating_sub(cart.quantity_in_cart(product.id(), row.size()))
}

/// Sizes of `product` that can still be added to `cart`, in catalog order.
///
/// The POS screen only renders buttons for these, which is what keeps
/// [`Cart::add_item`] from overselling.
pub fn sellable_sizes<'a>(product: &'a Product, cart: &Cart) -> Vec<&'a StockBySize> {
    product
        .sizes()
        .iter()
        .filter(|s| remaining_stock(product, s.size(), cart) > 0)
        .collect()
}

// =============================================================================
// Bulk Price Change
// =============================================================================

/// Rescales the price of every selected product by `percent`.
///
/// `new price = round(price × (1 + percent / 100))`, half up to a whole
/// unit. Unselected products are untouched. Callers parse user input with
/// `Percent::from_str`, so a non-numeric value never reaches this point.
///
/// ## Returns
/// The number of products whose price was rewritten (0 for a 0% change).
///
/// ## Errors
/// `CoreError::InvalidPercentage`, with no price changed, when
/// - `percent` is below -100% or above `MAX_PERCENT_BPS`
/// - a selected price would end up above `MAX_PRICE`
///
/// ## Example
/// ```rust
/// use std::collections::HashSet;
/// use activa_core::{bulk_adjust_price, Percent, Product, ProductDraft};
///
/// let mut products = vec![
///     Product::try_from(ProductDraft::new("1", "Remera", 25000)).unwrap(),
///     Product::try_from(ProductDraft::new("2", "Zapatillas", 85000)).unwrap(),
/// ];
/// let selected: HashSet<String> = ["1".to_string(), "2".to_string()].into();
///
/// bulk_adjust_price(&mut products, &selected, Percent::from_whole(10)).unwrap();
/// assert_eq!(products[0].price().units(), 27500);
/// assert_eq!(products[1].price().units(), 93500);
/// ```
pub fn bulk_adjust_price(
    products: &mut [Product],
    selected: &HashSet<String>,
    percent: Percent,
) -> CoreResult<usize> {
    if percent < MIN_BULK_CHANGE {
        return Err(CoreError::invalid_percentage(
            percent.to_string(),
            "a change below -100% would make prices negative",
        ));
    }

    if percent > MAX_BULK_CHANGE {
        return Err(CoreError::invalid_percentage(
            percent.to_string(),
            format!("a change above {MAX_BULK_CHANGE} is not allowed"),
        ));
    }

    if percent.is_zero() {
        return Ok(0);
    }

    let new_prices = products
        .iter()
        .filter(|p| selected.contains(p.id()))
        .map(|p| {
            p.price()
                .apply_percent_change(percent)
                .filter(|price| price.units() <= MAX_PRICE)
                .ok_or_else(|| {
                    let limit = Money::from_units(MAX_PRICE);
                    CoreError::invalid_percentage(
                        percent.to_string(),
                        format!("the new price of {} would exceed {limit}", p.name()),
                    )
                })
        })
        .collect::<CoreResult<Vec<Money>>>()?;

    let targets = products.iter_mut().filter(|p| selected.contains(p.id()));
    for (product, price) in targets.zip(&new_prices) {
        product.set_price(*price);
    }

    Ok(new_prices.len())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::ProductDraft;

    fn remera() -> Product {
        Product::try_from(
            ProductDraft::new("1", "Remera Pro Run", 25000)
                .stock_critico(5)
                .size("S", 10)
                .size("L", 3),
        )
        .unwrap()
    }

    fn zapatillas() -> Product {
        Product::try_from(
            ProductDraft::new("2", "Zapatillas Ultra Boost", 85000)
                .stock_critico(2)
                .size("42", 5)
                .size("43", 1),
        )
        .unwrap()
    }

    fn selected(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_total_stock_and_critical() {
        let product = remera();
        assert_eq!(product.total_stock(), 13);
        assert!(!product.is_critical());

        let low = Product::try_from(
            ProductDraft::new("3", "Gorra", 5000).stock_critico(3).size("U", 3),
        )
        .unwrap();
        assert!(low.is_critical());
    }

    #[test]
    fn test_product_without_sizes_is_critical() {
        let product = Product::try_from(ProductDraft::new("9", "Medias", 3000)).unwrap();
        assert_eq!(product.stock_critico(), 3);
        assert_eq!(product.total_stock(), 0);
        assert!(product.is_critical());
    }

    #[test]
    fn test_size_critical_is_independent() {
        let product = remera();
        let report = StockReport::of(&product);

        assert!(!report.critical);
        assert_eq!(report.total, 13);
        assert_eq!(report.threshold, 5);
        assert_eq!(report.critical_sizes, vec!["L"]);
    }

    #[test]
    fn test_critical_products() {
        let products = vec![remera(), zapatillas()];
        assert!(critical_products(&products).is_empty());

        let zero = Product::try_from(ProductDraft::new("3", "Bolso", 40000).size("U", 0)).unwrap();
        let products = vec![remera(), zero];
        let critical: Vec<&str> = critical_products(&products).iter().map(|p| p.id()).collect();
        assert_eq!(critical, vec!["3"]);
    }

    #[test]
    fn test_remaining_stock_accounts_for_cart() {
        let product = zapatillas();
        let mut cart = Cart::new();

        assert_eq!(remaining_stock(&product, "43", &cart), 1);
        cart.add_item(&product, "43");
        assert_eq!(remaining_stock(&product, "43", &cart), 0);
        assert_eq!(remaining_stock(&product, "42", &cart), 5);
        assert_eq!(remaining_stock(&product, "44", &cart), 0);

        // Overfilled cart saturates at zero.
        cart.add_item(&product, "43");
        assert_eq!(remaining_stock(&product, "43", &cart), 0);

        let labels: Vec<&str> = sellable_sizes(&product, &cart)
            .into_iter()
            .map(StockBySize::size)
            .collect();
        assert_eq!(labels, vec!["42"]);
    }

    #[test]
    fn test_bulk_adjust_price_selected_only() {
        let mut products = vec![remera(), zapatillas()];

        let updated =
            bulk_adjust_price(&mut products, &selected(&["1", "2"]), Percent::from_whole(10))
                .unwrap();
        assert_eq!(updated, 2);
        assert_eq!(products[0].price().units(), 27500);
        assert_eq!(products[1].price().units(), 93500);

        let mut products = vec![remera(), zapatillas()];
        bulk_adjust_price(&mut products, &selected(&["1"]), Percent::from_whole(-10)).unwrap();
        assert_eq!(products[0].price().units(), 22500);
        assert_eq!(products[1].price().units(), 85000);
    }

    #[test]
    fn test_bulk_adjust_rounds_half_up() {
        let mut products =
            vec![Product::try_from(ProductDraft::new("1", "Llavero", 15)).unwrap()];
        // 15 × 1.10 = 16.5 → 17
        bulk_adjust_price(&mut products, &selected(&["1"]), Percent::from_whole(10)).unwrap();
        assert_eq!(products[0].price(), Money::from_units(17));
    }

    #[test]
    fn test_bulk_adjust_zero_is_noop() {
        let mut products = vec![remera()];
        let before = products.clone();
        assert_eq!(
            bulk_adjust_price(&mut products, &selected(&["1"]), Percent::zero()),
            Ok(0)
        );
        assert_eq!(products, before);
    }

    #[test]
    fn test_bulk_adjust_rejects_below_minus_hundred() {
        let mut products = vec![remera()];
        let before = products.clone();

        let err = bulk_adjust_price(&mut products, &selected(&["1"]), Percent::from_whole(-101))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidPercentage { .. }));
        assert_eq!(products, before);

        bulk_adjust_price(&mut products, &selected(&["1"]), Percent::from_whole(-100)).unwrap();
        assert_eq!(products[0].price(), Money::zero());
    }

    #[test]
    fn test_bulk_adjust_rejects_huge_percentages() {
        let mut products = vec![remera(), zapatillas()];
        let before = products.clone();
        let ids = selected(&["1", "2"]);

        let huge: Percent = "40000000000000000".parse().unwrap();
        let err = bulk_adjust_price(&mut products, &ids, huge).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPercentage { .. }));

        let just_over = Percent::from_bps(MAX_PERCENT_BPS + 1);
        assert!(bulk_adjust_price(&mut products, &ids, just_over).is_err());
        assert_eq!(products, before);

        // 1000% is the ceiling: 25000 → 275000.
        bulk_adjust_price(&mut products, &selected(&["1"]), MAX_BULK_CHANGE).unwrap();
        assert_eq!(products[0].price().units(), 275_000);
    }

    #[test]
    fn test_bulk_adjust_rejects_price_above_limit_atomically() {
        let pricey =
            Product::try_from(ProductDraft::new("3", "Cinta de correr", MAX_PRICE - 10)).unwrap();
        let mut products = vec![remera(), pricey];
        let before = products.clone();

        let err = bulk_adjust_price(&mut products, &selected(&["1", "3"]), Percent::from_whole(1))
            .unwrap_err();

        assert!(matches!(err, CoreError::InvalidPercentage { .. }));
        // Remera came first and would have fit, but nothing was written.
        assert_eq!(products, before);
        assert!(products.iter().all(|p| !p.price().is_negative()));
    }

    #[test]
    fn test_unparsable_input_never_reaches_prices() {
        let parsed = "diez".parse::<Percent>();
        assert!(matches!(parsed, Err(CoreError::InvalidPercentage { .. })));
    }
}
