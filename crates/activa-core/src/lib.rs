//! # activa-core: Pricing and Stock Logic for Activa POS
//!
//! This crate holds the business rules of the Activa Sports point of sale as
//! pure functions over in-memory data. It never talks to the table store,
//! renders a ticket or writes a log line.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Activa POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (screens)                           │   │
//! │  │    Ventas ──► Inventario ──► Historial ──► Dashboard            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 activa-pos (Session + commands)                 │   │
//! │  │    add_to_cart, set_adjustment, bulk_update_prices, etc.        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ activa-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ inventory │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │  stock    │  │   │
//! │  │   │  Category │  │  Percent  │  │   Sale    │  │  bulk %   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORE CALLS • NO LOGGING • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog records (Product, StockBySize, Category)
//! - [`money`] - Whole-unit Money and basis-point Percent
//! - [`sale`] - CartLine, Adjustment and the immutable Sale
//! - [`cart`] - The Cart Engine
//! - [`inventory`] - Stock totals, low-stock flags, bulk price change
//! - [`catalog`] - Filtering, sorting, selection
//! - [`validation`] - Field rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use activa_core::{AdjustmentKind, AdjustmentMethod, Cart, Product, ProductDraft};
//!
//! let remera = Product::try_from(
//!     ProductDraft::new("1", "Remera Pro Run", 25000).size("M", 10),
//! )
//! .unwrap();
//!
//! let mut cart = Cart::new();
//! for _ in 0..4 {
//!     cart.add_item(&remera, "M");
//! }
//! cart.set_adjustment(AdjustmentKind::Discount, AdjustmentMethod::Percentage, 1000)
//!     .unwrap();
//!
//! assert_eq!(cart.subtotal().units(), 100_000);
//! assert_eq!(cart.final_total().units(), 90_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod inventory;
pub mod money;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use catalog::{
    filter_products, sort_products, SearchScope, Selection, SortDirection, SortKey, SortState,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::{
    bulk_adjust_price, critical_products, remaining_stock, sellable_sizes, StockReport,
};
pub use money::{Money, Percent};
pub use sale::{Adjustment, AdjustmentKind, AdjustmentMethod, CartLine, Sale};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Low-stock threshold a new product starts with.
///
/// The host can override it per deployment; this is the value the product
/// form is pre-filled with.
pub const DEFAULT_STOCK_CRITICO: u32 = 3;

/// Most units of one (product, size) line in a cart.
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Highest price, cost or fixed adjustment accepted, in whole currency units.
pub const MAX_PRICE: i64 = 1_000_000_000;

/// Largest percentage adjustment or bulk price change, in basis points
/// (100 000 = 1000%).
pub const MAX_PERCENT_BPS: i64 = 100_000;
