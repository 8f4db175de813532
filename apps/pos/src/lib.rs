//! # Activa POS Host Library
//!
//! Host layer of the Activa Sports point of sale. A UI shell links against
//! this crate, keeps one [`state::SessionState`] per till and invokes the
//! functions in [`commands`].
//!
//! ## Module Organization
//! ```text
//! activa_pos/
//! ├── lib.rs          ◄─── You are here (logging, receipt dir, walkthrough)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── session.rs  ◄─── Catalog snapshot, cart, selection, view state
//! │   └── config.rs   ◄─── Store name, ticket width, thresholds
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── cart.rs     ◄─── Cart lines and adjustment
//! │   ├── inventory.rs◄─── Search, Inventario table, bulk price change
//! │   ├── sale.rs     ◄─── Checkout, Historial
//! │   └── dashboard.rs◄─── Panel de Control
//! ├── receipt.rs      ◄─── ReceiptGenerator + thermal ticket
//! ├── history.rs      ◄─── SalesHistory + in-memory store
//! ├── dashboard.rs    ◄─── Period statistics
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────────────┐ ┌──────────────────┐ ┌──────────────────────┐ │
//! │  │    SessionState      │ │   ConfigState    │ │    Collaborators     │ │
//! │  │                      │ │                  │ │                      │ │
//! │  │  • Catalog snapshot  │ │  • Store name    │ │  • ReceiptGenerator  │ │
//! │  │  • Cart + adjustment │ │  • Ticket width  │ │  • SalesHistory      │ │
//! │  │  • Selection, sort   │ │  • Stock crítico │ │                      │ │
//! │  └──────────────────────┘ └──────────────────┘ └──────────────────────┘ │
//! │                                                                         │
//! │  Each command only receives the pieces it needs.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod receipt;
pub mod state;

use std::path::PathBuf;

use activa_core::{AdjustmentKind, AdjustmentMethod, Category, Product, ProductDraft};
use chrono::Local;
use directories::ProjectDirs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ApiError;
use history::InMemorySalesHistory;
use receipt::ThermalReceipt;
use state::{format_currency, ConfigState, Session, SessionState};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=activa=trace` - Show trace for activa crates only
/// - Default: `info,activa=debug`
///
/// Calling it more than once is harmless.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,activa=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Directory where ticket files are written.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.activa.pos/tickets`
/// - **Windows**: `%APPDATA%\activa\pos\data\tickets`
/// - **Linux**: `~/.local/share/pos/tickets`
///
/// `ACTIVA_RECEIPT_DIR` (through [`ConfigState`]) takes precedence.
pub fn receipt_dir(config: &ConfigState) -> Result<PathBuf, ApiError> {
    if let Some(dir) = &config.receipt_dir {
        return Ok(dir.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "activa", "pos")
        .ok_or_else(|| ApiError::internal("Could not determine app data directory"))?;

    Ok(proj_dirs.data_dir().join("tickets"))
}

/// Demo catalog used by the walkthrough.
pub fn demo_catalog(config: &ConfigState) -> Result<(Vec<Product>, Vec<Category>), ApiError> {
    let categories = vec![Category::new("cat1", "Ropa")?, Category::new("cat2", "Calzado")?];

    let products = vec![
        ProductDraft::new("1", "Remera Pro Run", 25000)
            .description("Remera deportiva de secado rápido")
            .cost(12000)
            .category("cat1", "Ropa")
            .stock_critico(5)
            .size("S", 10)
            .size("L", 3),
        ProductDraft::new("2", "Zapatillas Ultra Boost", 85000)
            .cost(45000)
            .category("cat2", "Calzado")
            .stock_critico(2)
            .size("42", 5)
            .size("43", 1),
        ProductDraft::new("3", "Medias Running x3", 6000)
            .cost(2500)
            .category("cat1", "Ropa")
            .stock_critico(config.default_stock_critico as i64)
            .size("U", 2),
    ]
    .into_iter()
    .map(Product::try_from)
    .collect::<Result<Vec<_>, _>>()?;

    Ok((products, categories))
}

/// Runs a checkout end to end against the demo catalog.
///
/// ## Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Logging ─────────► tracing-subscriber, RUST_LOG overrides           │
/// │  2. Config ──────────► ACTIVA_* environment variables                   │
/// │  3. Session ─────────► demo catalog, empty cart                         │
/// │  4. Ring up ─────────► 2 × Remera (S), 1 × Zapatillas (42), 10% off     │
/// │  5. Checkout ────────► ticket + history, cart reset                     │
/// │  6. Ticket file ─────► <receipt dir>/Ticket_ActivaSports_<n>.txt        │
/// │  7. Dashboard ───────► today's revenue, profit, critical stock          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    info!("Starting Activa POS");

    let config = ConfigState::from_env();
    let (products, categories) = demo_catalog(&config)?;
    let session = SessionState::new(Session::new(products, categories));
    let mut history = InMemorySalesHistory::new();
    let printer = ThermalReceipt::new(&config);

    commands::cart::add_to_cart(&session, "1", "S")?;
    commands::cart::add_to_cart(&session, "1", "S")?;
    commands::cart::add_to_cart(&session, "2", "42")?;
    let cart = commands::cart::set_adjustment(
        &session,
        AdjustmentKind::Discount,
        AdjustmentMethod::Percentage,
        1000,
    )?;
    info!(
        subtotal = %format_currency(cart.totals.subtotal),
        total = %format_currency(cart.totals.total_final),
        "cart ready"
    );

    let done = commands::sale::complete_sale(&session, &printer, &mut history)?;
    let path = done.receipt.write_to(&receipt_dir(&config)?)?;
    info!(path = %path.display(), receipt = %done.sale.receipt_number(), "ticket saved");

    let stats = commands::dashboard::get_dashboard(&session, &history, Local::now().date_naive());
    info!(
        revenue = %format_currency(stats.day.revenue),
        profit = %format_currency(stats.day.profit),
        sales = stats.day.sale_count,
        "today"
    );
    for item in &stats.critical_stock {
        info!(product = %item.name, total = item.total_stock, "critical stock");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_dir_override() {
        let config = ConfigState {
            receipt_dir: Some(PathBuf::from("/tmp/activa-tickets")),
            ..ConfigState::default()
        };
        assert_eq!(
            receipt_dir(&config).unwrap(),
            PathBuf::from("/tmp/activa-tickets")
        );
    }

    #[test]
    fn test_demo_catalog() {
        let config = ConfigState::default();
        let (products, categories) = demo_catalog(&config).unwrap();

        assert_eq!(products.len(), 3);
        assert_eq!(categories.len(), 2);
        assert_eq!(products[1].category_name(), Some("Calzado"));
        assert_eq!(products[2].stock_critico(), config.default_stock_critico);

        // Medias (2 units, threshold 3) start out critical.
        let critical = activa_core::critical_products(&products);
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].id(), "3");
    }
}
