//! # Sales History
//!
//! Storage collaborator for completed sales: the checkout records into it,
//! the Historial screen searches it, the dashboard aggregates it.
//!
//! ## Search
//! ```text
//!   query "remera"  ──►  sale id contains "remera"
//!                        OR any item name contains "remera"   (case-insensitive)
//!   date  2023-11-15 ─►  sale happened on that local calendar day
//!   both given       ─►  both must hold
//! ```

use activa_core::Sale;
use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::debug;

/// Errors from the history store.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Sale {id} is already recorded")]
    Duplicate { id: String },

    #[error("Failed to export sales history: {0}")]
    Export(#[from] serde_json::Error),
}

/// Persistence collaborator for completed sales.
pub trait SalesHistory {
    /// Stores a completed sale.
    fn record(&mut self, sale: Sale) -> Result<(), HistoryError>;

    /// All sales, newest first.
    fn list(&self) -> Vec<&Sale>;

    fn find(&self, id: &str) -> Option<&Sale> {
        self.list().into_iter().find(|s| s.id() == id)
    }

    /// Sales matching `query` and, when given, made on `date`.
    fn search(&self, query: &str, date: Option<NaiveDate>) -> Vec<&Sale> {
        self.list()
            .into_iter()
            .filter(|sale| matches_query(sale, query))
            .filter(|sale| date.map_or(true, |d| local_date(sale) == d))
            .collect()
    }

    /// JSON array of all sales, newest first, with the store field names.
    fn export_json(&self) -> Result<String, HistoryError> {
        Ok(serde_json::to_string_pretty(&self.list())?)
    }
}

/// Calendar day of the sale in the station's time zone.
pub fn local_date(sale: &Sale) -> NaiveDate {
    sale.created_at().with_timezone(&Local).date_naive()
}

fn matches_query(sale: &Sale, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    needle.is_empty()
        || sale.id().to_lowercase().contains(&needle)
        || sale.receipt_number().to_lowercase().contains(&needle)
        || sale
            .lines()
            .iter()
            .any(|line| line.name().to_lowercase().contains(&needle))
}

/// History kept in memory for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct InMemorySalesHistory {
    sales: Vec<Sale>,
}

impl InMemorySalesHistory {
    pub fn new() -> Self {
        InMemorySalesHistory::default()
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }
}

impl SalesHistory for InMemorySalesHistory {
    fn record(&mut self, sale: Sale) -> Result<(), HistoryError> {
        if self.sales.iter().any(|s| s.id() == sale.id()) {
            return Err(HistoryError::Duplicate {
                id: sale.id().to_string(),
            });
        }

        debug!(sale_id = %sale.id(), total = %sale.total_final(), "sale recorded");
        self.sales.push(sale);
        Ok(())
    }

    fn list(&self) -> Vec<&Sale> {
        let mut sales: Vec<&Sale> = self.sales.iter().collect();
        sales.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        sales
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use activa_core::{Cart, Product, ProductDraft};

    fn ring_up(name: &str, price: i64) -> Sale {
        let product =
            Product::try_from(ProductDraft::new(name, name, price).size("U", 5)).unwrap();
        let mut cart = Cart::new();
        cart.add_item(&product, "U");
        cart.complete_sale().unwrap()
    }

    fn history() -> InMemorySalesHistory {
        let mut history = InMemorySalesHistory::new();
        history.record(ring_up("Remera Pro Run", 25000)).unwrap();
        history
            .record(ring_up("Zapatillas Ultra Boost", 85000))
            .unwrap();
        history
    }

    #[test]
    fn test_record_rejects_duplicate() {
        let mut history = InMemorySalesHistory::new();
        let sale = ring_up("Gorra", 5000);

        history.record(sale.clone()).unwrap();
        assert!(matches!(
            history.record(sale),
            Err(HistoryError::Duplicate { .. })
        ));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_list_newest_first() {
        let history = history();
        let listed = history.list();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].created_at() >= listed[1].created_at());
    }

    #[test]
    fn test_search_by_item_name_and_id() {
        let history = history();

        let hits = history.search("ZAPATILLAS", None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].lines()[0].name(), "Zapatillas Ultra Boost");

        let id = hits[0].id().to_string();
        assert_eq!(history.search(&id[..8], None).len(), 1);
        assert_eq!(history.find(&id).map(Sale::id), Some(id.as_str()));

        assert_eq!(history.search("", None).len(), 2);
        assert!(history.search("medias", None).is_empty());
    }

    #[test]
    fn test_search_by_date() {
        let history = history();
        let day = local_date(history.list()[0]);

        assert_eq!(history.search("", Some(day)).len(), 2);
        assert!(history
            .search("", day.succ_opt())
            .is_empty());
    }

    #[test]
    fn test_export_json_uses_store_field_names() {
        let history = history();
        let json = history.export_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let sales = value.as_array().unwrap();
        assert_eq!(sales.len(), 2);
        assert!(sales[0]["total_final"].is_number());
        assert_eq!(sales[0]["ajuste_tipo"], "ninguno");
    }
}
