//! # Catalog Views
//!
//! Text filtering, single-column sorting and the multi-select set used by
//! the inventory table. Each view is recomputed from the full product list
//! on every keystroke or click; the catalog is small enough that no index is
//! kept.
//!
//! ## Sort Toggle
//! ```text
//!   click "Precio"  → (Price, Asc)
//!   click "Precio"  → (Price, Desc)
//!   click "Precio"  → (Price, Asc)
//!   click "Nombre"  → (Name,  Asc)     new column always starts ascending
//! ```

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Product;

// =============================================================================
// Filtering
// =============================================================================

/// Which product fields a text search looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    /// POS screen: product name only.
    Name,
    /// Inventory screen: product name or category name.
    #[default]
    NameOrCategory,
}

/// True when `product` matches `query` (case-insensitive substring).
///
/// An empty or blank query matches everything.
pub fn matches_query(product: &Product, query: &str, scope: SearchScope) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    if product.name().to_lowercase().contains(&needle) {
        return true;
    }

    scope == SearchScope::NameOrCategory
        && product
            .category_name()
            .is_some_and(|name| name.to_lowercase().contains(&needle))
}

/// Products matching `query`, in catalog order.
pub fn filter_products<'a>(
    products: &'a [Product],
    query: &str,
    scope: SearchScope,
) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| matches_query(p, query, scope))
        .collect()
}

// =============================================================================
// Sorting
// =============================================================================

/// Sortable inventory columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    Category,
    Price,
    TotalStock,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// The active sort column, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SortState {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortState {
    /// Header click: same column flips the direction, a new column starts
    /// ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Asc;
        }
    }
}

fn compare(a: &Product, b: &Product, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        SortKey::Category => {
            let name = |p: &Product| p.category_name().unwrap_or_default().to_lowercase();
            name(a).cmp(&name(b))
        }
        SortKey::Price => a.price().cmp(&b.price()),
        SortKey::TotalStock => a.total_stock().cmp(&b.total_stock()),
    }
}

/// Sorts `rows` in place. No active key leaves the catalog order as is.
///
/// Ties keep no particular order.
pub fn sort_products(rows: &mut [&Product], state: SortState) {
    let Some(key) = state.key else {
        return;
    };

    rows.sort_unstable_by(|a, b| {
        let ordering = compare(a, b, key);
        match state.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

// =============================================================================
// Selection
// =============================================================================

/// Product ids checked in the inventory table, the input of the bulk price
/// change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Selection::default()
    }

    /// Checks `id` if unchecked, unchecks it otherwise. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Header checkbox.
    ///
    /// When every visible id is already selected the whole selection is
    /// cleared; otherwise it becomes exactly the visible ids.
    pub fn toggle_all<'a>(&mut self, visible: impl IntoIterator<Item = &'a str>) {
        let visible: HashSet<String> = visible.into_iter().map(str::to_string).collect();
        if !visible.is_empty() && visible.iter().all(|id| self.ids.contains(id)) {
            self.ids.clear();
        } else {
            self.ids = visible;
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.ids
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
