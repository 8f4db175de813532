//! # Session State
//!
//! Everything one checkout station keeps between UI events: the catalog
//! snapshot read from the table store, the cart, the inventory selection and
//! the view settings of both screens.
//!
//! ## Session Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SessionState (Arc<Mutex<Session>>)                                     │
//! │  ┌───────────────────────────────────────────────────────────────────┐  │
//! │  │  Session                                                          │  │
//! │  │                                                                   │  │
//! │  │  products ─────── catalog snapshot (bulk % rewrites prices here)  │  │
//! │  │  categories                                                       │  │
//! │  │  cart ─────────── lines + adjustment (Ventas screen)              │  │
//! │  │  pos_query ────── POS search box                                  │  │
//! │  │  inventory_query  Inventario search box                           │  │
//! │  │  sort ─────────── Inventario column sort                          │  │
//! │  │  selection ────── Inventario checkboxes                           │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  NOTE: All access goes through the Mutex; commands hold the lock only   │
//! │        for the duration of one operation.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use activa_core::{
    bulk_adjust_price, filter_products, sort_products, Cart, Category, CoreResult, Percent,
    Product, SearchScope, Selection, SortState,
};

/// One station's working state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    products: Vec<Product>,
    categories: Vec<Category>,
    cart: Cart,
    selection: Selection,
    sort: SortState,
    inventory_query: String,
    pos_query: String,
}

impl Session {
    /// Starts a session over a catalog snapshot.
    pub fn new(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Session {
            products,
            categories,
            ..Session::default()
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id() == id)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Replaces the catalog after the store was re-read.
    ///
    /// Selected ids that no longer exist are dropped. The cart is kept: its
    /// lines carry their own price snapshot.
    pub fn replace_catalog(&mut self, products: Vec<Product>, categories: Vec<Category>) {
        let stale: Vec<String> = self
            .selection
            .ids()
            .iter()
            .filter(|id| !products.iter().any(|p| p.id() == id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            self.selection.toggle(&id);
        }

        self.products = products;
        self.categories = categories;
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn sort_mut(&mut self) -> &mut SortState {
        &mut self.sort
    }

    pub fn pos_query(&self) -> &str {
        &self.pos_query
    }

    pub fn set_pos_query(&mut self, query: String) {
        self.pos_query = query;
    }

    pub fn inventory_query(&self) -> &str {
        &self.inventory_query
    }

    pub fn set_inventory_query(&mut self, query: String) {
        self.inventory_query = query;
    }

    /// Products shown on the POS screen for the current search.
    pub fn pos_view(&self) -> Vec<&Product> {
        filter_products(&self.products, &self.pos_query, SearchScope::Name)
    }

    /// Rows of the inventory table: filtered by the search box, then sorted.
    pub fn inventory_view(&self) -> Vec<&Product> {
        let mut rows = filter_products(
            &self.products,
            &self.inventory_query,
            SearchScope::NameOrCategory,
        );
        sort_products(&mut rows, self.sort);
        rows
    }

    /// Applies a bulk price change to the selected products.
    ///
    /// The selection is cleared once prices were rewritten; on error nothing
    /// changes.
    pub fn bulk_adjust_selected(&mut self, percent: Percent) -> CoreResult<usize> {
        let updated = bulk_adjust_price(&mut self.products, self.selection.ids(), percent)?;
        if updated > 0 {
            self.selection.clear();
        }
        Ok(updated)
    }
}

/// Shared handle to the session.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<Session>>`: a UI shell may dispatch commands from more
/// than one thread, and every command mutates at least part of the session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    session: Arc<Mutex<Session>>,
}

impl SessionState {
    pub fn new(session: Session) -> Self {
        SessionState {
            session: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        // Commands never panic halfway through a mutation.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the session.
    ///
    /// ## Usage
    /// ```rust
    /// use activa_pos::state::{Session, SessionState};
    ///
    /// let state = SessionState::new(Session::default());
    /// let lines = state.with_session(|s| s.cart().line_count());
    /// assert_eq!(lines, 0);
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let session = self.lock();
        f(&session)
    }

    /// Executes a function with write access to the session.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut session = self.lock();
        f(&mut session)
    }
}
