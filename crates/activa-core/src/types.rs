//! # Catalog Types
//!
//! Products, categories and per-size stock as read from the table store.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Types                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │──►│  StockBySize    │   │    Category     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  size ("M")     │   │  name           │       │
//! │  │  price, cost    │   │  quantity       │   └─────────────────┘       │
//! │  │  stock_critico  │   └─────────────────┘            ▲                │
//! │  │  category ──────┼────────────────────────────────────┘              │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Draft / Entity Split
//! Each entity has a `*Draft` twin with public fields: the raw record as the
//! form or the table store provides it. Entities are only built through
//! `TryFrom<Draft>`, which runs the invariants in [`crate::validation`].
//! Serde goes through the draft as well, so a record deserialized from the
//! store is validated exactly like one typed into a form.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    same_size_label, validate_category_name, validate_description, validate_price,
    validate_product_name, validate_size_label, validate_stock_count, validate_unique_size,
};
use crate::DEFAULT_STOCK_CRITICO;

// =============================================================================
// Category
// =============================================================================

/// Raw category record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryDraft {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// A product category ("Ropa", "Calzado", "Accesorios").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CategoryDraft", into = "CategoryDraft")]
pub struct Category {
    id: String,
    name: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: &str) -> Result<Self, ValidationError> {
        Category::try_from(CategoryDraft {
            id: id.into(),
            name: name.to_string(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl TryFrom<CategoryDraft> for Category {
    type Error = ValidationError;

    fn try_from(draft: CategoryDraft) -> Result<Self, Self::Error> {
        Ok(Category {
            id: draft.id,
            name: validate_category_name(&draft.name)?,
        })
    }
}

impl From<Category> for CategoryDraft {
    fn from(category: Category) -> Self {
        CategoryDraft {
            id: category.id,
            name: category.name,
        }
    }
}

// =============================================================================
// Stock By Size
// =============================================================================

/// Raw per-size stock row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockDraft {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "talle")]
    pub size: String,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
}

/// Units on hand for one size of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StockDraft", into = "StockDraft")]
pub struct StockBySize {
    id: String,
    size: String,
    quantity: u32,
}

impl StockBySize {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

impl TryFrom<StockDraft> for StockBySize {
    type Error = ValidationError;

    fn try_from(draft: StockDraft) -> Result<Self, Self::Error> {
        Ok(StockBySize {
            id: draft.id,
            size: validate_size_label(&draft.size)?,
            quantity: validate_stock_count("cantidad", draft.quantity)?,
        })
    }
}

impl From<StockBySize> for StockDraft {
    fn from(stock: StockBySize) -> Self {
        StockDraft {
            id: stock.id,
            size: stock.size,
            quantity: stock.quantity as i64,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// Raw product record, as the product form or the table store supplies it.
///
/// ## Builder
/// ```rust
/// use activa_core::{Product, ProductDraft};
///
/// let product = Product::try_from(
///     ProductDraft::new("1", "Remera Pro Run", 25000)
///         .cost(12000)
///         .category("cat1", "Ropa")
///         .stock_critico(5)
///         .size("S", 10)
///         .size("L", 3),
/// )
/// .unwrap();
///
/// assert_eq!(product.sizes().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDraft {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "precio")]
    pub price: i64,
    #[serde(rename = "costo", default)]
    pub cost: i64,
    #[serde(rename = "categoria_id", default)]
    pub category_id: String,
    pub stock_critico: i64,
    #[serde(rename = "talles", default)]
    pub sizes: Vec<StockDraft>,
    #[serde(rename = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryDraft>,
}

impl ProductDraft {
    /// Starts a draft with the form defaults (no sizes, threshold 3).
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: i64) -> Self {
        ProductDraft {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            cost: 0,
            category_id: String::new(),
            stock_critico: DEFAULT_STOCK_CRITICO as i64,
            sizes: Vec::new(),
            category: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn cost(mut self, cost: i64) -> Self {
        self.cost = cost;
        self
    }

    pub fn category(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        self.category_id = id.clone();
        self.category = Some(CategoryDraft {
            id,
            name: name.into(),
        });
        self
    }

    pub fn stock_critico(mut self, threshold: i64) -> Self {
        self.stock_critico = threshold;
        self
    }

    /// Appends a size row. The row id is derived from the product id.
    pub fn size(mut self, label: impl Into<String>, quantity: i64) -> Self {
        let label = label.into();
        self.sizes.push(StockDraft {
            id: format!("{}-{}", self.id, label),
            size: label,
            quantity,
        });
        self
    }
}

/// A product for sale, with its per-size stock.
///
/// ## Invariants
/// - `price >= 0`, `cost >= 0`
/// - `stock_critico >= 0` (by type)
/// - size labels are non-empty and unique within the product
///   (case-insensitive); duplicates are rejected, never merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProductDraft", into = "ProductDraft")]
pub struct Product {
    id: String,
    name: String,
    description: String,
    price: Money,
    cost: Money,
    category_id: Option<String>,
    category: Option<Category>,
    stock_critico: u32,
    sizes: Vec<StockBySize>,
}

impl Product {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Current unit sale price.
    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }

    /// Unit cost (what the shop paid).
    #[inline]
    pub fn cost(&self) -> Money {
        self.cost
    }

    /// Price minus cost. Negative when the product sells at a loss.
    #[inline]
    pub fn margin(&self) -> Money {
        self.price - self.cost
    }

    pub fn category_id(&self) -> Option<&str> {
        self.category_id.as_deref()
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    /// Joined category name, if the store returned it.
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(Category::name)
    }

    /// Low-stock threshold.
    #[inline]
    pub fn stock_critico(&self) -> u32 {
        self.stock_critico
    }

    pub fn sizes(&self) -> &[StockBySize] {
        &self.sizes
    }

    /// Looks a size row up by label (trimmed, case-insensitive).
    pub fn size(&self, label: &str) -> Option<&StockBySize> {
        self.sizes.iter().find(|s| same_size_label(&s.size, label))
    }

    /// Sizes with at least one unit on hand, in catalog order.
    pub fn available_sizes(&self) -> impl Iterator<Item = &StockBySize> {
        self.sizes.iter().filter(|s| s.quantity > 0)
    }

    pub(crate) fn set_price(&mut self, price: Money) {
        self.price = price;
    }
}

impl TryFrom<ProductDraft> for Product {
    type Error = ValidationError;

    fn try_from(draft: ProductDraft) -> Result<Self, Self::Error> {
        let id = draft.id.trim().to_string();
        if id.is_empty() {
            return Err(ValidationError::Required {
                field: "id".to_string(),
            });
        }

        let name = validate_product_name(&draft.name)?;
        let description = validate_description(&draft.description)?;
        validate_price("precio", draft.price)?;
        validate_price("costo", draft.cost)?;
        let stock_critico = validate_stock_count("stock_critico", draft.stock_critico)?;

        let mut sizes: Vec<StockBySize> = Vec::with_capacity(draft.sizes.len());
        for row in draft.sizes {
            let stock = StockBySize::try_from(row)?;
            validate_unique_size(&stock.size, sizes.iter().map(|s| s.size.as_str()))?;
            sizes.push(stock);
        }

        let category = draft.category.map(Category::try_from).transpose()?;
        let category_id = match (draft.category_id.trim(), &category) {
            ("", Some(category)) => Some(category.id.clone()),
            ("", None) => None,
            (id, Some(category)) if id != category.id => {
                return Err(ValidationError::InvalidFormat {
                    field: "categoria_id".to_string(),
                    reason: format!("does not match joined category '{}'", category.id),
                });
            }
            (id, _) => Some(id.to_string()),
        };

        Ok(Product {
            id,
            name,
            description,
            price: Money::from_units(draft.price),
            cost: Money::from_units(draft.cost),
            category_id,
            category,
            stock_critico,
            sizes,
        })
    }
}

impl From<Product> for ProductDraft {
    fn from(product: Product) -> Self {
        ProductDraft {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price.units(),
            cost: product.cost.units(),
            category_id: product.category_id.unwrap_or_default(),
            stock_critico: product.stock_critico as i64,
            sizes: product.sizes.into_iter().map(StockDraft::from).collect(),
            category: product.category.map(CategoryDraft::from),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
