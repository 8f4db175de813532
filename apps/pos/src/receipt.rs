//! # Receipt Generation
//!
//! Turns a completed [`Sale`] into a printable ticket. The cart hands the
//! sale over and never looks at what comes back.
//!
//! ## Ticket Layout (80 mm roll, 42 columns)
//! ```text
//! ┌──────────────────────────────────────────┐
//! │               ACTIVA SPORTS              │
//! │     Indumentaria y Calzado Deportivo     │
//! │      Comprobante No oficial de Venta     │
//! │------------------------------------------│
//! │ID: #V231115-103000-3F2A  15/11/2023 10:30│
//! │Cant Detalle                      Subtotal│
//! │------------------------------------------│
//! │2    Remera Pro Run (M)            $50.000│
//! │------------------------------------------│
//! │Subtotal bruto:                    $50.000│
//! │Descuento:                         -$5.000│
//! │TOTAL:                             $45.000│
//! │                                          │
//! │          Gracias por su compra!          │
//! └──────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use activa_core::{AdjustmentKind, AdjustmentMethod, Money, Percent, Sale};
use chrono::Local;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::state::{format_currency, ConfigState};

/// Prefix of every ticket file name.
pub const RECEIPT_FILE_PREFIX: &str = "Ticket_ActivaSports_";

/// Errors from rendering or storing a ticket.
#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("Ticket width {width} is too narrow to print a sale")]
    TooNarrow { width: usize },

    #[error("Failed to write receipt to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A rendered ticket, ready to print or save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub file_name: String,
    pub content: String,
}

impl Receipt {
    /// Writes the ticket into `dir`, creating the directory if needed.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ReceiptError> {
        let path = dir.join(&self.file_name);
        let write_err = |source| ReceiptError::Write {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(dir).map_err(write_err)?;
        std::fs::write(&path, &self.content).map_err(write_err)?;

        info!(path = %path.display(), "receipt written");
        Ok(path)
    }
}

/// Receipt-generation collaborator.
pub trait ReceiptGenerator {
    fn generate(&self, sale: &Sale) -> Result<Receipt, ReceiptError>;
}

/// Plain-text renderer for thermal printers.
#[derive(Debug, Clone)]
pub struct ThermalReceipt {
    store_name: String,
    tagline: String,
    width: usize,
}

/// Narrowest width that still fits quantity, detail and amount columns.
const MIN_WIDTH: usize = 24;

impl ThermalReceipt {
    pub fn new(config: &ConfigState) -> Self {
        ThermalReceipt {
            store_name: config.store_name.clone(),
            tagline: config.store_tagline.clone(),
            width: config.receipt_width,
        }
    }

    /// File name for the ticket of `sale`.
    pub fn file_name(sale: &Sale) -> String {
        format!("{RECEIPT_FILE_PREFIX}{}.txt", sale.receipt_number())
    }

    /// Renders the ticket body.
    pub fn render(&self, sale: &Sale) -> Result<String, ReceiptError> {
        let w = self.width;
        if w < MIN_WIDTH {
            return Err(ReceiptError::TooNarrow { width: w });
        }
        let rule = "-".repeat(w);
        let mut lines = vec![center(&self.store_name, w)];

        if !self.tagline.is_empty() {
            lines.push(center(&self.tagline, w));
        }
        lines.push(center("Comprobante No oficial de Venta", w));
        lines.push(rule.clone());

        let date = sale
            .created_at()
            .with_timezone(&Local)
            .format("%d/%m/%Y %H:%M")
            .to_string();
        lines.push(columns(&format!("ID: #{}", sale.receipt_number()), &date, w));
        lines.push(columns("Cant Detalle", "Subtotal", w));
        lines.push(rule.clone());

        for line in sale.lines() {
            let left = format!(
                "{:<4} {} ({})",
                line.quantity(),
                line.name(),
                line.size()
            );
            lines.push(columns(&left, &format_currency(line.subtotal()), w));
        }
        lines.push(rule);

        lines.push(columns("Subtotal bruto:", &format_currency(sale.subtotal()), w));

        let adjustment = sale.adjustment();
        if adjustment.kind() != AdjustmentKind::None {
            let (label, sign) = match adjustment.kind() {
                AdjustmentKind::Discount => ("Descuento:", "-"),
                _ => ("Recargo:", "+"),
            };
            let value = match adjustment.method() {
                AdjustmentMethod::Percentage => {
                    Percent::from_bps(adjustment.magnitude()).to_string()
                }
                AdjustmentMethod::Fixed => {
                    format_currency(Money::from_units(adjustment.magnitude()))
                }
            };
            lines.push(columns(label, &format!("{sign}{value}"), w));
        }

        lines.push(columns("TOTAL:", &format_currency(sale.total_final()), w));
        lines.push(String::new());
        lines.push(center("Gracias por su compra!", w));

        let mut out = lines.join("\n");
        out.push('\n');
        Ok(out)
    }
}

impl ReceiptGenerator for ThermalReceipt {
    fn generate(&self, sale: &Sale) -> Result<Receipt, ReceiptError> {
        debug!(sale_id = %sale.id(), width = self.width, "rendering receipt");
        Ok(Receipt {
            file_name: Self::file_name(sale),
            content: self.render(sale)?,
        })
    }
}

/// Centers `text` in `width` columns, cutting it if it does not fit.
fn center(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let len = text.chars().count();
    let pad = (width - len) / 2;
    format!("{}{}", " ".repeat(pad), text).trim_end().to_string()
}

/// `left` flush left, `right` flush right, at least one space between.
///
/// The right column always prints in full; `left` is cut to make room.
fn columns(left: &str, right: &str, width: usize) -> String {
    let right_len = right.chars().count();
    let room = width.saturating_sub(right_len + 1);
    let left = truncate(left, room);
    let gap = width.saturating_sub(left.chars().count() + right_len).max(1);
    format!("{left}{}{right}", " ".repeat(gap))
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use activa_core::{Cart, Product, ProductDraft};

    fn sale(kind: AdjustmentKind, method: AdjustmentMethod, magnitude: i64) -> Sale {
        let remera =
            Product::try_from(ProductDraft::new("1", "Remera Pro Run", 25000).size("M", 10))
                .unwrap();
        let mut cart = Cart::new();
        cart.add_item(&remera, "M");
        cart.add_item(&remera, "M");
        cart.set_adjustment(kind, method, magnitude).unwrap();
        cart.complete_sale().unwrap()
    }

    #[test]
    fn test_columns_and_center() {
        assert_eq!(columns("TOTAL:", "$45.000", 20), "TOTAL:       $45.000");
        assert_eq!(columns("A very long product name", "$1", 10), "A very  $1");
        assert_eq!(center("HI", 6), "  HI");
    }

    #[test]
    fn test_render_fixed_discount() {
        let generator = ThermalReceipt::new(&ConfigState::default());
        let sale = sale(AdjustmentKind::Discount, AdjustmentMethod::Fixed, 5000);

        let text = generator.render(&sale).unwrap();

        assert!(text.starts_with(&center("ACTIVA SPORTS", 42)));
        assert!(text.contains(&format!("ID: #{}", sale.receipt_number())));
        assert!(text.contains("Remera Pro Run (M)"));
        assert!(text.contains(&columns("Subtotal bruto:", "$50.000", 42)));
        assert!(text.contains(&columns("Descuento:", "-$5.000", 42)));
        assert!(text.contains(&columns("TOTAL:", "$45.000", 42)));
        assert!(text.lines().all(|l| l.chars().count() <= 42));
    }

    #[test]
    fn test_render_percentage_surcharge() {
        let generator = ThermalReceipt::new(&ConfigState::default());
        let sale = sale(AdjustmentKind::Surcharge, AdjustmentMethod::Percentage, 1000);

        let text = generator.render(&sale).unwrap();
        assert!(text.contains(&columns("Recargo:", "+10%", 42)));
        assert!(text.contains(&columns("TOTAL:", "$55.000", 42)));
    }

    #[test]
    fn test_render_line_order() {
        let generator = ThermalReceipt::new(&ConfigState::default());
        let sale = sale(AdjustmentKind::Discount, AdjustmentMethod::Fixed, 5000);

        let text = generator.render(&sale).unwrap();
        assert!(text.ends_with("Gracias por su compra!\n"));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 14);
        assert_eq!(lines[1], center("Indumentaria y Calzado Deportivo", 42));
        assert_eq!(lines[2], center("Comprobante No oficial de Venta", 42));
        assert_eq!(lines[3], "-".repeat(42));
        assert!(lines[4].starts_with("ID: #"));
        assert_eq!(lines[5], columns("Cant Detalle", "Subtotal", 42));
        assert!(lines[7].starts_with("2    Remera Pro Run (M)"));
        assert_eq!(lines[9], columns("Subtotal bruto:", "$50.000", 42));
        assert_eq!(lines[10], columns("Descuento:", "-$5.000", 42));
        assert_eq!(lines[11], columns("TOTAL:", "$45.000", 42));
        assert_eq!(lines[12], "");
    }

    #[test]
    fn test_no_adjustment_line_without_kind() {
        let generator = ThermalReceipt::new(&ConfigState::default());
        let sale = sale(AdjustmentKind::None, AdjustmentMethod::Percentage, 0);

        let text = generator.render(&sale).unwrap();
        assert!(!text.contains("Descuento"));
        assert!(!text.contains("Recargo"));
    }

    #[test]
    fn test_generate_names_file_after_receipt_number() {
        let generator = ThermalReceipt::new(&ConfigState::default());
        let sale = sale(AdjustmentKind::None, AdjustmentMethod::Percentage, 0);

        let receipt = generator.generate(&sale).unwrap();
        assert_eq!(
            receipt.file_name,
            format!("Ticket_ActivaSports_{}.txt", sale.receipt_number())
        );
    }

    #[test]
    fn test_too_narrow_width_rejected() {
        let config = ConfigState {
            receipt_width: 10,
            ..ConfigState::default()
        };
        let sale = sale(AdjustmentKind::None, AdjustmentMethod::Percentage, 0);
        assert!(matches!(
            ThermalReceipt::new(&config).generate(&sale),
            Err(ReceiptError::TooNarrow { width: 10 })
        ));
    }

    #[test]
    fn test_write_to_directory() {
        let dir = std::env::temp_dir().join(format!("activa-receipt-{}", std::process::id()));
        let receipt = Receipt {
            file_name: "Ticket_ActivaSports_test.txt".to_string(),
            content: "TOTAL: $1\n".to_string(),
        };

        let path = receipt.write_to(&dir).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "TOTAL: $1\n");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
