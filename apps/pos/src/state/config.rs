//! # Configuration State
//!
//! Store settings loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`ACTIVA_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;

use activa_core::{Money, DEFAULT_STOCK_CRITICO};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Accepted ticket widths in characters (58 mm to 80 mm rolls).
pub const RECEIPT_WIDTH_RANGE: RangeInclusive<usize> = 24..=64;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (ticket header)
    pub store_name: String,

    /// Line printed under the store name
    pub store_tagline: String,

    /// Characters per ticket line
    pub receipt_width: usize,

    /// Low-stock threshold pre-filled in the product form
    pub default_stock_critico: u32,

    /// Where tickets are written. `None` means the platform data directory.
    pub receipt_dir: Option<PathBuf>,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            store_name: "ACTIVA SPORTS".to_string(),
            store_tagline: "Indumentaria y Calzado Deportivo".to_string(),
            receipt_width: 42,
            default_stock_critico: DEFAULT_STOCK_CRITICO,
            receipt_dir: None,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `ACTIVA_STORE_NAME`: Override store name
    /// - `ACTIVA_STORE_TAGLINE`: Override the header tagline
    /// - `ACTIVA_RECEIPT_WIDTH`: Ticket width, 24..=64
    /// - `ACTIVA_DEFAULT_STOCK_CRITICO`: Threshold for new products
    /// - `ACTIVA_RECEIPT_DIR`: Directory for ticket files
    ///
    /// Values that do not parse are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConfigState::from_env`] over an arbitrary lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(name) = lookup("ACTIVA_STORE_NAME").filter(|v| !v.trim().is_empty()) {
            config.store_name = name.trim().to_string();
        }

        if let Some(tagline) = lookup("ACTIVA_STORE_TAGLINE") {
            config.store_tagline = tagline.trim().to_string();
        }

        if let Some(width) = parse_var::<usize>(&lookup, "ACTIVA_RECEIPT_WIDTH") {
            if RECEIPT_WIDTH_RANGE.contains(&width) {
                config.receipt_width = width;
            } else {
                warn!(width, "ACTIVA_RECEIPT_WIDTH out of range, keeping default");
            }
        }

        if let Some(threshold) = parse_var::<u32>(&lookup, "ACTIVA_DEFAULT_STOCK_CRITICO") {
            config.default_stock_critico = threshold;
        }

        if let Some(dir) = lookup("ACTIVA_RECEIPT_DIR").filter(|v| !v.trim().is_empty()) {
            config.receipt_dir = Some(PathBuf::from(dir));
        }

        config
    }

    /// Formats an amount the way the shop prints prices: `$85.000`.
    ///
    /// ## Example
    /// ```rust
    /// use activa_core::Money;
    /// use activa_pos::state::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_units(1250000)), "$1.250.000");
    /// assert_eq!(config.format_currency(Money::from_units(-5000)), "-$5.000");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format_currency(amount)
    }
}

/// es-AR grouping: `.` every three digits, no decimals.
pub fn format_currency(amount: Money) -> String {
    let digits = amount.units().unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{sign}${grouped}")
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable configuration value");
            None
        }
    }
}
