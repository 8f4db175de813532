//! # Money Module
//!
//! Provides the `Money` and `Percent` types used by every price in the shop.
//!
//! ## Whole Currency Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Prices are whole pesos: 25000, 85000. There are no centavos anywhere   │
//! │  in the catalog, the cart or the receipts.                              │
//! │                                                                         │
//! │  Money(i64) holds that integer. Anything that multiplies by a           │
//! │  percentage rounds back to a whole unit, half up:                       │
//! │                                                                         │
//! │    25000 × 10%    = 2500        (exact)                                 │
//! │    333   × 10%    = 33.3  → 33                                          │
//! │    335   × 10%    = 33.5  → 34                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use activa_core::money::{Money, Percent};
//!
//! let price = Money::from_units(25000);
//! let ten = Percent::from_whole(10);
//!
//! assert_eq!(price.percent_of(ten), Money::from_units(2500));
//! assert_eq!(price.apply_percent_change(ten), Some(Money::from_units(27500)));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// Basis points in 100%.
const BPS_PER_WHOLE: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole currency units.
///
/// Signed so that intermediate results (an over-sized discount, a refund
/// line) are representable. Entity constructors reject negative prices.
///
/// Arithmetic saturates at the `i64` bounds instead of wrapping or
/// panicking. Validated prices and quantities keep real totals far below
/// them.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in whole currency units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity (line subtotal = unit price × quantity).
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// Returns `percent` of this amount, rounded half up to a whole unit.
    ///
    /// ## Example
    /// ```rust
    /// use activa_core::money::{Money, Percent};
    ///
    /// let subtotal = Money::from_units(100_000);
    /// assert_eq!(subtotal.percent_of(Percent::from_whole(10)).units(), 10_000);
    /// ```
    pub fn percent_of(&self, percent: Percent) -> Money {
        let scaled = round_div(self.0 as i128 * percent.bps() as i128);
        Money(i64::try_from(scaled).unwrap_or(if scaled < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Scales this amount by `1 + percent / 100`, rounded half up.
    ///
    /// Used by the bulk price change: `+10` raises a price by 10%,
    /// `-10` lowers it by 10%.
    ///
    /// Returns `None` when the result does not fit in a `Money`.
    ///
    /// ## Example
    /// ```rust
    /// use activa_core::money::{Money, Percent};
    ///
    /// let price = Money::from_units(25000);
    /// let lowered = price.apply_percent_change(Percent::from_whole(-10));
    /// assert_eq!(lowered.map(|m| m.units()), Some(22500));
    /// ```
    pub fn apply_percent_change(&self, percent: Percent) -> Option<Money> {
        let factor = BPS_PER_WHOLE + percent.bps() as i128;
        let scaled = round_div(self.0 as i128 * factor);
        i64::try_from(scaled).ok().map(Money)
    }
}

/// Divides by 10 000 rounding half towards positive infinity.
fn round_div(scaled: i128) -> i128 {
    (scaled + BPS_PER_WHOLE / 2).div_euclid(BPS_PER_WHOLE)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-${}", self.0.unsigned_abs())
        } else {
            write!(f, "${}", self.0)
        }
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Percent Type
// =============================================================================

/// A signed percentage in basis points (1000 = 10%, -250 = -2.5%).
///
/// ## Why Basis Points?
/// Users type values like `7,5` or `12.25`. Two decimals of a percent fit in
/// an integer exactly, so no float ever reaches a price.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Percent(i64);

impl Percent {
    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        Percent(bps)
    }

    /// Creates a percentage from a whole number (`10` → 10%).
    #[inline]
    pub const fn from_whole(pct: i64) -> Self {
        Percent(pct * 100)
    }

    #[inline]
    pub const fn bps(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let (whole, frac) = (abs / 100, abs % 100);
        if frac == 0 {
            write!(f, "{sign}{whole}%")
        } else if frac % 10 == 0 {
            write!(f, "{sign}{whole}.{}%", frac / 10)
        } else {
            write!(f, "{sign}{whole}.{frac:02}%")
        }
    }
}

/// Parses what a cashier types into a percentage prompt.
///
/// ## Accepted
/// - `10`, `-10`, `+5`
/// - `7.5`, `7,5` (decimal comma), `12.25`
/// - surrounding whitespace and a trailing `%`
///
/// ## Rejected with `InvalidPercentage`
/// - empty input, letters, exponents, `NaN`, `inf`
/// - more than two decimals
impl FromStr for Percent {
    type Err = CoreError;

    fn from_str(input: &str) -> CoreResult<Self> {
        let trimmed = input.trim();
        let body = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();

        if body.is_empty() {
            return Err(CoreError::invalid_percentage(input, "no value given"));
        }

        let (negative, unsigned) = if let Some(rest) = body.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = body.strip_prefix('+') {
            (false, rest)
        } else {
            (false, body)
        };

        let normalized = unsigned.replace(',', ".");
        let (whole, frac) = normalized
            .split_once('.')
            .unwrap_or((normalized.as_str(), ""));

        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
            return Err(CoreError::invalid_percentage(input, "not a number"));
        }

        if frac.len() > 2 {
            return Err(CoreError::invalid_percentage(
                input,
                "at most two decimals are allowed",
            ));
        }

        let too_large = || CoreError::invalid_percentage(input, "value is too large");

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| too_large())?
        };
        let frac_bps: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| too_large())? * 10,
            _ => frac.parse::<i64>().map_err(|_| too_large())?,
        };

        let bps = whole
            .checked_mul(100)
            .and_then(|v| v.checked_add(frac_bps))
            .ok_or_else(too_large)?;

        Ok(Percent(if negative { -bps } else { bps }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
