//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, plus the
//! `PreciseAmount` accumulator used while a basket total is being computed.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    3 × 11.23 × (1 - 0.3333) = 22.461123000000002  ❌                    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer pence, with a finer scale while pricing          │
//! │    3369 pence × 6667 bps = 22_461_123 (pence × 10_000)                  │
//! │    Rounded exactly once at the end → 2246 pence                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::money::Money;
//!
//! // Create from pence (preferred)
//! let price = Money::from_cents(311); // £3.11
//!
//! // Or parse a configured decimal string
//! let parsed: Money = "3.11".parse().unwrap();
//! assert_eq!(price, parsed);
//!
//! let doubled = price * 2;
//! assert_eq!(doubled.cents(), 622);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::DiscountRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (pence for GBP).
///
/// ## Design Decisions
/// - **i64 (signed)**: Subtraction stays well-defined even when intermediate
///   values would dip below zero
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **No currency inside**: one session prices in one currency; the symbol
///   is attached only when formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let price = Money::from_cents(1123); // Represents £11.23
    /// assert_eq!(price.cents(), 1123);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (pounds) portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (pence) portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(311); // £3.11
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 933); // £9.33
    /// ```
    ///
    /// Saturates at the `i64` bounds instead of wrapping.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Adds two amounts, saturating at the `i64` bounds.
    #[inline]
    pub const fn saturating_add(&self, other: Money) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Formats the amount with a currency symbol and exactly two decimals.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(2245).format_with_symbol("£"), "£22.45");
    /// assert_eq!(Money::from_cents(-50).format_with_symbol("£"), "-£0.50");
    /// ```
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}{}.{:02}", sign, symbol, self.major().abs(), self.minor())
    }
}

/// Parses a decimal amount such as `"3.11"`, `"5"` or `"11.2"`.
///
/// ## Rules
/// - Digits only, optional single `.` separator
/// - At most two fractional digits (no silent truncation of `3.115`)
/// - No sign: configured prices are never negative
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: reason.to_string(),
        };

        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "price".to_string(),
            });
        }

        let (major, minor) = match s.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (s, ""),
        };

        if major.is_empty() || !major.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("must be a decimal number such as 3.11"));
        }
        if minor.len() > 2 || !minor.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("must have at most two decimal places"));
        }

        let major: i64 = major
            .parse()
            .map_err(|_| invalid("amount is too large"))?;
        let minor: i64 = match minor.len() {
            0 => 0,
            1 => minor.parse::<i64>().map_err(|_| invalid("bad pence"))? * 10,
            _ => minor.parse().map_err(|_| invalid("bad pence"))?,
        };

        major
            .checked_mul(100)
            .and_then(|m| m.checked_add(minor))
            .map(Money)
            .ok_or_else(|| invalid("amount is too large"))
    }
}

// =============================================================================
// Precise Amount
// =============================================================================

/// Number of sub-units per cent while a total is being accumulated.
///
/// Matches the basis-point scale of [`DiscountRate`], so a discounted line
/// `price × qty × (10_000 - bps)` is exact with no intermediate rounding.
pub const PRECISION_SCALE: i128 = 10_000;

/// An exact amount in cents × [`PRECISION_SCALE`].
///
/// ## Why?
/// Rounding each discounted line separately can drift a penny away from
/// rounding the basket sum once. Line totals are summed in this unit and
/// converted back to [`Money`] in a single half-up rounding step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct PreciseAmount(i128);

impl PreciseAmount {
    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        PreciseAmount(0)
    }

    /// `unit_price × quantity × (1 - rate)`, kept exact.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::{Money, PreciseAmount};
    /// use till_core::types::DiscountRate;
    ///
    /// // 3 × £11.23 at 33.33% off = £22.461123
    /// let line = PreciseAmount::discounted(Money::from_cents(1123), 3, DiscountRate::from_bps(3333));
    /// assert_eq!(line.raw(), 22_461_123);
    /// assert_eq!(line.round_half_up().cents(), 2246);
    /// ```
    pub fn discounted(unit_price: Money, quantity: u32, rate: DiscountRate) -> Self {
        let remaining_bps = PRECISION_SCALE - rate.bps() as i128;
        PreciseAmount(unit_price.0 as i128 * quantity as i128 * remaining_bps)
    }

    /// Raw value in cents × [`PRECISION_SCALE`].
    #[inline]
    pub const fn raw(&self) -> i128 {
        self.0
    }

    /// Rounds to whole cents, halves away from zero.
    ///
    /// ```rust
    /// use till_core::money::{Money, PreciseAmount};
    /// use till_core::types::DiscountRate;
    ///
    /// // 3 × £3.11 at 50% off = £4.665 → £4.67
    /// let line = PreciseAmount::discounted(Money::from_cents(311), 3, DiscountRate::from_bps(5000));
    /// assert_eq!(line.round_half_up().cents(), 467);
    /// ```
    ///
    /// Amounts beyond the `i64` range saturate rather than wrap, so a
    /// positive sum never comes back negative.
    pub fn round_half_up(&self) -> Money {
        let half = PRECISION_SCALE / 2;
        let cents = if self.0 >= 0 {
            (self.0 + half) / PRECISION_SCALE
        } else {
            (self.0 - half) / PRECISION_SCALE
        };
        match i64::try_from(cents) {
            Ok(cents) => Money(cents),
            Err(_) if cents > 0 => Money(i64::MAX),
            Err(_) => Money(i64::MIN),
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the bare amount with two decimals (`22.45`).
///
/// ## Note
/// Use [`Money::format_with_symbol`] for customer-facing output.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol(""))
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Add for PreciseAmount {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        PreciseAmount(self.0 + other.0)
    }
}

impl AddAssign for PreciseAmount {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl std::iter::Sum for PreciseAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(PreciseAmount::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
