//! # Domain Types
//!
//! Core domain types shared by the catalog, rules and checkout modules.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  DiscountRate   │   │   BasketLine    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  code (GR1)     │   │  bps (u32)      │   │  code           │       │
//! │  │  name           │   │  3333 = 33.33%  │   │  quantity       │       │
//! │  │  unit_price     │   │                 │   │  line_total     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    validate_discount_bps, validate_price_cents, validate_product_code, validate_product_name,
};

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 3333 bps = 33.33%, which is the finest rate a pricing rule is
/// configured with. Integer bps keep line math exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a discount rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a discount rate from a percentage, validating the 0-100 range.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::types::DiscountRate;
    ///
    /// assert_eq!(DiscountRate::from_percentage(33.33).unwrap().bps(), 3333);
    /// assert!(DiscountRate::from_percentage(120.0).is_err());
    /// ```
    pub fn from_percentage(pct: f64) -> Result<Self, ValidationError> {
        if !pct.is_finite() || pct < 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "percent".to_string(),
                min: 0,
                max: 100,
            });
        }
        let bps = (pct * 100.0).round();
        if bps > u32::MAX as f64 {
            return Err(ValidationError::OutOfRange {
                field: "percent".to_string(),
                min: 0,
                max: 100,
            });
        }
        let bps = bps as u32;
        validate_discount_bps(bps)?;
        Ok(DiscountRate(bps))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Fields are private so every product in a catalog went through
/// [`Product::new`] and its checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product code scanned at the till - business identifier.
    code: String,

    /// Display name shown on the receipt.
    name: String,

    /// Price of one unit.
    unit_price: Money,
}

impl Product {
    /// Creates a validated product.
    ///
    /// ## Rules
    /// - `code` passes [`validate_product_code`]
    /// - `name` passes [`validate_product_name`]
    /// - `unit_price` passes [`validate_price_cents`]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
    ) -> Result<Self, ValidationError> {
        let code = code.into().trim().to_string();
        let name = name.into().trim().to_string();

        validate_product_code(&code)?;
        validate_product_name(&name)?;
        validate_price_cents(unit_price.cents())?;

        Ok(Product {
            code,
            name,
            unit_price,
        })
    }

    /// Builds a product from values already known to be valid (built-in data).
    pub(crate) fn from_trusted(code: &str, name: &str, unit_price: Money) -> Self {
        Product {
            code: code.to_string(),
            name: name.to_string(),
            unit_price,
        }
    }

    /// The scanned code.
    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unit price.
    #[inline]
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }
}

// =============================================================================
// Basket Line
// =============================================================================

/// A per-code snapshot of the basket, as shown on a receipt.
///
/// `line_total` is the line's own contribution rounded to pence. The basket
/// total is rounded once over the exact line sums, so the rounded lines may
/// differ from the total by a penny.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketLine {
    pub code: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub line_total: Money,
    /// Strategy that priced the line, if any rule was bound and met.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_rule: Option<String>,
}

impl BasketLine {
    /// Price before any rule.
    pub fn full_price(&self) -> Money {
        self.unit_price.multiply_quantity(i64::from(self.quantity))
    }

    /// Amount saved on this line (never negative: rules never charge more
    /// than full price).
    pub fn savings(&self) -> Money {
        self.full_price() - self.line_total
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
