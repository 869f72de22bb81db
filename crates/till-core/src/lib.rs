//! # till-core: Pure Basket Pricing for Till
//!
//! This crate is the **heart** of Till. It turns a catalog, a set of
//! pricing rules and a stream of scanned codes into a basket total, with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Till Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/till-cli                                │   │
//! │  │    till.toml ──► TillConfig ──► scan codes ──► print total     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │   rules   │  │  pricing  │  │ checkout  │  │   │
//! │  │   │  Product  │  │  RuleSet  │  │ price_line│  │   scan    │  │   │
//! │  │   │  lookup   │  │  RawRule  │  │  payable  │  │   total   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO ENV • PURE FUNCTIONS                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, DiscountRate, BasketLine)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - Product registry
//! - [`rules`] - Pricing rules and the validated RuleSet
//! - [`pricing`] - Per-line pricing strategies
//! - [`checkout`] - The checkout session
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: `total()` is deterministic - same basket = same total
//! 2. **No I/O**: Config files and the terminal belong to the CLI
//! 3. **Integer Money**: All monetary values are in pence (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::{Catalog, Checkout, PricingRule, RuleSet};
//!
//! let catalog = Catalog::standard();
//! let rules = RuleSet::from_rules(
//!     &catalog,
//!     vec![
//!         PricingRule::buy_x_get_y_free(["GR1"], 1, 1).unwrap(),
//!         PricingRule::threshold_percent(["SR1"], 3, 10.0).unwrap(),
//!         PricingRule::threshold_percent(["CF1"], 3, 33.33).unwrap(),
//!     ],
//! )
//! .unwrap();
//!
//! let mut co = Checkout::new(catalog, rules);
//! for code in ["GR1", "SR1", "GR1", "GR1", "CF1"] {
//!     co.scan(code).unwrap();
//! }
//! assert_eq!(co.formatted_total(), "£22.45");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod pricing;
pub mod rules;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use till_core::Money` instead of
// `use till_core::money::Money`

pub use catalog::{Catalog, RawProduct};
pub use checkout::{Checkout, Receipt, ScanOutcome};
pub use error::{CheckoutError, CheckoutResult, RuleError, ValidationError};
pub use money::Money;
pub use rules::{PricingRule, QuantityRounding, RawRule, RuleSet, Strategy};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency symbol used when formatting totals unless configured otherwise.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "£";

/// Maximum length of a product code.
pub const MAX_CODE_LENGTH: usize = 50;

/// Maximum unit price in pence (£1,000,000).
///
/// ## Why a bound?
/// A line is at most `MAX_UNIT_PRICE_CENTS × u32::MAX` ≈ 4.3 × 10^17 pence,
/// which fits an `i64` with room for thousands of such lines.
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000;
