//! # Checkout Session
//!
//! Holds scanned quantities for one basket and prices them on demand.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Operations                                  │
//! │                                                                         │
//! │  Caller Action            Method                  State Change          │
//! │  ─────────────            ──────                  ────────────          │
//! │                                                                         │
//! │  Open basket ────────────► Checkout::new() ─────► one line per product, │
//! │                                                   all quantities 0      │
//! │                                                                         │
//! │  Scan "GR1" ─────────────► scan() ──────────────► quantities[GR1] += 1  │
//! │                                                                         │
//! │  Scan "XX9" ─────────────► scan() ──────────────► (none) OutOfStock     │
//! │                                                                         │
//! │  Scan "" ────────────────► scan() ──────────────► (none) InvalidInput   │
//! │                                                                         │
//! │  Show total ─────────────► total() ─────────────► (read only)           │
//! │                                                                         │
//! │  NOTE: total() recomputes from scratch on every call. There is no       │
//! │        cached total to invalidate.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! A session is owned by one caller. `scan` takes `&mut self`; callers that
//! share a session across threads wrap it in their own `Mutex`. The catalog
//! is shared read-only through an `Arc`.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::{CheckoutError, CheckoutResult};
use crate::money::{Money, PreciseAmount};
use crate::pricing::{price_line, LinePrice};
use crate::rules::{RawRule, RuleSet};
use crate::types::{BasketLine, Product};
use crate::validation::validate_scan_input;
use crate::DEFAULT_CURRENCY_SYMBOL;

// =============================================================================
// Scan Outcome
// =============================================================================

/// Result of scanning a well-formed code.
///
/// An unknown code is an ordinary event at a till (mistyped or unstocked
/// SKU), so it is a value here rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// The line's quantity after the scan.
    Added { code: String, quantity: u32 },
    /// The code is not in the catalog; nothing changed.
    OutOfStock { code: String },
}

impl ScanOutcome {
    /// New quantity, or `None` for an out-of-stock scan.
    pub fn quantity(&self) -> Option<u32> {
        match self {
            ScanOutcome::Added { quantity, .. } => Some(*quantity),
            ScanOutcome::OutOfStock { .. } => None,
        }
    }

    /// Checks whether the scan was rejected as out of stock.
    pub fn is_out_of_stock(&self) -> bool {
        matches!(self, ScanOutcome::OutOfStock { .. })
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanOutcome::Added { code, quantity } => write!(f, "{} × {}", code, quantity),
            ScanOutcome::OutOfStock { code } => {
                write!(f, "Product with the code {} is out of stock", code)
            }
        }
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// Serialisable summary of a basket, for printing or JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub session_id: Uuid,
    pub opened_at: DateTime<Utc>,
    pub lines: Vec<BasketLine>,
    pub total: Money,
    pub savings: Money,
    pub currency_symbol: String,
    pub formatted_total: String,
}

impl Receipt {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// One basket being rung up.
///
/// ## Invariants
/// - `quantities[i]` belongs to the i-th catalog product
/// - Only `scan` mutates state; everything else is a pure read
#[derive(Debug, Clone)]
pub struct Checkout {
    id: Uuid,
    opened_at: DateTime<Utc>,
    catalog: Arc<Catalog>,
    rules: RuleSet,
    quantities: Vec<u32>,
    currency_symbol: String,
}

impl Checkout {
    /// Opens a session over a catalog with an already validated rule set.
    ///
    /// Rules bound to codes missing from this catalog never match.
    pub fn new(catalog: impl Into<Arc<Catalog>>, rules: RuleSet) -> Self {
        let catalog = catalog.into();
        let quantities = vec![0; catalog.len()];
        let checkout = Checkout {
            id: Uuid::new_v4(),
            opened_at: Utc::now(),
            catalog,
            rules,
            quantities,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        };
        debug!(
            session = %checkout.id,
            products = checkout.catalog.len(),
            rules = checkout.rules.len(),
            "Checkout opened"
        );
        checkout
    }

    /// Opens a session from configuration rules, failing if any rule is
    /// invalid.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::{Catalog, Checkout, RawRule};
    ///
    /// let rules = vec![RawRule {
    ///     codes: Some(vec!["SR1".to_string()]),
    ///     min_quantity: Some(3),
    ///     percent: Some(10.0),
    ///     ..RawRule::default()
    /// }];
    /// let mut co = Checkout::from_raw(Catalog::standard(), &rules).unwrap();
    /// for code in ["SR1", "SR1", "SR1"] {
    ///     co.scan(code).unwrap();
    /// }
    /// assert_eq!(co.formatted_total(), "£13.50");
    /// ```
    pub fn from_raw(catalog: impl Into<Arc<Catalog>>, raw_rules: &[RawRule]) -> CheckoutResult<Self> {
        let catalog = catalog.into();
        let rules = RuleSet::build(&catalog, raw_rules)?;
        Ok(Self::new(catalog, rules))
    }

    /// Builder: sets the symbol used by [`Checkout::formatted_total`].
    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// Scans one item.
    ///
    /// ## Returns
    /// - `Ok(Added)` with the line's new quantity
    /// - `Ok(OutOfStock)` if the code is not in the catalog (no change)
    /// - `Err(InvalidInput)` if the code is empty or blank
    /// - `Err(QuantityOverflow)` if the line already holds `u32::MAX` units
    pub fn scan(&mut self, code: &str) -> CheckoutResult<ScanOutcome> {
        let code = validate_scan_input(code).map_err(CheckoutError::InvalidInput)?;

        let Some(index) = self.catalog.position(code) else {
            warn!(session = %self.id, code, "Scanned code is out of stock");
            return Ok(ScanOutcome::OutOfStock {
                code: code.to_string(),
            });
        };

        let quantity = self.quantities[index]
            .checked_add(1)
            .ok_or_else(|| CheckoutError::QuantityOverflow {
                code: code.to_string(),
            })?;
        self.quantities[index] = quantity;

        debug!(session = %self.id, code, quantity, "Item scanned");
        Ok(ScanOutcome::Added {
            code: code.to_string(),
            quantity,
        })
    }

    /// Current quantity for a code (0 if never scanned or unknown).
    pub fn quantity(&self, code: &str) -> u32 {
        self.catalog
            .position(code)
            .map(|i| self.quantities[i])
            .unwrap_or(0)
    }

    /// Basket total after rules, rounded half-up to pence.
    ///
    /// Line totals are summed exactly and rounded once.
    pub fn total(&self) -> Money {
        self.priced_lines()
            .map(|(_, _, line)| line.amount)
            .sum::<PreciseAmount>()
            .round_half_up()
    }

    /// Total with the currency symbol, e.g. `£22.45`.
    pub fn formatted_total(&self) -> String {
        self.total().format_with_symbol(&self.currency_symbol)
    }

    /// Lines with a non-zero quantity, in catalog order.
    pub fn lines(&self) -> Vec<BasketLine> {
        self.priced_lines()
            .map(|(product, quantity, line)| BasketLine {
                code: product.code().to_string(),
                name: product.name().to_string(),
                unit_price: product.unit_price(),
                quantity,
                line_total: line.amount.round_half_up(),
                applied_rule: line.applied_rule.map(str::to_string),
            })
            .collect()
    }

    /// Builds a receipt of the current basket.
    pub fn receipt(&self) -> Receipt {
        let lines = self.lines();
        let total = self.total();
        let full_price = lines
            .iter()
            .fold(Money::zero(), |sum, line| sum.saturating_add(line.full_price()));

        Receipt {
            session_id: self.id,
            opened_at: self.opened_at,
            lines,
            total,
            savings: full_price - total,
            currency_symbol: self.currency_symbol.clone(),
            formatted_total: total.format_with_symbol(&self.currency_symbol),
        }
    }

    /// Total number of units scanned.
    pub fn item_count(&self) -> u64 {
        self.quantities.iter().map(|&q| u64::from(q)).sum()
    }

    /// Checks if nothing has been scanned.
    pub fn is_empty(&self) -> bool {
        self.quantities.iter().all(|&q| q == 0)
    }

    /// Session identifier (appears in logs and receipts).
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The bound rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// The catalog this session prices against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn priced_lines(&self) -> impl Iterator<Item = (&Product, u32, LinePrice)> + '_ {
        self.catalog
            .products()
            .zip(self.quantities.iter().copied())
            .filter(|&(_, quantity)| quantity > 0)
            .map(|(product, quantity)| {
                let rule = self.rules.rule_for(product.code());
                (product, quantity, price_line(product.unit_price(), quantity, rule))
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
