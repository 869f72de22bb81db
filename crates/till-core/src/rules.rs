//! # Pricing Rules
//!
//! Typed pricing rules, their loosely-typed configuration form, and the
//! validated [`RuleSet`] a checkout session prices against.
//!
//! ## Construction Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  config (TOML)          RawRule (all Option)      PricingRule (typed)   │
//! │  ─────────────          ────────────────────      ───────────────────   │
//! │  [[rules]]         ──►  strategy: Some(..)   ──►  BuyXGetYFree {        │
//! │  strategy = ...         codes: Some([..])          codes, paid, free }  │
//! │  codes = [...]          paid_units: None ─────┐                         │
//! │                                               └──► MissingField         │
//! │                                                                         │
//! │  Vec<PricingRule> ──► RuleSet::from_rules ──► code → rule index         │
//! │                       ├── code in catalog?    (UnknownProductCode)      │
//! │                       └── code unbound?       (DuplicateCode)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::error::{RuleError, ValidationError};
use crate::types::DiscountRate;
use crate::validation::{validate_min_quantity, validate_unit_count};

// =============================================================================
// Strategy
// =============================================================================

/// Strategy identifiers accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ThresholdPercent,
    BuyXGetYFree,
    BulkDiscount,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::ThresholdPercent,
        Strategy::BuyXGetYFree,
        Strategy::BulkDiscount,
    ];

    /// Configuration spelling.
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::ThresholdPercent => "threshold_percent",
            Strategy::BuyXGetYFree => "buy_x_get_y_free",
            Strategy::BulkDiscount => "bulk_discount",
        }
    }

    /// Parses a configured name, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(value))
    }
}

// =============================================================================
// Quantity Rounding
// =============================================================================

/// How a bulk discount counts the units it bills.
///
/// ## UpToEven
/// Odd quantities are billed as the next even count, so at 50% off the
/// customer pays for one unit per pair, including a lone unit. This bills
/// for an item that was never scanned, so it is only ever applied when a
/// rule opts in explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantityRounding {
    /// Bill exactly what was scanned.
    #[default]
    None,
    /// Bill odd quantities as the next even count.
    UpToEven,
}

impl QuantityRounding {
    /// Parses the configuration spelling (`none`, `up_to_even`).
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(QuantityRounding::None),
            "up_to_even" => Ok(QuantityRounding::UpToEven),
            _ => Err(ValidationError::NotAllowed {
                field: "quantity_rounding".to_string(),
                allowed: vec!["none".to_string(), "up_to_even".to_string()],
            }),
        }
    }

    /// Units billed for `quantity` scanned units.
    pub fn billed(self, quantity: u32) -> u32 {
        match self {
            QuantityRounding::None => quantity,
            QuantityRounding::UpToEven => quantity.saturating_add(quantity % 2),
        }
    }
}

// =============================================================================
// Pricing Rule
// =============================================================================

/// A pricing strategy bound to one or more product codes.
///
/// Closed set: adding a strategy forces every `match` in pricing to handle
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingRule {
    /// Percentage off the whole line once `quantity >= min_quantity`.
    ThresholdPercentDiscount {
        codes: Vec<String>,
        min_quantity: u32,
        rate: DiscountRate,
    },

    /// Every `paid_units + free_units` bundle is charged `paid_units`.
    BuyXGetYFree {
        codes: Vec<String>,
        paid_units: u32,
        free_units: u32,
    },

    /// Percentage off once `quantity >= min_quantity`, with an optional
    /// billed-quantity policy.
    BulkDiscount {
        codes: Vec<String>,
        min_quantity: u32,
        rate: DiscountRate,
        quantity_rounding: QuantityRounding,
    },
}

impl PricingRule {
    /// Percentage off once the line reaches `min_quantity` units.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::rules::PricingRule;
    ///
    /// let rule = PricingRule::threshold_percent(["SR1"], 3, 10.0).unwrap();
    /// assert_eq!(rule.strategy_name(), "threshold_percent");
    /// ```
    pub fn threshold_percent<I, S>(codes: I, min_quantity: u32, percent: f64) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        validate_min_quantity(min_quantity)?;
        Ok(PricingRule::ThresholdPercentDiscount {
            codes: normalize_codes(codes)?,
            min_quantity,
            rate: DiscountRate::from_percentage(percent)?,
        })
    }

    /// Buy `paid_units`, get `free_units` free. `(1, 1)` is buy-one-get-one-free.
    pub fn buy_x_get_y_free<I, S>(codes: I, paid_units: u32, free_units: u32) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        validate_unit_count("paid_units", paid_units)?;
        validate_unit_count("free_units", free_units)?;
        Ok(PricingRule::BuyXGetYFree {
            codes: normalize_codes(codes)?,
            paid_units,
            free_units,
        })
    }

    /// Bulk percentage discount with an explicit quantity policy.
    pub fn bulk_discount<I, S>(
        codes: I,
        min_quantity: u32,
        percent: f64,
        quantity_rounding: QuantityRounding,
    ) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        validate_min_quantity(min_quantity)?;
        Ok(PricingRule::BulkDiscount {
            codes: normalize_codes(codes)?,
            min_quantity,
            rate: DiscountRate::from_percentage(percent)?,
            quantity_rounding,
        })
    }

    /// Codes this rule prices.
    pub fn codes(&self) -> &[String] {
        match self {
            PricingRule::ThresholdPercentDiscount { codes, .. }
            | PricingRule::BuyXGetYFree { codes, .. }
            | PricingRule::BulkDiscount { codes, .. } => codes,
        }
    }

    /// The rule's strategy.
    pub fn strategy(&self) -> Strategy {
        match self {
            PricingRule::ThresholdPercentDiscount { .. } => Strategy::ThresholdPercent,
            PricingRule::BuyXGetYFree { .. } => Strategy::BuyXGetYFree,
            PricingRule::BulkDiscount { .. } => Strategy::BulkDiscount,
        }
    }

    /// Configuration identifier of the strategy.
    pub fn strategy_name(&self) -> &'static str {
        self.strategy().name()
    }

    /// Whether adding one unit can ever lower the line total.
    ///
    /// A percentage rule makes the line cheaper at the threshold than one
    /// unit below it when `percent > 100 / min_quantity`.
    pub fn can_lower_total(&self) -> bool {
        match self {
            PricingRule::ThresholdPercentDiscount {
                min_quantity, rate, ..
            }
            | PricingRule::BulkDiscount {
                min_quantity, rate, ..
            } => rate.bps() as u64 * *min_quantity as u64 > 10_000,
            PricingRule::BuyXGetYFree { .. } => false,
        }
    }
}

/// Trims, rejects blanks and drops repeated codes inside one rule.
fn normalize_codes<I, S>(codes: I) -> Result<Vec<String>, ValidationError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut normalized: Vec<String> = Vec::new();
    for code in codes {
        let code = code.into().trim().to_string();
        if code.is_empty() {
            return Err(ValidationError::Required {
                field: "code".to_string(),
            });
        }
        if !normalized.contains(&code) {
            normalized.push(code);
        }
    }

    if normalized.is_empty() {
        return Err(ValidationError::Required {
            field: "codes".to_string(),
        });
    }

    Ok(normalized)
}

// =============================================================================
// Raw Rule
// =============================================================================

/// A rule exactly as written in configuration, before validation.
///
/// Every field is optional so that a missing parameter is reported as
/// [`RuleError::MissingField`] with the rule's position rather than as an
/// opaque deserialization failure.
///
/// ## Example (TOML)
/// ```toml
/// [[rules]]
/// strategy = "threshold_percent"
/// codes = ["SR1"]
/// min_quantity = 3
/// percent = 10
///
/// [[rules]]
/// strategy = "buy_x_get_y_free"
/// codes = ["GR1"]
/// paid_units = 1
/// free_units = 1
/// ```
///
/// A rule without `strategy` is a threshold percentage rule; `discount` is
/// accepted in place of `percent`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRule {
    pub strategy: Option<String>,
    pub codes: Option<Vec<String>>,
    pub min_quantity: Option<u32>,
    #[serde(alias = "discount")]
    pub percent: Option<f64>,
    pub paid_units: Option<u32>,
    pub free_units: Option<u32>,
    pub quantity_rounding: Option<String>,
}

impl RawRule {
    /// Validates this rule's shape and parameters.
    ///
    /// Catalog membership and overlap are checked by the [`RuleSet`].
    pub fn into_rule(self, index: usize) -> Result<PricingRule, RuleError> {
        let strategy = match self.strategy.as_deref() {
            None => Strategy::ThresholdPercent,
            Some(name) => Strategy::parse(name).ok_or_else(|| RuleError::UnknownStrategy {
                index,
                strategy: name.to_string(),
            })?,
        };

        let codes = self.codes.ok_or(RuleError::MissingField {
            index,
            field: "codes",
        })?;
        if codes.is_empty() {
            return Err(RuleError::EmptyCodes { index });
        }

        let missing = |field: &'static str| RuleError::MissingField { index, field };
        let invalid = |source: ValidationError| RuleError::InvalidParameter { index, source };

        match strategy {
            Strategy::ThresholdPercent => {
                let min_quantity = self.min_quantity.ok_or_else(|| missing("min_quantity"))?;
                let percent = self.percent.ok_or_else(|| missing("percent"))?;
                PricingRule::threshold_percent(codes, min_quantity, percent).map_err(invalid)
            }
            Strategy::BuyXGetYFree => {
                let paid_units = self.paid_units.ok_or_else(|| missing("paid_units"))?;
                let free_units = self.free_units.ok_or_else(|| missing("free_units"))?;
                PricingRule::buy_x_get_y_free(codes, paid_units, free_units).map_err(invalid)
            }
            Strategy::BulkDiscount => {
                let min_quantity = self.min_quantity.ok_or_else(|| missing("min_quantity"))?;
                let percent = self.percent.ok_or_else(|| missing("percent"))?;
                let rounding = match self.quantity_rounding.as_deref() {
                    Some(value) => QuantityRounding::parse(value).map_err(invalid)?,
                    None => QuantityRounding::None,
                };
                PricingRule::bulk_discount(codes, min_quantity, percent, rounding).map_err(invalid)
            }
        }
    }
}

// =============================================================================
// Rule Set
// =============================================================================

/// A validated, immutable collection of pricing rules.
///
/// ## Invariants
/// - Every bound code exists in the catalog the set was built against
/// - Each code is bound to at most one rule
/// - An empty set is valid and means "no discounts"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<PricingRule>,
    by_code: HashMap<String, usize>,
}

impl RuleSet {
    /// A rule set with no rules: everything at full price.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validates raw configuration rules against the catalog.
    ///
    /// Stops at the first failing rule; no partial set is returned.
    pub fn build(catalog: &Catalog, raw_rules: &[RawRule]) -> Result<Self, RuleError> {
        let rules = raw_rules
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, raw)| raw.into_rule(index))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rules(catalog, rules)
    }

    /// Binds already-typed rules, checking catalog membership and overlap.
    pub fn from_rules(catalog: &Catalog, rules: Vec<PricingRule>) -> Result<Self, RuleError> {
        let mut by_code = HashMap::new();

        for (index, rule) in rules.iter().enumerate() {
            for code in rule.codes() {
                if !catalog.contains(code) {
                    return Err(RuleError::UnknownProductCode {
                        index,
                        code: code.clone(),
                    });
                }
                if let Some(&bound_to) = by_code.get(code) {
                    return Err(RuleError::DuplicateCode {
                        index,
                        code: code.clone(),
                        bound_to,
                    });
                }
                by_code.insert(code.clone(), index);
            }

            if rule.can_lower_total() {
                warn!(
                    index,
                    strategy = rule.strategy_name(),
                    "Rule makes a line cheaper at its threshold than one unit below it"
                );
            }
            debug!(index, strategy = rule.strategy_name(), codes = ?rule.codes(), "Rule bound");
        }

        Ok(RuleSet { rules, by_code })
    }

    /// The rule bound to `code`, if any.
    pub fn rule_for(&self, code: &str) -> Option<&PricingRule> {
        self.by_code.get(code).map(|&i| &self.rules[i])
    }

    /// Rules in configuration order.
    pub fn rules(&self) -> &[PricingRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Checks if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
