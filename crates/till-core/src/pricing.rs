//! # Line Pricing
//!
//! Computes one basket line's exact contribution from its unit price,
//! scanned quantity and bound rule.
//!
//! ## Pricing Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  rule_for(code)                                                         │
//! │     │                                                                   │
//! │     ├── None ──────────────────────► qty × price                        │
//! │     │                                                                   │
//! │     ├── ThresholdPercentDiscount ──► qty ≥ min ? qty × price × (1-r)    │
//! │     │                                           : qty × price           │
//! │     ├── BulkDiscount ──────────────► same, on the billed quantity       │
//! │     │                                                                   │
//! │     └── BuyXGetYFree ──────────────► payable(qty) × price               │
//! │            payable = ⌊q/(p+f)⌋·p + min(q mod (p+f), p)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Results are [`PreciseAmount`]s; the checkout rounds the basket sum once.

use tracing::trace;

use crate::money::{Money, PreciseAmount};
use crate::rules::PricingRule;
use crate::types::DiscountRate;

/// The priced contribution of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePrice {
    /// Exact line total.
    pub amount: PreciseAmount,
    /// Strategy that changed the price, `None` when charged in full.
    pub applied_rule: Option<&'static str>,
}

impl LinePrice {
    fn full(unit_price: Money, quantity: u32) -> Self {
        LinePrice {
            amount: PreciseAmount::discounted(unit_price, quantity, DiscountRate::zero()),
            applied_rule: None,
        }
    }
}

/// Units charged under "buy `paid_units` get `free_units` free".
///
/// ## Example
/// ```rust
/// use till_core::pricing::payable_units;
///
/// // Buy one get one free
/// assert_eq!(payable_units(3, 1, 1), 2);
/// // Buy two get one free
/// assert_eq!(payable_units(7, 2, 1), 5);
/// ```
pub fn payable_units(quantity: u32, paid_units: u32, free_units: u32) -> u32 {
    let bundle = paid_units.saturating_add(free_units);
    if bundle == 0 {
        return quantity;
    }
    let full_bundles = quantity / bundle;
    let remainder = quantity % bundle;
    full_bundles * paid_units + remainder.min(paid_units)
}

/// Prices one line.
///
/// The rule path wins whenever its threshold is met and it is cheaper than
/// full price; otherwise, or when no rule is bound, the line is charged in
/// full. A line never costs more than `quantity × unit_price`, even when
/// [`QuantityRounding::UpToEven`](crate::rules::QuantityRounding::UpToEven)
/// bills an extra unit. Quantity 0 is always zero.
pub fn price_line(unit_price: Money, quantity: u32, rule: Option<&PricingRule>) -> LinePrice {
    if quantity == 0 {
        return LinePrice {
            amount: PreciseAmount::zero(),
            applied_rule: None,
        };
    }

    let full = LinePrice::full(unit_price, quantity);
    let Some(rule) = rule else {
        return full;
    };

    let priced = match rule {
        PricingRule::ThresholdPercentDiscount {
            min_quantity, rate, ..
        } => {
            if quantity >= *min_quantity {
                Some(PreciseAmount::discounted(unit_price, quantity, *rate))
            } else {
                None
            }
        }
        PricingRule::BulkDiscount {
            min_quantity,
            rate,
            quantity_rounding,
            ..
        } => {
            if quantity >= *min_quantity {
                let billed = quantity_rounding.billed(quantity);
                Some(PreciseAmount::discounted(unit_price, billed, *rate))
            } else {
                None
            }
        }
        PricingRule::BuyXGetYFree {
            paid_units,
            free_units,
            ..
        } => {
            let payable = payable_units(quantity, *paid_units, *free_units);
            if payable < quantity {
                Some(PreciseAmount::discounted(unit_price, payable, DiscountRate::zero()))
            } else {
                None
            }
        }
    };

    match priced {
        Some(amount) if amount < full.amount => {
            trace!(
                strategy = rule.strategy_name(),
                quantity,
                exact = amount.raw(),
                "Rule applied"
            );
            LinePrice {
                amount,
                applied_rule: Some(rule.strategy_name()),
            }
        }
        _ => full,
    }
}
