//! # Validation Module
//!
//! Input validation utilities for Till.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Config file (TOML)                                           │
//! │  ├── Type validation (deserialization into RawRule / RawProduct)       │
//! │  └── Missing fields stay `None` until rule construction                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Catalog / RuleSet construction                               │
//! │  └── THIS MODULE: field-level business rule validation                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Checkout::scan                                                │
//! │  └── Empty code → InvalidInput, unknown code → OutOfStock              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::validation::{validate_product_code, validate_min_quantity};
//!
//! validate_product_code("GR1").unwrap();
//! validate_min_quantity(3).unwrap();
//! ```

use crate::error::ValidationError;
use crate::{MAX_CODE_LENGTH, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product code.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most `MAX_CODE_LENGTH` characters
/// - Should contain only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_product_code;
///
/// assert!(validate_product_code("CF1").is_ok());
/// assert!(validate_product_code("").is_err());
/// assert!(validate_product_code("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > MAX_CODE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_CODE_LENGTH,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a code as typed or scanned at the till.
///
/// Only emptiness is checked here. A well-formed code that is not in the
/// catalog is an expected outcome, handled by the checkout, not an error.
///
/// ## Returns
/// The trimmed code.
pub fn validate_scan_input(code: &str) -> ValidationResult<&str> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    Ok(code)
}

/// Validates a currency symbol used when formatting totals.
pub fn validate_currency_symbol(symbol: &str) -> ValidationResult<()> {
    if symbol.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "currency_symbol".to_string(),
        });
    }

    if symbol.chars().count() > 5 {
        return Err(ValidationError::TooLong {
            field: "currency_symbol".to_string(),
            max: 5,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price in pence.
///
/// ## Rules
/// - Must be positive (> 0): a till does not give items away
/// - Must be at most `MAX_UNIT_PRICE_CENTS`
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(311).is_ok());  // £3.11
/// assert!(validate_price_cents(0).is_err());   // Free item
/// assert!(validate_price_cents(i64::MAX).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    if cents > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 1,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a rule's minimum quantity.
///
/// ## Rules
/// - Must be positive (> 0). A threshold of 1 applies to any scanned item.
pub fn validate_min_quantity(min_quantity: u32) -> ValidationResult<()> {
    if min_quantity == 0 {
        return Err(ValidationError::MustBePositive {
            field: "min_quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit count in a "buy X get Y free" rule.
///
/// ## Rules
/// - Must be positive (> 0): `paid_units = 0` would give goods away and
///   `free_units = 0` is just full price
pub fn validate_unit_count(field: &str, units: u32) -> ValidationResult<()> {
    if units == 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a discount rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_discount_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "percent".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_code() {
        // Valid codes
        assert!(validate_product_code("GR1").is_ok());
        assert!(validate_product_code("COKE-330").is_ok());
        assert!(validate_product_code("tea_green").is_ok());

        // Invalid codes
        assert!(validate_product_code("").is_err());
        assert!(validate_product_code("   ").is_err());
        assert!(validate_product_code("has space").is_err());
        assert!(validate_product_code(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Green tea").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_scan_input() {
        assert_eq!(validate_scan_input(" GR1\n").unwrap(), "GR1");
        // Malformed but non-empty codes pass: the catalog decides
        assert_eq!(validate_scan_input("not a code").unwrap(), "not a code");
        assert!(validate_scan_input("").is_err());
        assert!(validate_scan_input("\t ").is_err());
    }

    #[test]
    fn test_validate_currency_symbol() {
        assert!(validate_currency_symbol("£").is_ok());
        assert!(validate_currency_symbol("CHF ").is_ok());
        assert!(validate_currency_symbol("").is_err());
        assert!(validate_currency_symbol("POUNDS").is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(1).is_ok());
        assert!(validate_price_cents(MAX_UNIT_PRICE_CENTS).is_ok());

        assert!(matches!(
            validate_price_cents(0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_price_cents(-311),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert_eq!(
            validate_price_cents(MAX_UNIT_PRICE_CENTS + 1),
            Err(ValidationError::OutOfRange {
                field: "price".to_string(),
                min: 1,
                max: MAX_UNIT_PRICE_CENTS,
            })
        );
    }

    #[test]
    fn test_validate_numeric_parameters() {
        assert!(validate_min_quantity(1).is_ok());
        assert!(validate_min_quantity(0).is_err());

        assert!(validate_unit_count("paid_units", 1).is_ok());
        assert!(validate_unit_count("free_units", 0).is_err());

        assert!(validate_discount_bps(0).is_ok());
        assert!(validate_discount_bps(3333).is_ok());
        assert!(validate_discount_bps(10000).is_ok());
        assert!(validate_discount_bps(10001).is_err());
    }
}
