//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  Construction time (fatal to the session)                              │
//! │  ├── ValidationError  - A single field failed its check                │
//! │  └── RuleError        - A pricing rule could not be built              │
//! │                                                                         │
//! │  Operation time (recoverable)                                          │
//! │  └── CheckoutError    - Empty scan input, quantity overflow            │
//! │                                                                         │
//! │  NOT an error: scanning a well-formed code that is not in the          │
//! │  catalog. That is ScanOutcome::OutOfStock.                             │
//! │                                                                         │
//! │  Flow: ValidationError → RuleError → CheckoutError → CLI (anyhow)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (rule index, code, field)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a single value doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., a price with three decimals).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., two catalog entries with the same code).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Rule Error
// =============================================================================

/// Pricing rule construction errors.
///
/// Raised by `RuleSet::build` / `RuleSet::from_rules`. A failed build never
/// yields a partial rule set; `index` is the zero-based position of the
/// offending rule in the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// A parameter the strategy needs was not supplied.
    #[error("rule {index}: missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    /// The strategy identifier is not a recognised variant.
    #[error("rule {index}: unknown strategy '{strategy}'")]
    UnknownStrategy { index: usize, strategy: String },

    /// The rule targets a code that is not in the catalog.
    #[error("rule {index}: product code '{code}' is not in the catalog")]
    UnknownProductCode { index: usize, code: String },

    /// The rule targets no products at all.
    #[error("rule {index}: codes must not be empty")]
    EmptyCodes { index: usize },

    /// A parameter was supplied but is out of range.
    #[error("rule {index}: {source}")]
    InvalidParameter {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// The code is already bound to an earlier rule.
    ///
    /// ## Why an error?
    /// A code resolves to exactly one pricing path. Silently letting the
    /// first or last rule win hides configuration mistakes.
    #[error("rule {index}: product code '{code}' is already bound to rule {bound_to}")]
    DuplicateCode {
        index: usize,
        code: String,
        bound_to: usize,
    },
}

// =============================================================================
// Checkout Error
// =============================================================================

/// Checkout session errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// The scanned code was empty or blank.
    ///
    /// ## When This Occurs
    /// - Cashier pressed enter on an empty field
    /// - Scanner sent only whitespace
    #[error("Invalid input: {0}")]
    InvalidInput(#[source] ValidationError),

    /// The line's quantity counter is full (`u32::MAX` units).
    #[error("Quantity for {code} would overflow")]
    QuantityOverflow { code: String },

    /// The rule set failed to build (wraps RuleError).
    #[error("Pricing rules rejected: {0}")]
    Rules(#[from] RuleError),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CheckoutError.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

// =============================================================================
// Unit Tests
// =============================================================================
