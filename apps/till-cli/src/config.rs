//! # Till Configuration
//!
//! Catalog, pricing rules and currency symbol for one till.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TILL_CURRENCY_SYMBOL=€                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config till.toml  or  TILL_CONFIG=till.toml                      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     standard catalog, no rules, "£"                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! currency_symbol = "£"
//!
//! [[products]]
//! code = "SR1"
//! name = "Strawberries"
//! price = "5.00"
//!
//! [[rules]]
//! strategy = "threshold_percent"
//! codes = ["SR1"]
//! min_quantity = 3
//! percent = 10
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use till_core::validation::validate_currency_symbol;
use till_core::{
    Catalog, Checkout, RawProduct, RawRule, RuleError, RuleSet, ValidationError,
    DEFAULT_CURRENCY_SYMBOL,
};

/// Environment variable overriding the configured currency symbol.
pub const CURRENCY_SYMBOL_ENV: &str = "TILL_CURRENCY_SYMBOL";

// =============================================================================
// Errors
// =============================================================================

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid catalog: {0}")]
    Catalog(#[source] ValidationError),

    #[error(transparent)]
    Rules(#[from] RuleError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Till Config
// =============================================================================

/// Complete till configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TillConfig {
    /// Prefix for formatted totals.
    pub currency_symbol: String,

    /// Catalog entries. Empty means the standard catalog.
    pub products: Vec<RawProduct>,

    /// Pricing rules, at most one per product code.
    pub rules: Vec<RawRule>,
}

impl Default for TillConfig {
    fn default() -> Self {
        TillConfig {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            products: Vec::new(),
            rules: Vec::new(),
        }
    }
}

impl TillConfig {
    /// Loads configuration: file, then environment, then validation.
    ///
    /// Without a path the built-in defaults are used. A path that was
    /// asked for but cannot be read is an error.
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                info!(?path, "Loading till config from file");
                let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&contents)?
            }
            None => {
                debug!("No config file given, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_currency_symbol(&self.currency_symbol)
            .map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        Ok(())
    }

    /// Builds the catalog, falling back to the standard one.
    pub fn catalog(&self) -> ConfigResult<Catalog> {
        if self.products.is_empty() {
            debug!("No products configured, using the standard catalog");
            return Ok(Catalog::standard());
        }
        Catalog::from_raw(self.products.iter().cloned()).map_err(ConfigError::Catalog)
    }

    /// Builds a ready-to-scan checkout from this configuration.
    pub fn checkout(&self) -> ConfigResult<Checkout> {
        let catalog = self.catalog()?;
        let rules = RuleSet::build(&catalog, &self.rules)?;
        info!(
            products = catalog.len(),
            rules = rules.len(),
            "Checkout configured"
        );
        Ok(Checkout::new(catalog, rules).with_currency_symbol(self.currency_symbol.clone()))
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the process environment in
    /// production).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(symbol) = lookup(CURRENCY_SYMBOL_ENV) {
            debug!(symbol = %symbol, "Overriding currency symbol from environment");
            self.currency_symbol = symbol;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
        currency_symbol = "€"

        [[products]]
        code = "BR1"
        name = "Bread"
        price = "1.20"

        [[products]]
        code = "MK1"
        name = "Milk"
        price = "0.95"

        [[rules]]
        strategy = "buy_x_get_y_free"
        codes = ["BR1"]
        paid_units = 2
        free_units = 1

        [[rules]]
        codes = ["MK1"]
        min_quantity = 4
        discount = 25
    "#;

    #[test]
    fn test_defaults() {
        let config = TillConfig::default();
        assert_eq!(config.currency_symbol, "£");
        assert!(config.products.is_empty());
        assert!(config.rules.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_without_path_uses_standard_catalog() {
        let config = TillConfig::load(None).unwrap();
        assert!(config.products.is_empty());
        assert!(config.rules.is_empty());
        assert_eq!(config.catalog().unwrap(), Catalog::standard());
    }

    #[test]
    fn test_empty_document_is_all_defaults() {
        let config = TillConfig::from_toml_str("").unwrap();
        assert_eq!(config, TillConfig::default());
    }

    #[test]
    fn test_sample_config_prices_basket() {
        let config = TillConfig::from_toml_str(SAMPLE).unwrap();
        let mut co = config.checkout().unwrap();

        for code in ["BR1", "BR1", "BR1", "MK1", "MK1", "MK1", "MK1"] {
            co.scan(code).unwrap();
        }

        // 2 × 1.20 + 4 × 0.95 × 75% = 2.40 + 2.85
        assert_eq!(co.formatted_total(), "€5.25");
    }

    #[test]
    fn test_env_override_replaces_symbol() {
        let mut config = TillConfig::from_toml_str(SAMPLE).unwrap();
        config.apply_overrides(|key| (key == CURRENCY_SYMBOL_ENV).then(|| "$".to_string()));
        assert_eq!(config.currency_symbol, "$");

        let mut untouched = TillConfig::default();
        untouched.apply_overrides(|_| None);
        assert_eq!(untouched.currency_symbol, "£");
    }

    #[test]
    fn test_empty_symbol_is_invalid() {
        let config = TillConfig {
            currency_symbol: String::new(),
            ..TillConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn test_rule_for_unknown_product_is_rejected() {
        let config = TillConfig::from_toml_str(
            r#"
            [[rules]]
            codes = ["XX9"]
            min_quantity = 2
            percent = 10
            "#,
        )
        .unwrap();

        assert!(matches!(
            config.checkout(),
            Err(ConfigError::Rules(RuleError::UnknownProductCode { .. }))
        ));
    }

    #[test]
    fn test_bad_price_is_a_catalog_error() {
        let config = TillConfig::from_toml_str(
            r#"
            [[products]]
            code = "BR1"
            name = "Bread"
            price = "1.2.3"
            "#,
        )
        .unwrap();

        assert!(matches!(config.catalog(), Err(ConfigError::Catalog(_))));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let result = TillConfig::from_toml_str("currency_symbol = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = TillConfig::load(Some(Path::new("/nonexistent/till.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_shipped_config_matches_standard_pricing() {
        let config = TillConfig::from_toml_str(include_str!("../../../config/till.toml")).unwrap();
        let mut co = config.checkout().unwrap();

        for code in ["GR1", "SR1", "GR1", "GR1", "CF1"] {
            co.scan(code).unwrap();
        }

        assert_eq!(co.formatted_total(), "£22.45");
    }
}
