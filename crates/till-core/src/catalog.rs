//! # Catalog
//!
//! Static registry of product code → product. Built once at startup and
//! shared read-only by every checkout session.
//!
//! ## Standard Catalog
//! ```text
//! ┌──────┬──────────────┬─────────┐
//! │ Code │ Name         │ Price   │
//! ├──────┼──────────────┼─────────┤
//! │ GR1  │ Green tea    │  £3.11  │
//! │ SR1  │ Strawberries │  £5.00  │
//! │ CF1  │ Coffee       │ £11.23  │
//! └──────┴──────────────┴─────────┘
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Product;

/// Catalog entry as it appears in configuration.
///
/// ## Example (TOML)
/// ```toml
/// [[products]]
/// code = "GR1"
/// name = "Green tea"
/// price = "3.11"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProduct {
    pub code: String,
    pub name: String,
    /// Decimal string, parsed into [`Money`] without going through floats.
    pub price: String,
}

impl RawProduct {
    /// Validates and converts into a [`Product`].
    pub fn into_product(self) -> Result<Product, ValidationError> {
        let price: Money = self.price.parse()?;
        Product::new(self.code, self.name, price)
    }
}

/// The product catalog.
///
/// ## Invariants
/// - Codes are unique
/// - Iteration follows insertion order (receipts list lines in catalog order)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
    by_code: HashMap<String, usize>,
}

impl Catalog {
    /// Creates a catalog, rejecting duplicate codes.
    pub fn new(products: impl IntoIterator<Item = Product>) -> Result<Self, ValidationError> {
        let mut catalog = Catalog {
            products: Vec::new(),
            by_code: HashMap::new(),
        };

        for product in products {
            if catalog.by_code.contains_key(product.code()) {
                return Err(ValidationError::Duplicate {
                    field: "code".to_string(),
                    value: product.code().to_string(),
                });
            }
            catalog
                .by_code
                .insert(product.code().to_string(), catalog.products.len());
            catalog.products.push(product);
        }

        debug!(products = catalog.products.len(), "Catalog built");
        Ok(catalog)
    }

    /// Creates a catalog from configuration entries.
    pub fn from_raw(entries: impl IntoIterator<Item = RawProduct>) -> Result<Self, ValidationError> {
        let products = entries
            .into_iter()
            .map(RawProduct::into_product)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(products)
    }

    /// The three-product catalog the till ships with.
    pub fn standard() -> Self {
        let products = vec![
            Product::from_trusted("GR1", "Green tea", Money::from_cents(311)),
            Product::from_trusted("SR1", "Strawberries", Money::from_cents(500)),
            Product::from_trusted("CF1", "Coffee", Money::from_cents(1123)),
        ];
        let by_code = products
            .iter()
            .enumerate()
            .map(|(i, p)| (p.code().to_string(), i))
            .collect();
        Catalog { products, by_code }
    }

    /// Finds a product by code. `None` means the code is not stocked.
    pub fn lookup(&self, code: &str) -> Option<&Product> {
        self.by_code.get(code).map(|&i| &self.products[i])
    }

    /// Index of a code in insertion order.
    pub(crate) fn position(&self, code: &str) -> Option<usize> {
        self.by_code.get(code).copied()
    }

    /// Checks whether a code is stocked.
    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    /// All products in insertion order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Checks if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::standard()
    }
}
