//! # Cart Types
//!
//! The cart as seen by the exclusion resolver: which products are present
//! and which categories each belongs to. Built fresh per checkout.

use crate::ids::{CategoryId, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A line item in the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID
    pub product: ProductId,

    /// Categories the product belongs to
    #[serde(default)]
    pub categories: BTreeSet<CategoryId>,
}

impl CartLine {
    /// Create a line with no categories
    pub fn new(product: impl Into<ProductId>) -> Self {
        Self {
            product: product.into(),
            categories: BTreeSet::new(),
        }
    }

    /// Builder: add a category
    pub fn in_category(mut self, category: impl Into<CategoryId>) -> Self {
        self.categories.insert(category.into());
        self
    }

    /// Builder: add several categories
    pub fn with_categories<I, C>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CategoryId>,
    {
        self.categories
            .extend(categories.into_iter().map(Into::into));
        self
    }
}

/// The cart to evaluate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Line items (order has no effect on exclusions)
    #[serde(default)]
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line item
    pub fn add_line(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    /// Builder: add a line item
    pub fn with_line(mut self, line: CartLine) -> Self {
        self.add_line(line);
        self
    }

    /// Check if cart is empty
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get line count
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Distinct products in the cart
    pub fn products(&self) -> BTreeSet<&ProductId> {
        self.lines.iter().map(|l| &l.product).collect()
    }

    /// Distinct categories across all lines
    pub fn categories(&self) -> BTreeSet<&CategoryId> {
        self.lines.iter().flat_map(|l| l.categories.iter()).collect()
    }
}

impl FromIterator<CartLine> for Cart {
    fn from_iter<I: IntoIterator<Item = CartLine>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_builder() {
        let cart = Cart::new()
            .with_line(CartLine::new("p1").in_category("c1"))
            .with_line(CartLine::new("p2").with_categories(["c1", "c2"]))
            .with_line(CartLine::new("p1"));

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.products().len(), 2);
        assert_eq!(cart.categories().len(), 2);
    }

    #[test]
    fn test_line_categories_are_a_set() {
        let line = CartLine::new("p1").with_categories(["c1", "c1", "c2"]);
        assert_eq!(line.categories.len(), 2);
    }

    #[test]
    fn test_cart_deserializes_without_categories() {
        let cart: Cart = serde_json::from_str(r#"{"lines":[{"product":"p1"}]}"#).unwrap();
        assert_eq!(cart.lines[0], CartLine::new("p1"));
        assert!(Cart::new().is_empty());
    }
}
