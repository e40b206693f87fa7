//! # Exclusion Rules
//!
//! Exclusion sets, rule ownership, and the TOML rule catalog.
//! Rules are seeded from `config/exclusions.toml`.

use crate::ids::{CategoryId, PaymentMethodId, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A set of payment methods to hide.
///
/// Union is the only way sets combine, so merging the same method twice
/// is a no-op and the order of merges never matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusionSet(BTreeSet<PaymentMethodId>);

impl ExclusionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Add a single method
    pub fn insert(&mut self, method: impl Into<PaymentMethodId>) -> bool {
        self.0.insert(method.into())
    }

    /// Union another set into this one
    pub fn merge(&mut self, other: &ExclusionSet) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Check whether a method is excluded
    pub fn contains(&self, method: &PaymentMethodId) -> bool {
        self.0.contains(method)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate methods in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &PaymentMethodId> {
        self.0.iter()
    }
}

impl<M: Into<PaymentMethodId>> FromIterator<M> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = M>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<M: Into<PaymentMethodId>> Extend<M> for ExclusionSet {
    fn extend<I: IntoIterator<Item = M>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for ExclusionSet {
    type Item = PaymentMethodId;
    type IntoIter = std::collections::btree_set::IntoIter<PaymentMethodId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExclusionSet {
    type Item = &'a PaymentMethodId;
    type IntoIter = std::collections::btree_set::Iter<'a, PaymentMethodId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The product or category a rule belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RuleOwner {
    Product(ProductId),
    Category(CategoryId),
}

impl fmt::Display for RuleOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleOwner::Product(id) => write!(f, "product {}", id),
            RuleOwner::Category(id) => write!(f, "category {}", id),
        }
    }
}

/// A stored exclusion rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionRule {
    /// Owning product or category
    pub owner: RuleOwner,

    /// Methods hidden while the owner is in the cart
    pub methods: ExclusionSet,

    /// Last time an administrator saved this rule
    pub updated_at: DateTime<Utc>,
}

impl ExclusionRule {
    /// Create a rule stamped with the current time
    pub fn new(owner: RuleOwner, methods: ExclusionSet) -> Self {
        Self {
            owner,
            methods,
            updated_at: Utc::now(),
        }
    }
}

/// Product entry in the rule catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRuleEntry {
    pub id: ProductId,

    /// Categories the product belongs to (used when a cart line omits them)
    #[serde(default)]
    pub categories: Vec<CategoryId>,

    #[serde(default)]
    pub excluded: ExclusionSet,
}

/// Category entry in the rule catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRuleEntry {
    pub id: CategoryId,

    #[serde(default)]
    pub excluded: ExclusionSet,
}

/// Exclusion rules loaded from config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleCatalog {
    #[serde(default)]
    pub products: Vec<ProductRuleEntry>,

    #[serde(default)]
    pub categories: Vec<CategoryRuleEntry>,
}

impl RuleCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Find a product entry by ID
    pub fn product(&self, id: &ProductId) -> Option<&ProductRuleEntry> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Categories recorded for a product, empty if the product is unknown
    pub fn categories_of(&self, id: &ProductId) -> &[CategoryId] {
        self.product(id)
            .map(|p| p.categories.as_slice())
            .unwrap_or(&[])
    }
}
