use crate::error::ExclusionResult;
use crate::ids::{CategoryId, ProductId};
use crate::rules::{ExclusionRule, ExclusionSet, RuleCatalog, RuleOwner};
use crate::store::RuleStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// A thread-safe in-memory rule store.
///
/// Uses `Arc<RwLock<HashMap<..>>>` per owner kind so clones share the same
/// rules. A write is visible to every read that starts after it returns.
#[derive(Default, Clone)]
pub struct InMemoryRuleStore {
    products: Arc<RwLock<HashMap<ProductId, ExclusionRule>>>,
    categories: Arc<RwLock<HashMap<CategoryId, ExclusionRule>>>,
}

impl InMemoryRuleStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded from a rule catalog.
    pub fn from_catalog(catalog: &RuleCatalog) -> Self {
        let products = catalog
            .products
            .iter()
            .map(|p| {
                let owner = RuleOwner::Product(p.id.clone());
                (p.id.clone(), ExclusionRule::new(owner, p.excluded.clone()))
            })
            .collect();

        let categories = catalog
            .categories
            .iter()
            .map(|c| {
                let owner = RuleOwner::Category(c.id.clone());
                (c.id.clone(), ExclusionRule::new(owner, c.excluded.clone()))
            })
            .collect();

        Self {
            products: Arc::new(RwLock::new(products)),
            categories: Arc::new(RwLock::new(categories)),
        }
    }

    /// Full stored rule for a product, if one was ever saved
    pub async fn product_rule(&self, product: &ProductId) -> Option<ExclusionRule> {
        self.products.read().await.get(product).cloned()
    }

    /// Full stored rule for a category, if one was ever saved
    pub async fn category_rule(&self, category: &CategoryId) -> Option<ExclusionRule> {
        self.categories.read().await.get(category).cloned()
    }

    /// Number of stored product and category rules
    pub async fn rule_counts(&self) -> (usize, usize) {
        (
            self.products.read().await.len(),
            self.categories.read().await.len(),
        )
    }
}

#[async_trait]
impl RuleStore for InMemoryRuleStore {
    async fn product_exclusions(&self, product: &ProductId) -> ExclusionResult<ExclusionSet> {
        let products = self.products.read().await;
        Ok(products
            .get(product)
            .map(|rule| rule.methods.clone())
            .unwrap_or_default())
    }

    async fn category_exclusions(
        &self,
        category: &CategoryId,
    ) -> ExclusionResult<ExclusionSet> {
        let categories = self.categories.read().await;
        Ok(categories
            .get(category)
            .map(|rule| rule.methods.clone())
            .unwrap_or_default())
    }

    async fn set_product_exclusions(
        &self,
        product: &ProductId,
        methods: ExclusionSet,
    ) -> ExclusionResult<()> {
        info!(product = %product, count = methods.len(), "Saving product exclusions");
        let rule = ExclusionRule::new(RuleOwner::Product(product.clone()), methods);
        self.products.write().await.insert(product.clone(), rule);
        Ok(())
    }

    async fn set_category_exclusions(
        &self,
        category: &CategoryId,
        methods: ExclusionSet,
    ) -> ExclusionResult<()> {
        info!(category = %category, count = methods.len(), "Saving category exclusions");
        let rule = ExclusionRule::new(RuleOwner::Category(category.clone()), methods);
        self.categories.write().await.insert(category.clone(), rule);
        Ok(())
    }

    async fn remove_product(&self, product: &ProductId) -> ExclusionResult<()> {
        if self.products.write().await.remove(product).is_some() {
            info!(product = %product, "Removed product exclusions");
        }
        Ok(())
    }

    async fn remove_category(&self, category: &CategoryId) -> ExclusionResult<()> {
        if self.categories.write().await.remove(category).is_some() {
            info!(category = %category, "Removed category exclusions");
        }
        Ok(())
    }
}
