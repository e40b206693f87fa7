//! # Rule Store and Gateway Source Traits
//!
//! The two collaborators the resolver reads from. Both are owned by the
//! host platform; this crate only defines the seams and ships simple
//! in-process implementations.
//!
//! ```text
//! ┌──────────────────────────┐      ┌──────────────────────────┐
//! │   RuleStore (trait)      │      │  GatewaySource (trait)   │
//! │  ├── product_exclusions  │      │  └── list_available_     │
//! │  ├── category_exclusions │      │        gateways()        │
//! │  ├── set_* / remove_*    │      └────────────┬─────────────┘
//! │  └── snapshot(cart)      │                   │
//! └────────────┬─────────────┘                   │
//!              │        ┌────────────────────┐   │
//!              └───────►│ ExclusionResolver  │◄──┘
//!                       └────────────────────┘
//! ```

use crate::cart::Cart;
use crate::error::ExclusionResult;
use crate::gateway::CandidateGateways;
use crate::ids::{CategoryId, ProductId};
use crate::resolver::ExclusionLookup;
use crate::rules::ExclusionSet;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Storage for per-product and per-category exclusion rules.
///
/// Reads for owners with no rule return the empty set, never an error.
/// Writes replace the whole set for the owner.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Methods excluded by a product
    async fn product_exclusions(&self, product: &ProductId) -> ExclusionResult<ExclusionSet>;

    /// Methods excluded by a category
    async fn category_exclusions(&self, category: &CategoryId)
        -> ExclusionResult<ExclusionSet>;

    /// Replace a product's exclusions. An empty set clears them.
    async fn set_product_exclusions(
        &self,
        product: &ProductId,
        methods: ExclusionSet,
    ) -> ExclusionResult<()>;

    /// Replace a category's exclusions. An empty set clears them.
    async fn set_category_exclusions(
        &self,
        category: &CategoryId,
        methods: ExclusionSet,
    ) -> ExclusionResult<()>;

    /// Drop the rule of a deleted product
    async fn remove_product(&self, product: &ProductId) -> ExclusionResult<()>;

    /// Drop the rule of a deleted category
    async fn remove_category(&self, category: &CategoryId) -> ExclusionResult<()>;

    /// Fetch the rules for every distinct product and category in a cart.
    ///
    /// Each owner is read once. The first failed read is returned as is.
    async fn snapshot(&self, cart: &Cart) -> ExclusionResult<RuleSnapshot> {
        let mut snapshot = RuleSnapshot::new();

        for product in cart.products() {
            let methods = self.product_exclusions(product).await?;
            snapshot.insert_product(product.clone(), methods);
        }

        for category in cart.categories() {
            let methods = self.category_exclusions(category).await?;
            snapshot.insert_category(category.clone(), methods);
        }

        Ok(snapshot)
    }
}

/// Type alias for a shared rule store (dynamic dispatch)
pub type BoxedRuleStore = Arc<dyn RuleStore>;

/// Source of the gateways the platform currently offers at checkout
#[async_trait]
pub trait GatewaySource: Send + Sync {
    /// Checkout-eligible gateways before exclusion
    async fn list_available_gateways(&self) -> ExclusionResult<CandidateGateways>;
}

/// Type alias for a shared gateway source (dynamic dispatch)
pub type BoxedGatewaySource = Arc<dyn GatewaySource>;

/// Gateway source backed by a fixed list
#[derive(Debug, Clone, Default)]
pub struct StaticGatewaySource {
    gateways: CandidateGateways,
}

impl StaticGatewaySource {
    pub fn new(gateways: CandidateGateways) -> Self {
        Self { gateways }
    }
}

#[async_trait]
impl GatewaySource for StaticGatewaySource {
    async fn list_available_gateways(&self) -> ExclusionResult<CandidateGateways> {
        Ok(self.gateways.clone())
    }
}

/// Rules prefetched for one cart.
///
/// Owners that were never inserted read as the empty set.
#[derive(Debug, Clone, Default)]
pub struct RuleSnapshot {
    products: HashMap<ProductId, ExclusionSet>,
    categories: HashMap<CategoryId, ExclusionSet>,
}

impl RuleSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_product(&mut self, product: ProductId, methods: ExclusionSet) {
        self.products.insert(product, methods);
    }

    pub fn insert_category(&mut self, category: CategoryId, methods: ExclusionSet) {
        self.categories.insert(category, methods);
    }

    /// Builder: record a product rule
    pub fn with_product(mut self, product: impl Into<ProductId>, methods: ExclusionSet) -> Self {
        self.insert_product(product.into(), methods);
        self
    }

    /// Builder: record a category rule
    pub fn with_category(
        mut self,
        category: impl Into<CategoryId>,
        methods: ExclusionSet,
    ) -> Self {
        self.insert_category(category.into(), methods);
        self
    }
}

impl ExclusionLookup for RuleSnapshot {
    fn product_exclusions(&self, product: &ProductId) -> ExclusionResult<ExclusionSet> {
        Ok(self.products.get(product).cloned().unwrap_or_default())
    }

    fn category_exclusions(&self, category: &CategoryId) -> ExclusionResult<ExclusionSet> {
        Ok(self.categories.get(category).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use crate::error::ExclusionError;
    use crate::gateway::GatewayDescriptor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that counts reads and fails on a chosen category
    #[derive(Default)]
    struct CountingStore {
        reads: AtomicUsize,
        failing_category: Option<CategoryId>,
    }

    #[async_trait]
    impl RuleStore for CountingStore {
        async fn product_exclusions(&self, product: &ProductId) -> ExclusionResult<ExclusionSet> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(if product.as_str() == "p1" {
                ["bacs"].into_iter().collect()
            } else {
                ExclusionSet::new()
            })
        }

        async fn category_exclusions(
            &self,
            category: &CategoryId,
        ) -> ExclusionResult<ExclusionSet> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.failing_category.as_ref() == Some(category) {
                return Err(ExclusionError::category_lookup(category, "offline"));
            }
            Ok(ExclusionSet::new())
        }

        async fn set_product_exclusions(&self, _: &ProductId, _: ExclusionSet) -> ExclusionResult<()> {
            Ok(())
        }

        async fn set_category_exclusions(&self, _: &CategoryId, _: ExclusionSet) -> ExclusionResult<()> {
            Ok(())
        }

        async fn remove_product(&self, _: &ProductId) -> ExclusionResult<()> {
            Ok(())
        }

        async fn remove_category(&self, _: &CategoryId) -> ExclusionResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_snapshot_reads_each_owner_once() {
        let store = CountingStore::default();
        let cart = Cart::new()
            .with_line(CartLine::new("p1").with_categories(["c1", "c2"]))
            .with_line(CartLine::new("p1").in_category("c1"))
            .with_line(CartLine::new("p2").in_category("c2"));

        let snapshot = store.snapshot(&cart).await.unwrap();

        // p1, p2, c1, c2
        assert_eq!(store.reads.load(Ordering::SeqCst), 4);
        assert_eq!(
            snapshot.product_exclusions(&ProductId::from("p1")).unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_snapshot_propagates_lookup_failure() {
        let store = CountingStore {
            failing_category: Some(CategoryId::from("c2")),
            ..Default::default()
        };
        let cart = Cart::new().with_line(CartLine::new("p1").with_categories(["c1", "c2"]));

        let err = store.snapshot(&cart).await.unwrap_err();
        assert!(matches!(err, ExclusionError::LookupFailure { .. }));
    }

    #[test]
    fn test_snapshot_unknown_owner_is_empty() {
        let snapshot = RuleSnapshot::new();
        assert!(snapshot
            .category_exclusions(&CategoryId::from("never-configured"))
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_static_gateway_source() {
        let source = StaticGatewaySource::new(
            CandidateGateways::new().with_gateway("cod", GatewayDescriptor::new("Cash on Delivery")),
        );
        let gateways = source.list_available_gateways().await.unwrap();
        assert_eq!(gateways.len(), 1);
    }
}
