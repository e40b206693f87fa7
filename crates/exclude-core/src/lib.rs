//! # exclude-core
//!
//! Core types and traits for the payment-exclude engine.
//!
//! Products and categories can be configured to hide payment methods at
//! checkout. This crate merges those rules for a cart and filters the
//! candidate gateways accordingly.
//!
//! This crate provides:
//! - `ProductId`, `CategoryId`, `PaymentMethodId` identifier types
//! - `Cart` and `CartLine` describing what is being bought
//! - `GatewayMap` for candidate and resolved gateways
//! - `ExclusionSet`, `ExclusionRule`, and `RuleCatalog` for rules
//! - `resolve` and `ExclusionResolver` for the exclusion computation
//! - `RuleStore` / `GatewaySource` traits and in-memory implementations
//! - `ExclusionError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use exclude_core::{Cart, CartLine, ExclusionResolver, InMemoryRuleStore, StaticGatewaySource};
//!
//! let resolver = ExclusionResolver::new(Arc::new(store), Arc::new(gateways));
//!
//! let cart = Cart::new().with_line(CartLine::new("gift-card").in_category("digital"));
//!
//! // Gateways to render at checkout
//! let gateways = resolver.available_gateways(&cart).await?;
//! ```

pub mod cart;
pub mod error;
pub mod gateway;
pub mod ids;
pub mod memory;
pub mod resolver;
pub mod rules;
pub mod store;

// Re-exports for convenience
pub use cart::{Cart, CartLine};
pub use error::{ExclusionError, ExclusionResult, LookupSource};
pub use gateway::{
    CandidateGateways, GatewayCatalog, GatewayDescriptor, GatewayEntry, GatewayMap,
    ResolvedGateways,
};
pub use ids::{CategoryId, PaymentMethodId, ProductId};
pub use memory::InMemoryRuleStore;
pub use resolver::{
    apply_exclusions, collect_exclusions, resolve, resolve_with_lookup, Evaluation,
    ExclusionLookup, ExclusionResolver,
};
pub use rules::{
    CategoryRuleEntry, ExclusionRule, ExclusionSet, ProductRuleEntry, RuleCatalog, RuleOwner,
};
pub use store::{
    BoxedGatewaySource, BoxedRuleStore, GatewaySource, RuleSnapshot, RuleStore,
    StaticGatewaySource,
};
