//! # Exclusion Resolver
//!
//! Works out which payment gateways to hide for a cart.
//!
//! Every product in the cart contributes its own exclusions plus those of
//! each of its categories. The union of all contributions is removed from
//! the candidate gateways; everything else passes through untouched and in
//! candidate order.
//!
//! The pure entry point is [`resolve`], which takes the two rule lookups as
//! closures. [`ExclusionResolver`] wires the same computation to a
//! [`RuleStore`](crate::store::RuleStore) and a
//! [`GatewaySource`](crate::store::GatewaySource) for use at a checkout
//! boundary.

use crate::cart::Cart;
use crate::error::ExclusionResult;
use crate::gateway::{CandidateGateways, ResolvedGateways};
use crate::ids::{CategoryId, PaymentMethodId, ProductId};
use crate::rules::ExclusionSet;
use crate::store::{BoxedGatewaySource, BoxedRuleStore, GatewaySource, RuleStore};
use tracing::{debug, instrument};

/// Synchronous access to exclusion rules.
///
/// Unknown owners must read as the empty set.
pub trait ExclusionLookup {
    fn product_exclusions(&self, product: &ProductId) -> ExclusionResult<ExclusionSet>;
    fn category_exclusions(&self, category: &CategoryId) -> ExclusionResult<ExclusionSet>;
}

/// Union of every exclusion that applies to the cart.
pub fn collect_exclusions<P, C>(
    cart: &Cart,
    product_lookup: P,
    category_lookup: C,
) -> ExclusionResult<ExclusionSet>
where
    P: Fn(&ProductId) -> ExclusionResult<ExclusionSet>,
    C: Fn(&CategoryId) -> ExclusionResult<ExclusionSet>,
{
    let mut excluded = ExclusionSet::new();

    for line in &cart.lines {
        excluded.merge(&product_lookup(&line.product)?);

        for category in &line.categories {
            excluded.merge(&category_lookup(category)?);
        }
    }

    Ok(excluded)
}

/// Remove excluded gateways from the candidates.
///
/// Excluded ids with no matching candidate are ignored. The result is always
/// a fresh copy, even when nothing is removed.
pub fn apply_exclusions(
    excluded: &ExclusionSet,
    candidates: &CandidateGateways,
) -> ResolvedGateways {
    if excluded.is_empty() {
        return candidates.clone();
    }
    candidates.filtered(|id| !excluded.contains(id))
}

/// Resolve the gateways to offer for a cart.
///
/// Lookup errors are returned unchanged; nothing is retried or defaulted.
pub fn resolve<P, C>(
    cart: &Cart,
    product_lookup: P,
    category_lookup: C,
    candidates: &CandidateGateways,
) -> ExclusionResult<ResolvedGateways>
where
    P: Fn(&ProductId) -> ExclusionResult<ExclusionSet>,
    C: Fn(&CategoryId) -> ExclusionResult<ExclusionSet>,
{
    let excluded = collect_exclusions(cart, product_lookup, category_lookup)?;
    let resolved = apply_exclusions(&excluded, candidates);

    debug!(
        lines = cart.len(),
        excluded = excluded.len(),
        removed = candidates.len() - resolved.len(),
        "Resolved checkout gateways"
    );

    Ok(resolved)
}

/// [`resolve`] against an [`ExclusionLookup`]
pub fn resolve_with_lookup<L>(
    cart: &Cart,
    lookup: &L,
    candidates: &CandidateGateways,
) -> ExclusionResult<ResolvedGateways>
where
    L: ExclusionLookup + ?Sized,
{
    resolve(
        cart,
        |product| lookup.product_exclusions(product),
        |category| lookup.category_exclusions(category),
        candidates,
    )
}

/// Outcome of one checkout evaluation
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Gateways offered before exclusion
    pub candidates: CandidateGateways,
    /// Union of all applicable exclusions
    pub excluded: ExclusionSet,
    /// Gateways left to show
    pub resolved: ResolvedGateways,
}

impl Evaluation {
    /// Candidate gateways that were hidden
    pub fn removed(&self) -> impl Iterator<Item = &PaymentMethodId> {
        self.candidates
            .ids()
            .filter(|id| !self.resolved.contains(id))
    }
}

/// Exclusion resolver bound to a rule store and a gateway source.
///
/// Holds no state of its own; clones share the same collaborators.
#[derive(Clone)]
pub struct ExclusionResolver {
    rules: BoxedRuleStore,
    gateways: BoxedGatewaySource,
}

impl ExclusionResolver {
    pub fn new(rules: BoxedRuleStore, gateways: BoxedGatewaySource) -> Self {
        Self { rules, gateways }
    }

    /// The rule store this resolver reads from
    pub fn rule_store(&self) -> &BoxedRuleStore {
        &self.rules
    }

    /// The gateway source this resolver reads from
    pub fn gateway_source(&self) -> &BoxedGatewaySource {
        &self.gateways
    }

    /// List candidates, fetch the cart's rules, and resolve.
    #[instrument(skip(self, cart), fields(lines = cart.len()))]
    pub async fn evaluate(&self, cart: &Cart) -> ExclusionResult<Evaluation> {
        let candidates = self.gateways.list_available_gateways().await?;
        let snapshot = self.rules.snapshot(cart).await?;

        let excluded = collect_exclusions(
            cart,
            |product| snapshot.product_exclusions(product),
            |category| snapshot.category_exclusions(category),
        )?;
        let resolved = apply_exclusions(&excluded, &candidates);

        debug!(
            candidates = candidates.len(),
            excluded = excluded.len(),
            resolved = resolved.len(),
            "Evaluated cart exclusions"
        );

        Ok(Evaluation {
            candidates,
            excluded,
            resolved,
        })
    }

    /// Gateways to offer for this cart
    pub async fn available_gateways(&self, cart: &Cart) -> ExclusionResult<ResolvedGateways> {
        Ok(self.evaluate(cart).await?.resolved)
    }
}
