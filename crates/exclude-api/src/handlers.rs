//! # Request Handlers
//!
//! Axum request handlers for the exclusion API.
//! Administrative reads/writes of exclusion rules, plus the checkout
//! boundary that returns the gateways to offer for a cart.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use exclude_core::{
    CandidateGateways, Cart, CartLine, CategoryId, ExclusionError, ExclusionSet, GatewaySource,
    PaymentMethodId, ProductId, ResolvedGateways, RuleOwner, RuleStore,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use uuid::Uuid;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Save exclusions request. A missing `excluded` field clears the rule.
#[derive(Debug, Default, Deserialize)]
pub struct SaveExclusionsRequest {
    #[serde(default)]
    pub excluded: ExclusionSet,
}

/// Exclusions for one owner
#[derive(Debug, Serialize, Deserialize)]
pub struct ExclusionsResponse {
    pub owner: RuleOwner,
    pub excluded: ExclusionSet,
}

/// Resolve checkout gateways request
#[derive(Debug, Deserialize)]
pub struct CheckoutGatewaysRequest {
    /// Items in the cart
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
}

/// Item in checkout request
#[derive(Debug, Deserialize)]
pub struct CheckoutItem {
    /// Product ID
    pub product_id: ProductId,
    /// Product categories. When absent, taken from the rule catalog.
    #[serde(default)]
    pub categories: Option<Vec<CategoryId>>,
}

/// Resolve checkout gateways response
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutGatewaysResponse {
    /// Correlates this evaluation with server logs
    pub evaluation_id: String,
    /// Gateways to offer, in platform order
    pub gateways: ResolvedGateways,
    /// Union of all exclusions that applied to the cart
    pub excluded: ExclusionSet,
    /// Candidate gateways that were hidden
    pub removed: Vec<PaymentMethodId>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn exclusion_error_to_response(err: ExclusionError) -> ApiError {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);
    if err.is_retryable() {
        response = response.with_details("retryable");
    }
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "payment-exclude",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// List candidate gateways, unfiltered (options for the admin multi-select)
pub async fn list_gateways(
    State(state): State<AppState>,
) -> Result<Json<CandidateGateways>, ApiError> {
    let gateways = state
        .resolver
        .gateway_source()
        .list_available_gateways()
        .await
        .map_err(|e| {
            error!("Failed to list gateways: {}", e);
            exclusion_error_to_response(e)
        })?;

    Ok(Json(gateways))
}

/// Get a product's exclusions
#[instrument(skip(state))]
pub async fn get_product_exclusions(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<ExclusionsResponse>, ApiError> {
    let excluded = state
        .rules()
        .product_exclusions(&product_id)
        .await
        .map_err(exclusion_error_to_response)?;

    Ok(Json(ExclusionsResponse {
        owner: RuleOwner::Product(product_id),
        excluded,
    }))
}

/// Replace a product's exclusions
#[instrument(skip(state, request), fields(count = request.excluded.len()))]
pub async fn save_product_exclusions(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(request): Json<SaveExclusionsRequest>,
) -> Result<Json<ExclusionsResponse>, ApiError> {
    let rules = state.rules();
    rules
        .set_product_exclusions(&product_id, request.excluded)
        .await
        .map_err(|e| {
            error!("Failed to save product exclusions: {}", e);
            exclusion_error_to_response(e)
        })?;

    // Echo what a subsequent read returns
    let excluded = rules
        .product_exclusions(&product_id)
        .await
        .map_err(exclusion_error_to_response)?;

    Ok(Json(ExclusionsResponse {
        owner: RuleOwner::Product(product_id),
        excluded,
    }))
}

/// Delete a product's exclusions (product deleted upstream)
#[instrument(skip(state))]
pub async fn delete_product_exclusions(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<StatusCode, ApiError> {
    state
        .rules()
        .remove_product(&product_id)
        .await
        .map_err(exclusion_error_to_response)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Get a category's exclusions
#[instrument(skip(state))]
pub async fn get_category_exclusions(
    State(state): State<AppState>,
    Path(category_id): Path<CategoryId>,
) -> Result<Json<ExclusionsResponse>, ApiError> {
    let excluded = state
        .rules()
        .category_exclusions(&category_id)
        .await
        .map_err(exclusion_error_to_response)?;

    Ok(Json(ExclusionsResponse {
        owner: RuleOwner::Category(category_id),
        excluded,
    }))
}

/// Replace a category's exclusions
#[instrument(skip(state, request), fields(count = request.excluded.len()))]
pub async fn save_category_exclusions(
    State(state): State<AppState>,
    Path(category_id): Path<CategoryId>,
    Json(request): Json<SaveExclusionsRequest>,
) -> Result<Json<ExclusionsResponse>, ApiError> {
    let rules = state.rules();
    rules
        .set_category_exclusions(&category_id, request.excluded)
        .await
        .map_err(|e| {
            error!("Failed to save category exclusions: {}", e);
            exclusion_error_to_response(e)
        })?;

    let excluded = rules
        .category_exclusions(&category_id)
        .await
        .map_err(exclusion_error_to_response)?;

    Ok(Json(ExclusionsResponse {
        owner: RuleOwner::Category(category_id),
        excluded,
    }))
}

/// Delete a category's exclusions (category deleted upstream)
#[instrument(skip(state))]
pub async fn delete_category_exclusions(
    State(state): State<AppState>,
    Path(category_id): Path<CategoryId>,
) -> Result<StatusCode, ApiError> {
    state
        .rules()
        .remove_category(&category_id)
        .await
        .map_err(exclusion_error_to_response)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Resolve the gateways to offer at checkout for a cart
#[instrument(skip(state, request), fields(items = request.items.len()))]
pub async fn resolve_checkout_gateways(
    State(state): State<AppState>,
    Json(request): Json<CheckoutGatewaysRequest>,
) -> Result<Json<CheckoutGatewaysResponse>, ApiError> {
    let evaluation_id = Uuid::new_v4().to_string();

    let cart: Cart = request
        .items
        .into_iter()
        .map(|item| {
            let categories = item
                .categories
                .unwrap_or_else(|| state.categories_of(&item.product_id));
            CartLine::new(item.product_id).with_categories(categories)
        })
        .collect();

    let evaluation = state.resolver.evaluate(&cart).await.map_err(|e| {
        error!(%evaluation_id, "Exclusion evaluation failed: {}", e);
        exclusion_error_to_response(e)
    })?;

    let removed: Vec<PaymentMethodId> = evaluation.removed().cloned().collect();

    info!(
        %evaluation_id,
        lines = cart.len(),
        offered = evaluation.resolved.len(),
        removed = removed.len(),
        "Resolved checkout gateways"
    );

    Ok(Json(CheckoutGatewaysResponse {
        evaluation_id,
        gateways: evaluation.resolved,
        excluded: evaluation.excluded,
        removed,
    }))
}
