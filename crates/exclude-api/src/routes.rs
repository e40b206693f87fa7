//! # Routes
//!
//! Axum router configuration for the exclusion API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Admin:
///   - GET    /api/v1/gateways - Candidate gateways (unfiltered)
///   - GET    /api/v1/products/{product_id}/exclusions
///   - PUT    /api/v1/products/{product_id}/exclusions - Replace
///   - DELETE /api/v1/products/{product_id}/exclusions - Product deleted
///   - GET    /api/v1/categories/{category_id}/exclusions
///   - PUT    /api/v1/categories/{category_id}/exclusions - Replace
///   - DELETE /api/v1/categories/{category_id}/exclusions - Category deleted
///
/// - Checkout:
///   - POST /api/v1/checkout/gateways - Gateways to offer for a cart
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin_routes = Router::new()
        .route("/gateways", get(handlers::list_gateways))
        .route(
            "/products/{product_id}/exclusions",
            get(handlers::get_product_exclusions)
                .put(handlers::save_product_exclusions)
                .delete(handlers::delete_product_exclusions),
        )
        .route(
            "/categories/{category_id}/exclusions",
            get(handlers::get_category_exclusions)
                .put(handlers::save_category_exclusions)
                .delete(handlers::delete_category_exclusions),
        );

    let checkout_routes =
        Router::new().route("/gateways", post(handlers::resolve_checkout_gateways));

    let api_routes = Router::new()
        .merge(admin_routes)
        .nest("/checkout", checkout_routes);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}
