//! # exclude-api
//!
//! HTTP API layer for payment-exclude-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Admin endpoints for per-product and per-category exclusion rules
//! - The checkout endpoint that filters gateways for a cart
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/gateways` | Candidate gateways |
//! | GET/PUT/DELETE | `/api/v1/products/{id}/exclusions` | Product exclusions |
//! | GET/PUT/DELETE | `/api/v1/categories/{id}/exclusions` | Category exclusions |
//! | POST | `/api/v1/checkout/gateways` | Gateways to offer for a cart |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
