//! # payment-exclude
//!
//! Hides payment methods at checkout based on per-product and per-category
//! exclusion rules.
//!
//! ## Usage
//!
//! ```bash
//! # Optional: point at config files explicitly
//! export EXCLUSIONS_PATH=config/exclusions.toml
//! export GATEWAYS_PATH=config/gateways.toml
//!
//! # Run the server
//! payment-exclude
//! ```

use exclude_api::{routes, state::AppState};
use exclude_core::GatewaySource;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    let gateways = state
        .resolver
        .gateway_source()
        .list_available_gateways()
        .await?;

    info!("Environment: {}", state.config.environment);
    info!(
        "Payment gateways: {:?}",
        gateways.ids().map(|id| id.as_str()).collect::<Vec<_>>()
    );

    let app = routes::create_router(state);

    info!("payment-exclude starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Checkout: POST http://{}/api/v1/checkout/gateways", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  payment-exclude
  ━━━━━━━━━━━━━━━━━━━━━━━
  Checkout gateway exclusions
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
