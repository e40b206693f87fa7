//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the exclusion resolver, the rule catalog, and configuration.

use exclude_core::{
    BoxedGatewaySource, BoxedRuleStore, CategoryId, ExclusionResolver, GatewayCatalog,
    InMemoryRuleStore, ProductId, RuleCatalog, StaticGatewaySource,
};
use serde::de::DeserializeOwned;
use std::net::SocketAddr;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Explicit path to the exclusion rules file
    pub exclusions_path: Option<String>,
    /// Explicit path to the gateway list file
    pub gateways_path: Option<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            exclusions_path: std::env::var("EXCLUSIONS_PATH").ok(),
            gateways_path: std::env::var("GATEWAYS_PATH").ok(),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Exclusion resolver (owns the rule store and gateway source)
    pub resolver: ExclusionResolver,
    /// Seed catalog, used for product → category lookups
    pub catalog: Arc<RuleCatalog>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState from config files and environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let catalog: RuleCatalog =
            load_toml(config.exclusions_path.as_deref(), "exclusions.toml")?;
        let gateways: GatewayCatalog = load_toml(config.gateways_path.as_deref(), "gateways.toml")?;

        tracing::info!(
            "Loaded {} product rules, {} category rules, {} gateways",
            catalog.products.len(),
            catalog.categories.len(),
            gateways.gateways.len()
        );

        let store = InMemoryRuleStore::from_catalog(&catalog);
        let source = StaticGatewaySource::new(gateways.gateways);

        Ok(Self::from_parts(
            config,
            Arc::new(store),
            Arc::new(source),
            catalog,
        ))
    }

    /// Assemble state from explicit collaborators
    pub fn from_parts(
        config: AppConfig,
        rules: BoxedRuleStore,
        gateways: BoxedGatewaySource,
        catalog: RuleCatalog,
    ) -> Self {
        Self {
            resolver: ExclusionResolver::new(rules, gateways),
            catalog: Arc::new(catalog),
            config,
        }
    }

    /// The rule store behind the resolver
    pub fn rules(&self) -> &BoxedRuleStore {
        self.resolver.rule_store()
    }

    /// Categories known for a product, used when a cart line omits them
    pub fn categories_of(&self, product: &ProductId) -> Vec<CategoryId> {
        self.catalog.categories_of(product).to_vec()
    }
}

/// Load a TOML config file.
///
/// An explicit path must exist. Otherwise `config/<file_name>` is searched
/// relative to the working directory and its parents, falling back to an
/// empty default.
fn load_toml<T>(explicit_path: Option<&str>, file_name: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned + Default,
{
    if let Some(path) = explicit_path {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
        let parsed = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
        tracing::info!("Loaded {}", path);
        return Ok(parsed);
    }

    let config_paths = [
        format!("config/{}", file_name),
        format!("../config/{}", file_name),
        format!("../../config/{}", file_name),
    ];

    for path in &config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let parsed = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {}", path);
            return Ok(parsed);
        }
    }

    tracing::warn!("No {} found, using empty defaults", file_name);
    Ok(T::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        // Clear env vars for test
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");
        std::env::remove_var("EXCLUSIONS_PATH");

        let config = AppConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.exclusions_path.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
            exclusions_path: None,
            gateways_path: None,
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");

        let bad = AppConfig {
            host: "not a host".to_string(),
            ..config
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let result: anyhow::Result<RuleCatalog> =
            load_toml(Some("/nonexistent/exclusions.toml"), "exclusions.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_path_is_parsed() {
        let path = std::env::temp_dir().join(format!("gateways-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[[gateways]]\nid = \"cod\"\ntitle = \"Cash on Delivery\"\n",
        )
        .unwrap();

        let catalog: GatewayCatalog = load_toml(path.to_str(), "gateways.toml").unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(catalog.gateways.len(), 1);
    }
}
