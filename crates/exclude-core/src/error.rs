//! # Exclusion Error Types
//!
//! Typed error handling for the payment exclusion engine.
//!
//! The resolver itself has no error path. The only failures surfaced here
//! come from its collaborators: the rule store and the gateway source.

use crate::ids::{CategoryId, ProductId};
use crate::rules::RuleOwner;
use std::fmt;
use thiserror::Error;

/// Which collaborator lookup failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupSource {
    /// Per-product exclusion lookup
    Product(ProductId),
    /// Per-category exclusion lookup
    Category(CategoryId),
    /// Candidate gateway listing
    Gateways,
}

impl fmt::Display for LookupSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupSource::Product(id) => write!(f, "product {}", id),
            LookupSource::Category(id) => write!(f, "category {}", id),
            LookupSource::Gateways => write!(f, "available gateways"),
        }
    }
}

/// Core error type for exclusion lookups and rule writes
#[derive(Debug, Error)]
pub enum ExclusionError {
    /// The rule store or gateway source could not answer a read.
    /// "No rule configured" is never this; it is an empty set.
    #[error("Lookup failed for {target}: {message}")]
    LookupFailure {
        target: LookupSource,
        message: String,
    },

    /// The rule store rejected an administrative write
    #[error("Failed to store exclusions for {owner}: {message}")]
    WriteFailure { owner: RuleOwner, message: String },
}

impl ExclusionError {
    /// Build a lookup failure for a product rule read
    pub fn product_lookup(product: &ProductId, message: impl Into<String>) -> Self {
        ExclusionError::LookupFailure {
            target: LookupSource::Product(product.clone()),
            message: message.into(),
        }
    }

    /// Build a lookup failure for a category rule read
    pub fn category_lookup(category: &CategoryId, message: impl Into<String>) -> Self {
        ExclusionError::LookupFailure {
            target: LookupSource::Category(category.clone()),
            message: message.into(),
        }
    }

    /// Build a lookup failure for the gateway listing
    pub fn gateways_unavailable(message: impl Into<String>) -> Self {
        ExclusionError::LookupFailure {
            target: LookupSource::Gateways,
            message: message.into(),
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// Both kinds come from storage, so a later attempt may succeed. Retrying
    /// is the caller's decision; nothing in this crate retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExclusionError::LookupFailure { .. } | ExclusionError::WriteFailure { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ExclusionError::LookupFailure { .. } => 503,
            ExclusionError::WriteFailure { .. } => 503,
        }
    }
}

/// Result type alias for exclusion operations
pub type ExclusionResult<T> = Result<T, ExclusionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_failure_message() {
        let err = ExclusionError::product_lookup(&ProductId::from("p1"), "storage offline");
        assert_eq!(
            err.to_string(),
            "Lookup failed for product p1: storage offline"
        );

        let err = ExclusionError::gateways_unavailable("timeout");
        assert_eq!(err.to_string(), "Lookup failed for available gateways: timeout");
    }

    #[test]
    fn test_write_failure_message() {
        let err = ExclusionError::WriteFailure {
            owner: RuleOwner::Category(CategoryId::from("shoes")),
            message: "read-only".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to store exclusions for category shoes: read-only"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ExclusionError::category_lookup(&CategoryId::from("c1"), "down").status_code(),
            503
        );
        assert!(ExclusionError::gateways_unavailable("down").is_retryable());
    }
}
