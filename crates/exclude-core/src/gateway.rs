//! # Gateway Types
//!
//! Candidate payment gateways offered at checkout.
//! Gateways are loaded from `config/gateways.toml`.

use crate::ids::PaymentMethodId;
use serde::{Deserialize, Serialize};

/// Display descriptor for a payment gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayDescriptor {
    /// Title shown to the customer (e.g., "Cash on Delivery")
    pub title: String,

    /// Optional longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GatewayDescriptor {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A gateway and its descriptor, as serialized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayEntry {
    pub id: PaymentMethodId,

    #[serde(flatten)]
    pub descriptor: GatewayDescriptor,
}

/// Insertion-ordered map from payment method to descriptor.
///
/// Serializes as an array of `{id, title, description}` entries so the
/// platform's display order survives a round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<GatewayEntry>", into = "Vec<GatewayEntry>")]
pub struct GatewayMap {
    entries: Vec<GatewayEntry>,
}

/// Gateways available before exclusion is applied
pub type CandidateGateways = GatewayMap;

/// Gateways left after exclusion is applied
pub type ResolvedGateways = GatewayMap;

impl GatewayMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a gateway. An existing id keeps its position and gets the new
    /// descriptor; the old one is returned.
    pub fn insert(
        &mut self,
        id: impl Into<PaymentMethodId>,
        descriptor: GatewayDescriptor,
    ) -> Option<GatewayDescriptor> {
        let id = id.into();
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => Some(std::mem::replace(&mut entry.descriptor, descriptor)),
            None => {
                self.entries.push(GatewayEntry { id, descriptor });
                None
            }
        }
    }

    /// Builder: insert a gateway
    pub fn with_gateway(
        mut self,
        id: impl Into<PaymentMethodId>,
        descriptor: GatewayDescriptor,
    ) -> Self {
        self.insert(id, descriptor);
        self
    }

    /// Get a gateway descriptor by ID
    pub fn get(&self, id: &PaymentMethodId) -> Option<&GatewayDescriptor> {
        self.entries
            .iter()
            .find(|e| &e.id == id)
            .map(|e| &e.descriptor)
    }

    /// Check if a gateway is present
    pub fn contains(&self, id: &PaymentMethodId) -> bool {
        self.get(id).is_some()
    }

    /// Gateway IDs in order
    pub fn ids(&self) -> impl Iterator<Item = &PaymentMethodId> {
        self.entries.iter().map(|e| &e.id)
    }

    /// Gateways in order
    pub fn iter(&self) -> impl Iterator<Item = (&PaymentMethodId, &GatewayDescriptor)> {
        self.entries.iter().map(|e| (&e.id, &e.descriptor))
    }

    /// Copy of this map keeping only gateways for which `keep` is true
    pub fn filtered(&self, mut keep: impl FnMut(&PaymentMethodId) -> bool) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| keep(&e.id))
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<GatewayEntry>> for GatewayMap {
    fn from(entries: Vec<GatewayEntry>) -> Self {
        let mut map = GatewayMap::new();
        for entry in entries {
            map.insert(entry.id, entry.descriptor);
        }
        map
    }
}

impl From<GatewayMap> for Vec<GatewayEntry> {
    fn from(map: GatewayMap) -> Self {
        map.entries
    }
}

impl<I: Into<PaymentMethodId>> FromIterator<(I, GatewayDescriptor)> for GatewayMap {
    fn from_iter<T: IntoIterator<Item = (I, GatewayDescriptor)>>(iter: T) -> Self {
        let mut map = GatewayMap::new();
        for (id, descriptor) in iter {
            map.insert(id, descriptor);
        }
        map
    }
}

/// Gateway list loaded from config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayCatalog {
    #[serde(default)]
    pub gateways: GatewayMap,
}

impl GatewayCatalog {
    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
