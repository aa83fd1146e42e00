//! Capability registry: name-unique, registration-ordered.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::capability::Capability;
use crate::error::TrellisError;

/// The capability shape surfaced to the model as part of the available-tools
/// list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Normalizes heterogeneous callables into a uniform dispatchable set.
///
/// Registration order is preserved: `definitions()` is surfaced verbatim to
/// the model, and tool-choice determinism in tests depends on that order
/// being stable.
#[derive(Default)]
pub struct CapabilityRegistry {
    entries: Vec<Arc<dyn Capability>>,
}

impl CapabilityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability. Fails with `DuplicateCapability` if the name is
    /// already taken; never silently overwrites.
    pub fn register(&mut self, capability: Arc<dyn Capability>) -> Result<(), TrellisError> {
        if self.entries.iter().any(|c| c.name() == capability.name()) {
            return Err(TrellisError::DuplicateCapability(
                capability.name().to_string(),
            ));
        }
        self.entries.push(capability);
        Ok(())
    }

    /// Resolve a capability by name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Capability>, TrellisError> {
        self.entries
            .iter()
            .find(|c| c.name() == name)
            .cloned()
            .ok_or_else(|| TrellisError::UnknownCapability(name.to_string()))
    }

    /// Definitions in registration order, as sent to the model.
    pub fn definitions(&self) -> Vec<CapabilityDefinition> {
        self.entries
            .iter()
            .map(|c| CapabilityDefinition {
                name: c.name().to_string(),
                description: c.description().to_string(),
                parameters: c.parameters().schema.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field(
                "entries",
                &self.entries.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl CapabilityRegistry {
    /// Build a registry from a list of capabilities.
    pub fn from_capabilities(
        capabilities: Vec<Arc<dyn Capability>>,
    ) -> Result<Self, TrellisError> {
        let mut registry = Self::new();
        for capability in capabilities {
            registry.register(capability)?;
        }
        Ok(registry)
    }
}
