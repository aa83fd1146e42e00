//! Capability trait and closure-based capability wrapper.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::CapabilityArguments;
use super::schema::CapabilityParameters;
use crate::error::TrellisError;

/// Core capability trait; implement to offer a unit of work to the model.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Capability name (must match what the model calls).
    fn name(&self) -> &str;

    /// Human-readable description surfaced to the model.
    fn description(&self) -> &str;

    /// JSON Schema for the expected arguments.
    fn parameters(&self) -> &CapabilityParameters;

    /// Execute with parsed arguments.
    async fn execute(&self, args: &CapabilityArguments) -> Result<serde_json::Value, TrellisError>;
}

impl std::fmt::Debug for dyn Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

/// Type alias for the capability handler function.
type CapabilityHandler = dyn Fn(
        CapabilityArguments,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, TrellisError>> + Send>>
    + Send
    + Sync;

/// Closure-based capability for quick construction.
///
/// This is the single adapter boundary that turns an arbitrary async function
/// plus a declared parameter shape into a uniform capability.
pub struct FnCapability {
    name: String,
    description: String,
    parameters: CapabilityParameters,
    handler: Arc<CapabilityHandler>,
}

impl FnCapability {
    /// Create a capability from a closure.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: CapabilityParameters,
        handler: F,
    ) -> Self
    where
        F: Fn(CapabilityArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<serde_json::Value, TrellisError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler: Arc::new(move |args| Box::pin(handler(args))),
        }
    }
}

#[async_trait]
impl Capability for FnCapability {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &CapabilityParameters {
        &self.parameters
    }

    async fn execute(&self, args: &CapabilityArguments) -> Result<serde_json::Value, TrellisError> {
        (self.handler)(args.clone()).await
    }
}

impl std::fmt::Debug for FnCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCapability")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}
