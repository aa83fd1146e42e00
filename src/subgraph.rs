//! Compiled graphs as capabilities.
//!
//! Wrapping a whole graph behind the [`Capability`] trait is what lets a
//! supervisor delegate an entire turn to a sub-agent through the same
//! dispatch path as any plain tool.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::capability::{Capability, CapabilityArguments, CapabilityParameters};
use crate::error::TrellisError;
use crate::graph::CompiledGraph;
use crate::run::RunOptions;
use crate::state::ConversationState;
use crate::types::Message;

/// Exposes a [`CompiledGraph`] as a capability under the graph's own name and
/// description.
///
/// Each invocation runs the child graph against a fresh, isolated
/// conversation seeded from the `input` argument; only the final assistant
/// content crosses back. Child failures surface as capability execution
/// failures.
pub struct GraphCapability {
    graph: Arc<CompiledGraph>,
    parameters: CapabilityParameters,
    /// Template for per-invocation run options (step ceiling, concurrency,
    /// cancellation parent).
    options: RunOptions,
}

impl GraphCapability {
    pub fn new(graph: Arc<CompiledGraph>) -> Self {
        Self::with_options(graph, RunOptions::default())
    }

    pub fn with_options(graph: Arc<CompiledGraph>, options: RunOptions) -> Self {
        Self {
            graph,
            parameters: CapabilityParameters::object()
                .string("input", "The task or question to hand to this agent", true)
                .build(),
            options,
        }
    }

    fn child_options(&self) -> RunOptions {
        let mut options = self.options.clone();
        options.run_id = uuid::Uuid::new_v4();
        // Child runs are canceled when the parent run is.
        options.cancel = self.options.cancel.child_token();
        options
    }
}

#[async_trait]
impl Capability for GraphCapability {
    fn name(&self) -> &str {
        self.graph.name()
    }

    fn description(&self) -> &str {
        self.graph.description()
    }

    fn parameters(&self) -> &CapabilityParameters {
        &self.parameters
    }

    async fn execute(&self, args: &CapabilityArguments) -> Result<serde_json::Value, TrellisError> {
        let input = args.get_str("input")?;
        debug!(agent = self.graph.name(), "delegating turn to subgraph");

        let seed = ConversationState::from_messages(vec![Message::user(input)]);
        let final_state = self
            .graph
            .run(seed, self.child_options())
            .await
            .map_err(|err| TrellisError::capability(self.graph.name(), err.to_string()))?;

        let answer = final_state
            .latest_assistant()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        Ok(serde_json::Value::String(answer))
    }
}
