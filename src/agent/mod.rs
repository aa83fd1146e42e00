//! High-level agent assembly over the graph engine.

pub mod supervisor;

pub use supervisor::SupervisorBuilder;

use std::sync::Arc;

use crate::capability::{Capability, CapabilityRegistry};
use crate::graph::{ActionNode, CompiledGraph, GraphBuilder, ReasoningNode, ToolCondition, END};
use crate::model::ChatModel;

/// Name of the action node in generated agent graphs.
pub const ACTION_NODE: &str = "tools";

/// Builds the canonical single-agent graph: a reasoning node that either
/// terminates or hands its tool calls to an action node, which loops back.
pub struct AgentBuilder {
    name: String,
    description: String,
    model: Arc<dyn ChatModel>,
    system_prompt: String,
    capabilities: Vec<Arc<dyn Capability>>,
}

impl AgentBuilder {
    pub fn new(name: impl Into<String>, model: Arc<dyn ChatModel>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            model,
            system_prompt: String::new(),
            capabilities: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_capability(mut self, capability: Arc<dyn Capability>) -> Self {
        self.capabilities.push(capability);
        self
    }

    pub fn with_capabilities(mut self, capabilities: Vec<Arc<dyn Capability>>) -> Self {
        self.capabilities.extend(capabilities);
        self
    }

    /// Assemble and compile the agent graph.
    pub fn build(self) -> Result<Arc<CompiledGraph>, crate::error::TrellisError> {
        let has_capabilities = !self.capabilities.is_empty();
        let registry = Arc::new(CapabilityRegistry::from_capabilities(self.capabilities)?);

        let reason = Arc::new(ReasoningNode::new(
            self.model,
            self.system_prompt,
            registry.clone(),
        ));

        let reason_name = self.name.clone();
        let mut builder = GraphBuilder::new()
            .add_node(reason_name.as_str(), reason)
            .set_entry(reason_name.as_str())
            .with_description(self.description);

        if has_capabilities {
            builder = builder
                .add_node(ACTION_NODE, Arc::new(ActionNode::new(registry)))
                .add_conditional_edge(
                    reason_name.as_str(),
                    Arc::new(ToolCondition::new(ACTION_NODE)),
                    vec![ACTION_NODE.to_string(), END.to_string()],
                )
                .add_edge(ACTION_NODE, reason_name.as_str());
        } else {
            builder = builder.add_edge(reason_name.as_str(), END);
        }

        Ok(Arc::new(builder.compile(self.name)?))
    }
}
