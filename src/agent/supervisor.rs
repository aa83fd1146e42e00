//! Supervisor composition: a reasoning agent routing work among sub-agents.

use std::sync::Arc;

use crate::agent::AgentBuilder;
use crate::error::TrellisError;
use crate::graph::CompiledGraph;
use crate::model::ChatModel;
use crate::run::RunOptions;
use crate::subgraph::GraphCapability;

/// Builds a supervisor graph over N child agents.
///
/// Each child compiled graph is wrapped as a capability, so the supervisor's
/// action node dispatches to sub-agents exactly as it would to plain tools;
/// N-ary routing falls out of ordinary tool choice.
pub struct SupervisorBuilder {
    name: String,
    model: Arc<dyn ChatModel>,
    prompt: String,
    agents: Vec<Arc<CompiledGraph>>,
    child_options: RunOptions,
}

impl SupervisorBuilder {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            name: "supervisor".to_string(),
            model,
            prompt: String::new(),
            agents: Vec::new(),
            child_options: RunOptions::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Add a child agent. Its compiled name and description become the
    /// capability surfaced to the supervisor model.
    pub fn with_agent(mut self, agent: Arc<CompiledGraph>) -> Self {
        self.agents.push(agent);
        self
    }

    /// Options template for child runs (step ceiling, cancellation parent).
    pub fn with_child_options(mut self, options: RunOptions) -> Self {
        self.child_options = options;
        self
    }

    /// Assemble and compile the supervisor graph.
    pub fn build(self) -> Result<Arc<CompiledGraph>, TrellisError> {
        if self.agents.is_empty() {
            return Err(TrellisError::CompileValidation(
                "supervisor needs at least one agent".into(),
            ));
        }

        let mut builder = AgentBuilder::new(self.name, self.model)
            .with_description("Supervisor routing work among sub-agents")
            .with_system_prompt(self.prompt);

        for agent in self.agents {
            builder = builder.with_capability(Arc::new(GraphCapability::with_options(
                agent,
                self.child_options.clone(),
            )));
        }

        builder.build()
    }
}
