//! Convenience re-exports for common use.

pub use crate::agent::{AgentBuilder, SupervisorBuilder};
pub use crate::capability::{
    Capability, CapabilityArguments, CapabilityParameters, CapabilityRegistry, FnCapability,
};
pub use crate::checkpoint::{Checkpointer, InMemoryCheckpointer};
pub use crate::config::EngineConfig;
pub use crate::error::{Result, TrellisError};
pub use crate::graph::{
    ActionNode, CompiledGraph, FnRouter, GraphBuilder, Node, NodeContext, ReasoningNode, Route,
    Router, ToolCondition, END,
};
pub use crate::model::{ChatModel, OpenAiCompatModel, ScriptedModel};
pub use crate::run::{RunEvent, RunEventPayload, RunLifecycle, RunOptions};
pub use crate::state::{ConversationState, StateDelta};
pub use crate::subgraph::GraphCapability;
pub use crate::types::{Message, Role, ToolCall};
