//! Routing: pure decisions over the latest produced message.

use std::sync::Arc;

use crate::types::Message;

/// Outcome of a routing decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Transition to the named node.
    Node(String),
    /// Terminate the run.
    End,
}

/// Pure decision function inspected after a node with a conditional edge runs.
///
/// Routers must be total over their compile-time declared target set; an
/// undeclared target at runtime is a `RoutingContractViolation`.
pub trait Router: Send + Sync {
    fn route(&self, latest: &Message) -> Route;
}

/// Closure-based router.
pub struct FnRouter {
    inner: Arc<dyn Fn(&Message) -> Route + Send + Sync>,
}

impl FnRouter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Message) -> Route + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }
}

impl Router for FnRouter {
    fn route(&self, latest: &Message) -> Route {
        (self.inner)(latest)
    }
}

/// Built-in tool-call-conditioned routing: a non-empty `tool_calls` list goes
/// to the action node, anything else terminates.
pub struct ToolCondition {
    action_node: String,
}

impl ToolCondition {
    pub fn new(action_node: impl Into<String>) -> Self {
        Self {
            action_node: action_node.into(),
        }
    }
}

impl Router for ToolCondition {
    fn route(&self, latest: &Message) -> Route {
        if latest.has_tool_calls() {
            Route::Node(self.action_node.clone())
        } else {
            Route::End
        }
    }
}
