//! Graph definition, compilation, and execution.

pub mod builder;
pub mod compiled;
pub mod node;
pub mod router;

pub use builder::{GraphBuilder, END};
pub use compiled::CompiledGraph;
pub use node::{ActionNode, Node, NodeContext, ReasoningNode};
pub use router::{FnRouter, Route, Router, ToolCondition};
