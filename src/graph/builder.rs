//! Mutable graph definition and compile-time validation.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use super::compiled::{CompiledGraph, ConditionalEdge, Edge};
use super::node::Node;
use super::router::Router;
use crate::error::TrellisError;

/// Terminal sentinel usable as an edge target.
pub const END: &str = "__end__";

/// Mutable builder for a graph: register nodes and edges, designate an entry,
/// then [`compile`](GraphBuilder::compile) into an immutable executable form.
#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<(String, Arc<dyn Node>)>,
    edges: HashMap<String, Edge>,
    entry: Option<String>,
    description: String,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node under a unique name.
    pub fn add_node(mut self, name: impl Into<String>, node: Arc<dyn Node>) -> Self {
        self.nodes.push((name.into(), node));
        self
    }

    /// Register a static (unconditional) edge. The target may be [`END`].
    pub fn add_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edges.insert(from.into(), Edge::Static(to.into()));
        self
    }

    /// Register a conditional edge: after `from` runs, `router` selects the
    /// next node from `targets` (which may include [`END`]).
    pub fn add_conditional_edge(
        mut self,
        from: impl Into<String>,
        router: Arc<dyn Router>,
        targets: Vec<String>,
    ) -> Self {
        self.edges.insert(
            from.into(),
            Edge::Conditional(ConditionalEdge { router, targets }),
        );
        self
    }

    /// Designate the entry node.
    pub fn set_entry(mut self, name: impl Into<String>) -> Self {
        self.entry = Some(name.into());
        self
    }

    /// Attach a description (surfaced when the graph is wrapped as a
    /// capability).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Validate and produce the immutable executable graph.
    pub fn compile(self, name: impl Into<String>) -> Result<CompiledGraph, TrellisError> {
        let name = name.into();

        let mut nodes: HashMap<String, Arc<dyn Node>> = HashMap::new();
        for (node_name, node) in self.nodes {
            if node_name == END {
                return Err(TrellisError::CompileValidation(format!(
                    "node name '{END}' is reserved"
                )));
            }
            if nodes.insert(node_name.clone(), node).is_some() {
                return Err(TrellisError::CompileValidation(format!(
                    "duplicate node '{node_name}'"
                )));
            }
        }

        let entry = self.entry.ok_or_else(|| {
            TrellisError::CompileValidation("no entry node designated".into())
        })?;
        if !nodes.contains_key(&entry) {
            return Err(TrellisError::CompileValidation(format!(
                "entry node '{entry}' is not registered"
            )));
        }

        for (from, edge) in &self.edges {
            if !nodes.contains_key(from) {
                return Err(TrellisError::CompileValidation(format!(
                    "edge source '{from}' is not a registered node"
                )));
            }
            match edge {
                Edge::Static(to) => {
                    if to != END && !nodes.contains_key(to) {
                        return Err(TrellisError::CompileValidation(format!(
                            "edge target '{to}' is not a registered node"
                        )));
                    }
                }
                Edge::Conditional(conditional) => {
                    if conditional.targets.is_empty() {
                        return Err(TrellisError::CompileValidation(format!(
                            "conditional edge from '{from}' declares no targets"
                        )));
                    }
                    for target in &conditional.targets {
                        if target != END && !nodes.contains_key(target) {
                            return Err(TrellisError::CompileValidation(format!(
                                "conditional target '{target}' is not a registered node"
                            )));
                        }
                    }
                }
            }
        }

        for node_name in nodes.keys() {
            if !self.edges.contains_key(node_name) {
                return Err(TrellisError::CompileValidation(format!(
                    "node '{node_name}' has no outgoing edge"
                )));
            }
        }

        // Approximate reachability: walk declared targets only; the terminal
        // sentinel must be reachable from the entry.
        if !terminal_reachable(&entry, &self.edges) {
            return Err(TrellisError::CompileValidation(format!(
                "no declared path from entry '{entry}' reaches termination"
            )));
        }

        Ok(CompiledGraph::new(
            name,
            self.description,
            entry,
            nodes,
            self.edges,
        ))
    }
}

fn terminal_reachable(entry: &str, edges: &HashMap<String, Edge>) -> bool {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    queue.push_back(entry);

    while let Some(current) = queue.pop_front() {
        if current == END {
            return true;
        }
        if !seen.insert(current) {
            continue;
        }
        match edges.get(current) {
            Some(Edge::Static(to)) => queue.push_back(to.as_str()),
            Some(Edge::Conditional(conditional)) => {
                for target in &conditional.targets {
                    queue.push_back(target.as_str());
                }
            }
            None => {}
        }
    }
    false
}
