//! Immutable executable graph and its run loop.

use std::collections::HashMap;
use std::sync::Arc;

use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

use super::builder::END;
use super::node::{Node, NodeContext};
use super::router::{Route, Router};
use crate::error::TrellisError;
use crate::run::events::RunEventEmitter;
use crate::run::{RunEvent, RunEventPayload, RunLifecycle, RunOptions};
use crate::state::ConversationState;

/// An edge out of a node.
pub enum Edge {
    /// Unconditional transition; the target may be [`END`].
    Static(String),
    /// Router-selected transition over a declared target set.
    Conditional(ConditionalEdge),
}

/// A conditional edge: routing function plus its declared possible targets.
pub struct ConditionalEdge {
    pub router: Arc<dyn Router>,
    pub targets: Vec<String>,
}

/// The immutable, validated, executable form of a graph definition.
///
/// Thread-safe for concurrent independent executions: all mutable data is
/// scoped to the per-run [`ConversationState`].
pub struct CompiledGraph {
    name: String,
    description: String,
    entry: String,
    nodes: HashMap<String, Arc<dyn Node>>,
    edges: HashMap<String, Edge>,
}

impl std::fmt::Debug for CompiledGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledGraph")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("entry", &self.entry)
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("edges", &self.edges.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CompiledGraph {
    pub(crate) fn new(
        name: String,
        description: String,
        entry: String,
        nodes: HashMap<String, Arc<dyn Node>>,
        edges: HashMap<String, Edge>,
    ) -> Self {
        Self {
            name,
            description,
            entry,
            nodes,
            edges,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Run to termination, returning the final conversation state.
    pub async fn run(
        &self,
        state: ConversationState,
        options: RunOptions,
    ) -> Result<ConversationState, TrellisError> {
        let emitter = Arc::new(RunEventEmitter::new(
            options.run_id,
            options.event_sink.clone(),
        ));
        emitter.emit(RunEventPayload::Lifecycle {
            state: RunLifecycle::Started,
        });

        let result = self.run_inner(state, &options, &emitter).await;

        let lifecycle = match &result {
            Ok(_) => RunLifecycle::Completed,
            Err(TrellisError::Canceled) => RunLifecycle::Canceled,
            Err(err) => RunLifecycle::Failed {
                error: err.to_string(),
            },
        };
        emitter.emit(RunEventPayload::Lifecycle { state: lifecycle });

        result
    }

    async fn run_inner(
        &self,
        mut state: ConversationState,
        options: &RunOptions,
        emitter: &Arc<RunEventEmitter>,
    ) -> Result<ConversationState, TrellisError> {
        let mut current = self.entry.clone();
        let mut step = 0usize;

        loop {
            if options.cancel.is_cancelled() {
                return Err(TrellisError::Canceled);
            }

            step += 1;
            if step > options.max_steps {
                return Err(TrellisError::StepLimitExceeded {
                    limit: options.max_steps,
                    state: Box::new(state),
                });
            }

            let node = self.nodes.get(&current).ok_or_else(|| {
                TrellisError::InvalidState(format!("node '{current}' vanished after compile"))
            })?;

            debug!(graph = %self.name, node = %current, step, "entering node");
            emitter.emit(RunEventPayload::NodeStarted {
                node: current.clone(),
                step,
            });

            let ctx = NodeContext::new(options.cancel.clone(), options.tool_concurrency)
                .with_emitter(emitter.clone());
            let delta = node.run(&state, &ctx).await?;

            emitter.emit(RunEventPayload::NodeFinished {
                node: current.clone(),
                step,
                messages_appended: delta.messages.len(),
            });
            state.apply(delta);

            match self.edges.get(&current) {
                Some(Edge::Static(to)) if to == END => break,
                Some(Edge::Static(to)) => current = to.clone(),
                Some(Edge::Conditional(conditional)) => {
                    let latest = state.latest().ok_or_else(|| {
                        TrellisError::InvalidState(
                            "conditional edge evaluated on an empty conversation".into(),
                        )
                    })?;
                    match conditional.router.route(latest) {
                        Route::End => {
                            if !conditional.targets.iter().any(|t| t == END) {
                                return Err(TrellisError::RoutingContractViolation {
                                    node: current,
                                    target: END.to_string(),
                                });
                            }
                            break;
                        }
                        Route::Node(target) => {
                            if !conditional.targets.contains(&target) {
                                return Err(TrellisError::RoutingContractViolation {
                                    node: current,
                                    target,
                                });
                            }
                            current = target;
                        }
                    }
                }
                None => {
                    return Err(TrellisError::InvalidState(format!(
                        "node '{current}' has no outgoing edge"
                    )));
                }
            }
        }

        if let Some(checkpointer) = &options.checkpointer {
            checkpointer.save(options.run_id, &state).await?;
        }

        debug!(graph = %self.name, steps = step, messages = state.len(), "run complete");
        Ok(state)
    }

    /// Run while streaming events. Returns the event stream and a handle
    /// resolving to the run result.
    pub fn stream(
        self: Arc<Self>,
        state: ConversationState,
        options: RunOptions,
    ) -> (
        UnboundedReceiverStream<RunEvent>,
        tokio::task::JoinHandle<Result<ConversationState, TrellisError>>,
    ) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let sink: crate::run::RunEventSink = Arc::new(move |event| {
            let _ = tx.send(event);
        });
        let options = options.with_event_sink(sink);

        let handle = tokio::spawn(async move { self.run(state, options).await });
        (UnboundedReceiverStream::new(rx), handle)
    }
}
