//! Node trait and the built-in reasoning and action nodes.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::capability::{CapabilityArguments, CapabilityRegistry};
use crate::error::TrellisError;
use crate::model::ChatModel;
use crate::run::events::RunEventEmitter;
use crate::run::RunEventPayload;
use crate::state::{ConversationState, StateDelta};
use crate::types::{Message, Role, ToolCall};

/// Context handed to a node for one step of execution.
pub struct NodeContext {
    cancel: CancellationToken,
    tool_concurrency: usize,
    pub(crate) emitter: Option<Arc<RunEventEmitter>>,
}

impl NodeContext {
    pub fn new(cancel: CancellationToken, tool_concurrency: usize) -> Self {
        Self {
            cancel,
            tool_concurrency: tool_concurrency.max(1),
            emitter: None,
        }
    }

    pub fn cancel(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn tool_concurrency(&self) -> usize {
        self.tool_concurrency
    }

    pub(crate) fn with_emitter(mut self, emitter: Arc<RunEventEmitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    fn emit(&self, payload: RunEventPayload) {
        if let Some(emitter) = &self.emitter {
            emitter.emit(payload);
        }
    }
}

impl Default for NodeContext {
    fn default() -> Self {
        Self::new(CancellationToken::new(), crate::config::DEFAULT_TOOL_CONCURRENCY)
    }
}

/// A unit of work: consumes the current state, produces a state delta.
///
/// Implementations must be stateless and re-entrant; all mutable data lives in
/// the conversation state owned by the run.
#[async_trait]
pub trait Node: Send + Sync {
    async fn run(
        &self,
        state: &ConversationState,
        ctx: &NodeContext,
    ) -> Result<StateDelta, TrellisError>;
}

/// Invokes the language model with the system prompt plus the full
/// conversation, appending exactly one assistant message.
///
/// Transient model failures surface as `ModelInvocation`; retry policy belongs
/// to the caller, not the node.
pub struct ReasoningNode {
    model: Arc<dyn ChatModel>,
    system_prompt: String,
    registry: Arc<CapabilityRegistry>,
}

impl ReasoningNode {
    pub fn new(
        model: Arc<dyn ChatModel>,
        system_prompt: impl Into<String>,
        registry: Arc<CapabilityRegistry>,
    ) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
            registry,
        }
    }
}

#[async_trait]
impl Node for ReasoningNode {
    async fn run(
        &self,
        state: &ConversationState,
        ctx: &NodeContext,
    ) -> Result<StateDelta, TrellisError> {
        let definitions = self.registry.definitions();
        debug!(
            model = self.model.model_id(),
            messages = state.len(),
            capabilities = definitions.len(),
            "reasoning node invoking model"
        );

        let reply = tokio::select! {
            _ = ctx.cancel().cancelled() => return Err(TrellisError::Canceled),
            reply = self.model.invoke(&self.system_prompt, state.messages(), &definitions) => reply?,
        };

        if reply.role != Role::Assistant {
            return Err(TrellisError::ModelInvocation(format!(
                "model returned a {} message instead of assistant",
                reply.role
            )));
        }

        ctx.emit(RunEventPayload::AssistantMessage {
            message: reply.clone(),
        });

        Ok(StateDelta::single(reply))
    }
}

/// Dispatches every pending tool call of the latest assistant message.
///
/// Guarantees: one tool message per call, in the original call order, each
/// carrying the matching `tool_call_id`. Resolution and execution failures
/// become error-carrying tool messages; they never abort the batch.
pub struct ActionNode {
    registry: Arc<CapabilityRegistry>,
}

impl ActionNode {
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        Self { registry }
    }

    async fn dispatch_one(&self, call: ToolCall, ctx: &NodeContext) -> Message {
        ctx.emit(RunEventPayload::ToolCallStarted { call: call.clone() });

        let outcome = match self.registry.resolve(&call.name) {
            Ok(capability) => {
                let args = CapabilityArguments::new(call.arguments.clone());
                capability.execute(&args).await
            }
            Err(err) => Err(err),
        };

        let (content, is_error) = match outcome {
            Ok(value) => (render_result(value), false),
            Err(err) => {
                warn!(tool = %call.name, error = %err, "tool call failed");
                (
                    serde_json::json!({ "error": err.to_string() }).to_string(),
                    true,
                )
            }
        };

        ctx.emit(RunEventPayload::ToolCallCompleted {
            call_id: call.id.clone(),
            is_error,
        });

        Message::tool_result(call.id, content)
    }
}

#[async_trait]
impl Node for ActionNode {
    async fn run(
        &self,
        state: &ConversationState,
        ctx: &NodeContext,
    ) -> Result<StateDelta, TrellisError> {
        let calls = match state.latest_assistant() {
            Some(message) => message.tool_calls.clone(),
            None => Vec::new(),
        };
        if calls.is_empty() {
            warn!("action node reached with no pending tool calls");
            return Ok(StateDelta::default());
        }

        debug!(calls = calls.len(), "action node dispatching batch");

        // `buffered` bounds concurrency while reassembling results in the
        // original call order.
        let batch = futures::stream::iter(
            calls.into_iter().map(|call| self.dispatch_one(call, ctx)),
        )
        .buffered(ctx.tool_concurrency())
        .collect::<Vec<Message>>();

        tokio::select! {
            _ = ctx.cancel().cancelled() => Err(TrellisError::Canceled),
            messages = batch => Ok(StateDelta::from_messages(messages)),
        }
    }
}

/// Render a capability result for the conversation: bare strings verbatim,
/// anything else as compact JSON.
fn render_result(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}
