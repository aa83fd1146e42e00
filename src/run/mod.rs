//! Run identity, options, and event stream types.

pub mod events;

pub use events::{RunEvent, RunEventPayload, RunEventSink, RunLifecycle};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::checkpoint::Checkpointer;
use crate::config::{DEFAULT_MAX_STEPS, DEFAULT_TOOL_CONCURRENCY};

/// Unique run identifier.
pub type RunId = Uuid;

/// Run lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
    Canceled,
}

/// Per-run execution options.
///
/// The step ceiling is a first-class value: set it low in tests to assert
/// termination deterministically.
#[derive(Clone)]
pub struct RunOptions {
    pub run_id: RunId,
    /// Maximum node transitions before the run fails with `StepLimitExceeded`.
    pub max_steps: usize,
    /// Bound on concurrent tool dispatch within one action step.
    pub tool_concurrency: usize,
    /// Observed between every node transition and inside tool batches.
    pub cancel: CancellationToken,
    /// Optional event sink for streaming observability.
    pub event_sink: Option<RunEventSink>,
    /// Optional persistence boundary; the final state is saved on clean
    /// termination. Absent means memory-only.
    pub checkpointer: Option<Arc<dyn Checkpointer>>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            max_steps: DEFAULT_MAX_STEPS,
            tool_concurrency: DEFAULT_TOOL_CONCURRENCY,
            cancel: CancellationToken::new(),
            event_sink: None,
            checkpointer: None,
        }
    }
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_tool_concurrency(mut self, width: usize) -> Self {
        self.tool_concurrency = width.max(1);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_event_sink(mut self, sink: RunEventSink) -> Self {
        self.event_sink = Some(sink);
        self
    }

    pub fn with_checkpointer(mut self, checkpointer: Arc<dyn Checkpointer>) -> Self {
        self.checkpointer = Some(checkpointer);
        self
    }
}

impl std::fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunOptions")
            .field("run_id", &self.run_id)
            .field("max_steps", &self.max_steps)
            .field("tool_concurrency", &self.tool_concurrency)
            .field("event_sink", &self.event_sink.as_ref().map(|_| ".."))
            .field("checkpointer", &self.checkpointer.as_ref().map(|_| ".."))
            .finish()
    }
}
