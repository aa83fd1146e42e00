//! Optional persistence boundary for run state.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::TrellisError;
use crate::run::RunId;
use crate::state::ConversationState;

/// Abstract checkpoint store. The engine saves the final state of a clean run;
/// callers may load it to seed a later run.
#[async_trait]
pub trait Checkpointer: Send + Sync {
    async fn save(&self, run_id: RunId, state: &ConversationState) -> Result<(), TrellisError>;

    async fn load(&self, run_id: RunId) -> Result<Option<ConversationState>, TrellisError>;
}

/// In-memory checkpoint store.
#[derive(Default)]
pub struct InMemoryCheckpointer {
    states: Mutex<HashMap<RunId, ConversationState>>,
}

impl InMemoryCheckpointer {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Checkpointer for InMemoryCheckpointer {
    async fn save(&self, run_id: RunId, state: &ConversationState) -> Result<(), TrellisError> {
        self.states.lock().await.insert(run_id, state.clone());
        Ok(())
    }

    async fn load(&self, run_id: RunId) -> Result<Option<ConversationState>, TrellisError> {
        Ok(self.states.lock().await.get(&run_id).cloned())
    }
}
