//! Conversation state: the ordered message record driving one run.

use serde::{Deserialize, Serialize};

use crate::types::{Message, Role};

/// Ordered, append-only record of the dialogue exchanged so far.
///
/// Created at the start of a run (optionally seeded with prior history),
/// mutated only by nodes returning [`StateDelta`]s, discarded or checkpointed
/// at termination.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConversationState {
    messages: Vec<Message>,
}

impl ConversationState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a state from prior history.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Append a single message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Merge a node's delta. Appends in the delta's own order; no
    /// deduplication, no reordering.
    pub fn apply(&mut self, delta: StateDelta) {
        self.messages.extend(delta.messages);
    }

    /// All messages in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The most recent message, if any.
    pub fn latest(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The most recent assistant message, if any.
    pub fn latest_assistant(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl From<Vec<Message>> for ConversationState {
    fn from(messages: Vec<Message>) -> Self {
        Self::from_messages(messages)
    }
}

/// The unit of state change a node produces: messages to append.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateDelta {
    pub messages: Vec<Message>,
}

impl StateDelta {
    /// Delta carrying a single message.
    pub fn single(message: Message) -> Self {
        Self {
            messages: vec![message],
        }
    }

    /// Delta carrying several messages in order.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}
