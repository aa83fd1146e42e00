//! Scripted model for deterministic tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::ChatModel;
use crate::capability::CapabilityDefinition;
use crate::error::TrellisError;
use crate::types::Message;

/// A captured invocation: what the engine asked the model.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub system_prompt: String,
    pub messages: Vec<Message>,
    pub capability_names: Vec<String>,
}

/// Model that replays a fixed script of assistant replies.
///
/// Replies are consumed front to back; when the script is exhausted every
/// further call fails with `ModelInvocation`. All requests are captured for
/// assertions.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<Vec<Message>>,
    requests: Mutex<Vec<CapturedRequest>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Message>) -> Self {
        Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Append a reply to the script.
    pub fn push_reply(&self, reply: Message) {
        self.replies.lock().expect("script lock").push(reply);
    }

    /// All captured requests so far.
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().expect("request lock").clone()
    }

    /// Number of invocations made.
    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("request lock").len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn model_id(&self) -> &str {
        "scripted"
    }

    async fn invoke(
        &self,
        system_prompt: &str,
        messages: &[Message],
        capabilities: &[CapabilityDefinition],
    ) -> Result<Message, TrellisError> {
        self.requests.lock().expect("request lock").push(CapturedRequest {
            system_prompt: system_prompt.to_string(),
            messages: messages.to_vec(),
            capability_names: capabilities.iter().map(|c| c.name.clone()).collect(),
        });

        let mut replies = self.replies.lock().expect("script lock");
        if replies.is_empty() {
            return Err(TrellisError::ModelInvocation("script exhausted".into()));
        }
        Ok(replies.remove(0))
    }
}
