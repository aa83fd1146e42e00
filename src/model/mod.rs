//! Language model boundary.
//!
//! The engine consumes exactly one contract here: prompt plus conversation in,
//! one assistant message out. Retry policy belongs to the caller, never to an
//! implementation.

pub mod http;
pub mod openai_compat;
pub mod scripted;

pub use openai_compat::OpenAiCompatModel;
pub use scripted::ScriptedModel;

use async_trait::async_trait;

use crate::capability::CapabilityDefinition;
use crate::error::TrellisError;
use crate::types::Message;

/// Boundary contract for the external inference service.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Identifier for logging (e.g. the model id).
    fn model_id(&self) -> &str;

    /// Invoke the model with the system prompt, the conversation so far, and
    /// the available capabilities. Returns exactly one assistant message;
    /// fails with `ModelInvocation` on transport or quota errors.
    async fn invoke(
        &self,
        system_prompt: &str,
        messages: &[Message],
        capabilities: &[CapabilityDefinition],
    ) -> Result<Message, TrellisError>;
}
