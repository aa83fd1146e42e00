//! Error types for Trellis.

use thiserror::Error;

use crate::state::ConversationState;

/// Primary error type for all Trellis operations.
#[derive(Error, Debug)]
pub enum TrellisError {
    #[error("Duplicate capability: {0}")]
    DuplicateCapability(String),

    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    #[error("Graph validation failed: {0}")]
    CompileValidation(String),

    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Capability execution failed: {name}: {message}")]
    CapabilityExecution { name: String, message: String },

    #[error("Router for node '{node}' selected undeclared target '{target}'")]
    RoutingContractViolation { node: String, target: String },

    #[error("Step limit of {limit} exceeded")]
    StepLimitExceeded {
        limit: usize,
        /// Conversation produced up to the point the ceiling was hit.
        state: Box<ConversationState>,
    },

    #[error("Run canceled")]
    Canceled,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl TrellisError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a capability execution error.
    pub fn capability(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CapabilityExecution {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Whether this error aborts a run outright, as opposed to being
    /// convertible into conversation data the model can react to.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::CompileValidation(_)
                | Self::RoutingContractViolation { .. }
                | Self::StepLimitExceeded { .. }
                | Self::Canceled
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TrellisError>;
