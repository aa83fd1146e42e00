//! Core value types shared across the engine.

pub mod message;

pub use message::{Message, Role, ToolCall};
