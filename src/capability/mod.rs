//! Capability system: uniform invokable units offered to the model.
//!
//! Both plain functions and whole compiled graphs satisfy the [`Capability`]
//! trait, so the action node's dispatch is oblivious to which kind it invokes.

pub mod arguments;
pub mod capability;
pub mod registry;
pub mod schema;

pub use arguments::CapabilityArguments;
pub use capability::{Capability, FnCapability};
pub use registry::{CapabilityDefinition, CapabilityRegistry};
pub use schema::CapabilityParameters;
