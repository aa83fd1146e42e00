//! Shared test helpers.

#![allow(dead_code)]

use std::sync::Arc;

use trellis::capability::{Capability, CapabilityParameters, FnCapability};

/// Capability that always answers `"42"`.
pub fn forty_two_capability() -> Arc<dyn Capability> {
    Arc::new(FnCapability::new(
        "answer",
        "Answer the ultimate question",
        CapabilityParameters::empty(),
        |_args| async move { Ok(serde_json::json!("42")) },
    ))
}

/// Capability adding two numbers.
pub fn add_capability() -> Arc<dyn Capability> {
    Arc::new(FnCapability::new(
        "add",
        "Add two numbers",
        CapabilityParameters::object()
            .number("a", "Left operand", true)
            .number("b", "Right operand", true)
            .build(),
        |args| async move {
            let sum = args.get_f64("a")? + args.get_f64("b")?;
            Ok(serde_json::json!(sum))
        },
    ))
}

/// Capability that sleeps until canceled; used for cancellation tests.
pub fn stalling_capability() -> Arc<dyn Capability> {
    Arc::new(FnCapability::new(
        "stall",
        "Never finishes promptly",
        CapabilityParameters::empty(),
        |_args| async move {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Ok(serde_json::json!("too late"))
        },
    ))
}
