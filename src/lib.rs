//! Trellis: graph-structured orchestration engine for tool-using LLM agents.
//!
//! An agent's reasoning loop (think, optionally call tools, incorporate
//! results, continue or stop) is modeled as a small directed graph with
//! conditional branching. Whole compiled graphs can in turn be wrapped as
//! capabilities, letting a supervisor agent delegate entire turns to
//! sub-agents through the same dispatch path as plain tools.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use trellis::prelude::*;
//!
//! # async fn example() -> trellis::error::Result<()> {
//! let model = Arc::new(OpenAiCompatModel::from_config(&EngineConfig::from_env())?);
//!
//! let agent = AgentBuilder::new("assistant", model)
//!     .with_system_prompt("You are a helpful assistant.")
//!     .build()?;
//!
//! let state = ConversationState::from_messages(vec![Message::user("Hello!")]);
//! let final_state = agent.run(state, RunOptions::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod capability;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod prelude;
pub mod run;
pub mod state;
pub mod subgraph;
pub mod types;
