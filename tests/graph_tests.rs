//! Tests for graph compilation and the execution state machine.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use trellis::error::TrellisError;
use trellis::graph::{FnRouter, GraphBuilder, Node, NodeContext, Route, END};
use trellis::run::RunOptions;
use trellis::state::{ConversationState, StateDelta};
use trellis::types::Message;

/// Node that appends a single fixed assistant message.
struct TickNode;

#[async_trait]
impl Node for TickNode {
    async fn run(
        &self,
        _state: &ConversationState,
        _ctx: &NodeContext,
    ) -> Result<StateDelta, TrellisError> {
        Ok(StateDelta::single(Message::assistant("tick")))
    }
}

fn tick() -> Arc<dyn Node> {
    Arc::new(TickNode)
}

#[test]
fn compile_requires_entry() {
    let err = GraphBuilder::new()
        .add_node("a", tick())
        .add_edge("a", END)
        .compile("g")
        .unwrap_err();
    assert!(matches!(err, TrellisError::CompileValidation(_)));
}

#[test]
fn compile_rejects_unknown_edge_target() {
    let err = GraphBuilder::new()
        .add_node("a", tick())
        .add_edge("a", "ghost")
        .set_entry("a")
        .compile("g")
        .unwrap_err();
    assert!(matches!(err, TrellisError::CompileValidation(_)));
}

#[test]
fn compile_rejects_undeclared_conditional_target() {
    let err = GraphBuilder::new()
        .add_node("a", tick())
        .add_conditional_edge(
            "a",
            Arc::new(FnRouter::new(|_| Route::End)),
            vec!["ghost".to_string(), END.to_string()],
        )
        .set_entry("a")
        .compile("g")
        .unwrap_err();
    assert!(matches!(err, TrellisError::CompileValidation(_)));
}

#[test]
fn compile_rejects_duplicate_node() {
    let err = GraphBuilder::new()
        .add_node("a", tick())
        .add_node("a", tick())
        .add_edge("a", END)
        .set_entry("a")
        .compile("g")
        .unwrap_err();
    assert!(matches!(err, TrellisError::CompileValidation(_)));
}

#[test]
fn compile_rejects_reserved_node_name() {
    let err = GraphBuilder::new()
        .add_node(END, tick())
        .add_edge(END, END)
        .set_entry(END)
        .compile("g")
        .unwrap_err();
    assert!(matches!(err, TrellisError::CompileValidation(_)));
}

#[test]
fn compile_requires_path_to_termination() {
    // a and b only point at each other; no declared path reaches END.
    let err = GraphBuilder::new()
        .add_node("a", tick())
        .add_node("b", tick())
        .add_edge("a", "b")
        .add_edge("b", "a")
        .set_entry("a")
        .compile("g")
        .unwrap_err();
    assert!(matches!(err, TrellisError::CompileValidation(_)));
}

#[test]
fn compile_requires_outgoing_edge_for_every_node() {
    let err = GraphBuilder::new()
        .add_node("a", tick())
        .add_node("dangling", tick())
        .add_edge("a", END)
        .set_entry("a")
        .compile("g")
        .unwrap_err();
    assert!(matches!(err, TrellisError::CompileValidation(_)));
}

#[tokio::test]
async fn static_edge_to_end_terminates() {
    let graph = GraphBuilder::new()
        .add_node("a", tick())
        .add_edge("a", END)
        .set_entry("a")
        .compile("g")
        .unwrap();

    let state = graph
        .run(ConversationState::new(), RunOptions::default())
        .await
        .unwrap();
    assert_eq!(state.len(), 1);
    assert_eq!(state.latest().unwrap().content, "tick");
}

#[tokio::test]
async fn step_limit_fails_instead_of_looping() {
    let graph = GraphBuilder::new()
        .add_node("a", tick())
        .add_conditional_edge(
            "a",
            Arc::new(FnRouter::new(|_| Route::Node("a".to_string()))),
            vec!["a".to_string(), END.to_string()],
        )
        .set_entry("a")
        .compile("g")
        .unwrap();

    let err = graph
        .run(
            ConversationState::new(),
            RunOptions::default().with_max_steps(3),
        )
        .await
        .unwrap_err();

    match err {
        TrellisError::StepLimitExceeded { limit, state } => {
            assert_eq!(limit, 3);
            // Exactly `limit` node executions happened before the ceiling.
            assert_eq!(state.len(), 3);
        }
        other => panic!("expected StepLimitExceeded, got {other}"),
    }
}

#[tokio::test]
async fn undeclared_runtime_target_is_a_contract_violation() {
    let graph = GraphBuilder::new()
        .add_node("a", tick())
        .add_node("hidden", tick())
        .add_conditional_edge(
            "a",
            // Declared set is {a, END} but the router picks "hidden".
            Arc::new(FnRouter::new(|_| Route::Node("hidden".to_string()))),
            vec!["a".to_string(), END.to_string()],
        )
        .add_edge("hidden", END)
        .set_entry("a")
        .compile("g")
        .unwrap();

    let err = graph
        .run(ConversationState::new(), RunOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TrellisError::RoutingContractViolation { node, target }
            if node == "a" && target == "hidden"
    ));
}

#[tokio::test]
async fn undeclared_end_is_a_contract_violation() {
    let graph = GraphBuilder::new()
        .add_node("a", tick())
        .add_node("b", tick())
        .add_conditional_edge(
            "a",
            Arc::new(FnRouter::new(|_| Route::End)),
            vec!["b".to_string()],
        )
        .add_edge("b", END)
        .set_entry("a")
        .compile("g")
        .unwrap();

    let err = graph
        .run(ConversationState::new(), RunOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TrellisError::RoutingContractViolation { target, .. } if target == END
    ));
}

#[tokio::test]
async fn pre_canceled_run_never_executes_a_node() {
    let graph = GraphBuilder::new()
        .add_node("a", tick())
        .add_edge("a", END)
        .set_entry("a")
        .compile("g")
        .unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = graph
        .run(
            ConversationState::new(),
            RunOptions::default().with_cancel(cancel),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TrellisError::Canceled));
}

#[tokio::test]
async fn concurrent_independent_runs_are_isolated() {
    let graph = Arc::new(
        GraphBuilder::new()
            .add_node("a", tick())
            .add_edge("a", END)
            .set_entry("a")
            .compile("g")
            .unwrap(),
    );

    let mut handles = Vec::new();
    for i in 0..8 {
        let graph = graph.clone();
        handles.push(tokio::spawn(async move {
            let seed =
                ConversationState::from_messages(vec![Message::user(format!("run {i}"))]);
            graph.run(seed, RunOptions::default()).await
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let state = handle.await.unwrap().unwrap();
        assert_eq!(state.len(), 2);
        assert_eq!(state.messages()[0].content, format!("run {i}"));
    }
}
