//! Supervisor composition and subgraph isolation tests.

mod common;

use std::sync::Arc;

use common::forty_two_capability;
use trellis::agent::{AgentBuilder, SupervisorBuilder};
use trellis::capability::{Capability, CapabilityArguments};
use trellis::model::ScriptedModel;
use trellis::run::RunOptions;
use trellis::state::ConversationState;
use trellis::subgraph::GraphCapability;
use trellis::types::{Message, Role, ToolCall};

fn seed(text: &str) -> ConversationState {
    ConversationState::from_messages(vec![Message::user(text)])
}

#[tokio::test]
async fn subgraph_runs_to_termination_and_returns_final_answer() {
    let child_model = Arc::new(ScriptedModel::new(vec![Message::assistant("child says hi")]));
    let child = AgentBuilder::new("general", child_model)
        .with_description("Agent for general questions")
        .build()
        .unwrap();

    let capability = GraphCapability::new(child);
    assert_eq!(capability.name(), "general");
    assert_eq!(capability.description(), "Agent for general questions");

    let result = capability
        .execute(&CapabilityArguments::new(serde_json::json!({
            "input": "say hi"
        })))
        .await
        .unwrap();
    assert_eq!(result, serde_json::json!("child says hi"));
}

#[tokio::test]
async fn subgraph_invocations_are_isolated() {
    let child_model = Arc::new(ScriptedModel::new(vec![
        Message::assistant("first"),
        Message::assistant("second"),
    ]));
    let child = AgentBuilder::new("general", child_model.clone())
        .build()
        .unwrap();
    let capability = GraphCapability::new(child);

    let first = capability
        .execute(&CapabilityArguments::new(serde_json::json!({"input": "one"})))
        .await
        .unwrap();
    let second = capability
        .execute(&CapabilityArguments::new(serde_json::json!({"input": "two"})))
        .await
        .unwrap();
    assert_eq!(first, serde_json::json!("first"));
    assert_eq!(second, serde_json::json!("second"));

    // Each child run started from a fresh single-message conversation; the
    // first invocation's messages never leaked into the second.
    let requests = child_model.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].messages.len(), 1);
    assert_eq!(requests[1].messages[0].content, "two");
}

#[tokio::test]
async fn child_failure_surfaces_as_capability_failure() {
    // Empty script: the child's reasoning node fails immediately.
    let child_model = Arc::new(ScriptedModel::new(vec![]));
    let child = AgentBuilder::new("flaky", child_model).build().unwrap();
    let capability = GraphCapability::new(child);

    let err = capability
        .execute(&CapabilityArguments::new(serde_json::json!({"input": "go"})))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        trellis::error::TrellisError::CapabilityExecution { name, .. } if name == "flaky"
    ));
}

#[tokio::test]
async fn supervisor_routes_a_turn_to_the_chosen_agent() {
    let math_model = Arc::new(ScriptedModel::new(vec![Message::assistant("2 + 2 = 4")]));
    let math = AgentBuilder::new("math", math_model)
        .with_description("Handles math problems")
        .with_system_prompt("You solve math problems step by step.")
        .build()
        .unwrap();

    let general_model = Arc::new(ScriptedModel::new(vec![Message::assistant("unused")]));
    let general = AgentBuilder::new("general", general_model.clone())
        .with_description("Agent for general questions")
        .build()
        .unwrap();

    let supervisor_model = Arc::new(ScriptedModel::new(vec![
        Message::assistant_with_calls(
            "",
            vec![ToolCall::with_id(
                "call_1",
                "math",
                serde_json::json!({"input": "what is 2 + 2?"}),
            )],
        ),
        Message::assistant("The math agent says: 2 + 2 = 4"),
    ]));
    let supervisor = SupervisorBuilder::new(supervisor_model.clone())
        .with_prompt("Route math questions to the math agent.")
        .with_agent(math)
        .with_agent(general)
        .build()
        .unwrap();

    let state = supervisor
        .run(seed("what is 2 + 2?"), RunOptions::default())
        .await
        .unwrap();

    assert_eq!(state.len(), 4);
    let tool_message = &state.messages()[2];
    assert_eq!(tool_message.role, Role::Tool);
    assert_eq!(tool_message.content, "2 + 2 = 4");

    // Only the delegated result crossed the boundary; the supervisor's second
    // invocation saw user + assistant + tool result, not the child's turns.
    assert_eq!(supervisor_model.requests()[1].messages.len(), 3);

    // Both agents were offered, in registration order.
    assert_eq!(
        supervisor_model.requests()[0].capability_names,
        vec!["math", "general"]
    );

    // The untouched agent was never invoked.
    assert_eq!(general_model.call_count(), 0);
}

#[tokio::test]
async fn supervisor_child_can_itself_use_tools() {
    let child_model = Arc::new(ScriptedModel::new(vec![
        Message::assistant_with_calls(
            "",
            vec![ToolCall::with_id("call_a", "answer", serde_json::json!({}))],
        ),
        Message::assistant("the answer is 42"),
    ]));
    let child = AgentBuilder::new("oracle", child_model)
        .with_capability(forty_two_capability())
        .build()
        .unwrap();

    let supervisor_model = Arc::new(ScriptedModel::new(vec![
        Message::assistant_with_calls(
            "",
            vec![ToolCall::with_id(
                "call_1",
                "oracle",
                serde_json::json!({"input": "the question"}),
            )],
        ),
        Message::assistant("done"),
    ]));
    let supervisor = SupervisorBuilder::new(supervisor_model)
        .with_agent(child)
        .build()
        .unwrap();

    let state = supervisor.run(seed("ask"), RunOptions::default()).await.unwrap();
    assert_eq!(state.messages()[2].content, "the answer is 42");
}

#[test]
fn supervisor_requires_agents() {
    let model = Arc::new(ScriptedModel::new(vec![]));
    assert!(SupervisorBuilder::new(model).build().is_err());
}
