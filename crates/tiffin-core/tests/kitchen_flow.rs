//! Integration tests for the kitchen engine
//!
//! Wires a real Kitchen against scripted completion/session backends and
//! drives the full planner loop: combination, serving, verification and the
//! order ledger all working against shared state.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tiffin_core::prelude::*;
use tiffin_llm::{
    AgentEvent, AgentSession, CompletionProvider, CompletionRequest, CompletionResponse, ToolCall,
    ToolOutcome,
};

/// Completion backend that replays canned responses in order
struct ScriptedProvider {
    responses: Mutex<VecDeque<tiffin_llm::Result<CompletionResponse>>>,
}

impl ScriptedProvider {
    fn new(script: Vec<tiffin_llm::Result<CompletionResponse>>) -> Self {
        Self {
            responses: Mutex::new(script.into()),
        }
    }

    fn json(text: &str) -> tiffin_llm::Result<CompletionResponse> {
        Ok(CompletionResponse::text("scripted", text))
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> tiffin_llm::Result<CompletionResponse> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(tiffin_llm::Error::Api("script exhausted".to_string())))
    }
}

/// Agent session that replays canned events and records every answer
struct ScriptedSession {
    events: VecDeque<AgentEvent>,
    directives: Vec<String>,
    outcomes: Vec<(String, ToolOutcome)>,
}

impl ScriptedSession {
    fn new(events: Vec<AgentEvent>) -> Self {
        Self {
            events: events.into(),
            directives: Vec::new(),
            outcomes: Vec::new(),
        }
    }
}

#[async_trait]
impl AgentSession for ScriptedSession {
    async fn send(&mut self, directive: &str) -> tiffin_llm::Result<()> {
        self.directives.push(directive.to_string());
        Ok(())
    }

    async fn next_event(&mut self) -> tiffin_llm::Result<AgentEvent> {
        Ok(self.events.pop_front().unwrap_or(AgentEvent::Closed))
    }

    async fn submit_outcome(
        &mut self,
        tool_call_id: &str,
        outcome: ToolOutcome,
    ) -> tiffin_llm::Result<()> {
        self.outcomes.push((tool_call_id.to_string(), outcome));
        Ok(())
    }
}

fn call(name: &str, args: &str) -> ToolCall {
    ToolCall::new(name, args)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[tokio::test]
async fn batch_cook_serves_every_order_through_the_shared_ledger() {
    init_tracing();
    // Provider script: two combinations, then verification queries for two
    // serves. Verification iterates in-progress orders in ledger order, so
    // serving "Idli" first queries Filter Coffee (no), then Idli (yes).
    let provider = Arc::new(ScriptedProvider::new(vec![
        ScriptedProvider::json(r#"{"result_name": "Idli Batter", "emoji": "🥣"}"#),
        ScriptedProvider::json(r#"{"result_name": "Idli", "emoji": "🍥"}"#),
        ScriptedProvider::json(
            r#"{"matches": false, "confidence": 0.1, "explanation": "not a drink"}"#,
        ),
        ScriptedProvider::json(
            r#"{"matches": true, "confidence": 0.9, "explanation": "steamed idli"}"#,
        ),
        ScriptedProvider::json(
            r#"{"matches": true, "confidence": 0.95, "explanation": "filter coffee"}"#,
        ),
    ]));

    let bus = Arc::new(EventBus::new(64));
    let mut events_rx = bus.subscribe();
    let kitchen =
        Kitchen::new(provider, KitchenConfig::default()).with_event_bus(bus);

    let coffee = kitchen.add_order(Order::new("Filter Coffee", "☕", Difficulty::Easy));
    let idli = kitchen.add_order(Order::new("Idli", "🍥", Difficulty::Medium));

    let mut session = ScriptedSession::new(vec![
        AgentEvent::Narration {
            text: "Grinding the batter first.".to_string(),
            with_tool_calls: true,
        },
        AgentEvent::ToolCall(call(
            "stone_grind",
            r#"{"ingredients": ["ponni rice", "urad dal"]}"#,
        )),
        AgentEvent::ToolCall(call("steam", r#"{"ingredients": ["Idli Batter"]}"#)),
        AgentEvent::ToolCall(call("serve", r#"{"dish": "Idli"}"#)),
        AgentEvent::ToolCall(call("serve", r#"{"dish": "Filter Coffee"}"#)),
        AgentEvent::Closed,
    ]);

    let report = kitchen
        .cook_orders(&mut session, &[coffee, idli])
        .await
        .unwrap();

    assert_eq!(report.tool_calls, 4);
    assert_eq!(report.dishes_served, 2);

    // One consolidated directive naming both dishes
    assert_eq!(session.directives.len(), 1);
    assert!(session.directives[0].contains("Filter Coffee"));
    assert!(session.directives[0].contains("Idli"));

    // Every tool call got a successful answer
    assert_eq!(session.outcomes.len(), 4);
    assert!(session.outcomes.iter().all(|(_, o)| o.success));

    // Both orders completed independently against the shared ledger
    assert_eq!(
        kitchen.ledger().get(coffee).unwrap().status,
        OrderStatus::Completed
    );
    assert_eq!(
        kitchen.ledger().get(idli).unwrap().status,
        OrderStatus::Completed
    );
    assert!(kitchen.ledger().in_progress().is_empty());

    // Pantry grew by exactly the two produced ingredients
    assert!(kitchen.pantry().contains("Idli Batter"));
    assert!(kitchen.pantry().contains("Idli"));

    // The buffered narration landed on the first attempt entry and only
    // there; the slot is consumed exactly once
    let entries = kitchen.timeline().snapshot();
    let attempts: Vec<_> = entries.iter().filter(|e| e.action.is_some()).collect();
    assert_eq!(attempts[0].text.as_deref(), Some("Grinding the batter first."));
    assert!(attempts[1].text.is_none());
    assert!(!kitchen.timeline().has_pending());

    // Events arrive in causal order: pickups before attempts before serves
    let mut seen = Vec::new();
    while let Ok(event) = events_rx.try_recv() {
        seen.push(serde_json::to_value(&event).unwrap()["type"]
            .as_str()
            .unwrap()
            .to_string());
    }
    assert_eq!(seen.iter().filter(|t| *t == "order_picked_up").count(), 2);
    assert_eq!(seen.iter().filter(|t| *t == "order_completed").count(), 2);
    let first_pickup = seen.iter().position(|t| t == "order_picked_up").unwrap();
    let first_attempt = seen.iter().position(|t| t == "attempt_started").unwrap();
    assert!(first_pickup < first_attempt);
}

#[tokio::test]
async fn single_order_cook_drives_pickup_and_serve() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        ScriptedProvider::json(r#"{"result_name": "Decoction", "emoji": "☕"}"#),
        ScriptedProvider::json(r#"{"result_name": "Filter Coffee", "emoji": "☕"}"#),
        ScriptedProvider::json(
            r#"{"matches": true, "confidence": 0.85, "explanation": "the real thing"}"#,
        ),
    ]));

    let kitchen = Kitchen::new(provider, KitchenConfig::default());
    let order = kitchen.add_order(Order::new("Filter Coffee", "☕", Difficulty::Easy));

    let mut session = ScriptedSession::new(vec![
        AgentEvent::ToolCall(call("boil", r#"{"ingredients": ["coffee beans"]}"#)),
        AgentEvent::ToolCall(call("mix", r#"{"ingredients": ["Decoction", "milk"]}"#)),
        AgentEvent::ToolCall(call("serve", r#"{"dish": "Filter Coffee"}"#)),
        AgentEvent::Closed,
    ]);

    let report = kitchen.cook_order(&mut session, order).await.unwrap();

    assert_eq!(report.dishes_served, 1);
    let completed = kitchen.ledger().get(order).unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);
    assert_eq!(completed.served_dish.as_deref(), Some("Filter Coffee"));
}

#[tokio::test]
async fn batch_pickup_is_all_or_nothing() {
    let provider = Arc::new(ScriptedProvider::new(vec![]));
    let kitchen = Kitchen::new(provider, KitchenConfig::default());

    let a = kitchen.add_order(Order::new("Idli", "🍥", Difficulty::Medium));
    let b = kitchen.add_order(Order::new("Sambar", "🍲", Difficulty::Medium));
    kitchen.pickup_order(b);

    let mut session = ScriptedSession::new(vec![]);
    let err = kitchen.cook_orders(&mut session, &[a, b]).await;
    assert!(err.is_err());

    // Nothing moved and no directive was sent
    assert_eq!(
        kitchen.ledger().get(a).unwrap().status,
        OrderStatus::NotStarted
    );
    assert!(session.directives.is_empty());
}

#[tokio::test]
async fn failed_serve_reports_failure_but_session_continues() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        // Serve "Plain Rice" against in-progress "Masala Dosa": no match
        ScriptedProvider::json(
            r#"{"matches": false, "confidence": 0.9, "explanation": "not a dosa"}"#,
        ),
    ]));

    let kitchen = Kitchen::new(provider, KitchenConfig::default());
    let order = kitchen.add_order(Order::new("Masala Dosa", "🥞", Difficulty::Hard));

    let mut session = ScriptedSession::new(vec![
        AgentEvent::ToolCall(call("serve", r#"{"dish": "Plain Rice"}"#)),
        AgentEvent::Closed,
    ]);

    let report = kitchen.cook_order(&mut session, order).await.unwrap();

    assert_eq!(report.tool_calls, 1);
    assert_eq!(report.dishes_served, 0);
    let (_, outcome) = &session.outcomes[0];
    assert!(!outcome.success);

    // No order failed merely because verification did not match
    assert_eq!(
        kitchen.ledger().get(order).unwrap().status,
        OrderStatus::InProgress
    );
    // The failed serve still produced its narration entry
    assert_eq!(kitchen.timeline().len(), 1);
}

#[tokio::test]
async fn session_step_cap_stops_a_runaway_planner() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        ScriptedProvider::json(r#"{"result_name": "Rice Flour", "emoji": "🌾"}"#),
    ]));

    let config = KitchenConfig::default().with_max_session_steps(1);
    let kitchen = Kitchen::new(provider, config);

    let mut session = ScriptedSession::new(vec![
        AgentEvent::ToolCall(call("roast", r#"{"ingredients": ["ponni rice"]}"#)),
        AgentEvent::ToolCall(call("roast", r#"{"ingredients": ["ponni rice"]}"#)),
        AgentEvent::ToolCall(call("roast", r#"{"ingredients": ["ponni rice"]}"#)),
        AgentEvent::Closed,
    ]);

    let report = kitchen.run_session(&mut session, "keep roasting").await.unwrap();

    assert_eq!(report.tool_calls, 1);
    // The capped call was answered with a failure so the session can close
    let (_, last) = session.outcomes.last().unwrap();
    assert!(!last.success);
    assert_eq!(last.error.as_deref(), Some("session step cap reached"));
}

#[tokio::test]
async fn standalone_narration_goes_straight_to_the_timeline() {
    let provider = Arc::new(ScriptedProvider::new(vec![]));
    let kitchen = Kitchen::new(provider, KitchenConfig::default());

    let mut session = ScriptedSession::new(vec![
        AgentEvent::Narration {
            text: "The pantry looks well stocked.".to_string(),
            with_tool_calls: false,
        },
        AgentEvent::Closed,
    ]);

    let report = kitchen.run_session(&mut session, "look around").await.unwrap();

    assert_eq!(report.narrations, 1);
    assert_eq!(report.tool_calls, 0);
    let entries = kitchen.timeline().snapshot();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].text.as_deref(),
        Some("The pantry looks well stocked.")
    );
}
