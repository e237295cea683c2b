//! Kitchen - the cooking orchestrator and trust boundary
//!
//! Consumes tool-call requests from the planning agent (or manual triggers
//! from the presentation boundary), validates them against the pantry,
//! drives the combination resolver and the dish verifier, and answers every
//! call with a structured [`ToolOutcome`]. No failure from an external
//! service call is allowed to propagate past this boundary: resolver and
//! verifier errors become sentinel outcomes, and the pipeline stays usable
//! for the next call.

use crate::actions::{self, KitchenAction, ABANDON, SERVE};
use crate::config::KitchenConfig;
use crate::error::{Error, Result};
use crate::event_bus::{EventBus, KitchenEvent};
use crate::ledger::{Order, OrderLedger};
use crate::pantry::{Ingredient, Pantry};
use crate::resolver::CombinationResolver;
use crate::timeline::{AttemptResult, Timeline};
use crate::verifier::{DishVerifier, ServeOutcome};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use tiffin_llm::{
    AgentEvent, AgentSession, CompletionProvider, SessionConfig, ToolCall, ToolOutcome,
};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct IngredientArgs {
    ingredients: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ServeArgs {
    dish: String,
}

/// Summary of one agent session run
#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    /// Tool calls answered
    pub tool_calls: usize,
    /// Successful serves
    pub dishes_served: usize,
    /// Standalone narrations appended
    pub narrations: usize,
}

/// The cooking orchestrator
pub struct Kitchen {
    pantry: Arc<Pantry>,
    ledger: Arc<OrderLedger>,
    timeline: Arc<Timeline>,
    resolver: CombinationResolver,
    verifier: DishVerifier,
    event_bus: Option<Arc<EventBus>>,
    /// One-slot buffer for narration text that accompanied pending tool
    /// calls; consumed by the next timeline entry, cleared exactly once.
    pending_narration: Mutex<Option<String>>,
    config: KitchenConfig,
}

impl Kitchen {
    /// Create a kitchen with the default South Indian starter pantry
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>, config: KitchenConfig) -> Self {
        Self::with_seed(provider, config, crate::pantry::seed())
    }

    /// Create a kitchen with an explicit seed pantry
    #[must_use]
    pub fn with_seed(
        provider: Arc<dyn CompletionProvider>,
        config: KitchenConfig,
        seed: Vec<Ingredient>,
    ) -> Self {
        let pantry = Arc::new(Pantry::with_seed(seed));
        let ledger = Arc::new(OrderLedger::new());
        let resolver = CombinationResolver::new(provider.clone(), &config);
        let verifier = DishVerifier::new(provider, ledger.clone(), pantry.clone(), &config);
        Self {
            pantry,
            ledger,
            timeline: Arc::new(Timeline::new()),
            resolver,
            verifier,
            event_bus: None,
            pending_narration: Mutex::new(None),
            config,
        }
    }

    /// Set the event bus for real-time event broadcasting
    #[must_use]
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Read-only view of the pantry
    #[must_use]
    pub fn pantry(&self) -> &Arc<Pantry> {
        &self.pantry
    }

    /// Read-only view of the order ledger
    #[must_use]
    pub fn ledger(&self) -> &Arc<OrderLedger> {
        &self.ledger
    }

    /// Read-only view of the timeline
    #[must_use]
    pub fn timeline(&self) -> &Arc<Timeline> {
        &self.timeline
    }

    fn emit(&self, event: KitchenEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }

    // ------------------------------------------------------------------
    // Presentation-boundary triggers
    // ------------------------------------------------------------------

    /// Add a custom order to the ledger
    pub fn add_order(&self, order: Order) -> Uuid {
        self.ledger.add(order)
    }

    /// Pick up an order (idempotent)
    pub fn pickup_order(&self, id: Uuid) -> bool {
        let picked = self.ledger.pickup(id);
        if picked {
            self.emit(KitchenEvent::OrderPickedUp { order_id: id });
        }
        picked
    }

    /// Clear completed/failed orders from the ledger
    pub fn clear_summary(&self) -> usize {
        self.ledger.clear_finished()
    }

    /// Execute a manual action for the human player.
    ///
    /// Same validation, timeline and pantry semantics as an agent tool call.
    pub async fn cook(&self, action_name: &str, requested: &[String]) -> Result<Ingredient> {
        let action = actions::find(action_name)
            .ok_or_else(|| Error::Validation(format!("unknown action '{action_name}'")))?;
        if action.terminal {
            return Err(Error::Validation(format!(
                "'{action_name}' is not a combining action"
            )));
        }
        self.attempt(action, requested).await
    }

    /// Serve a dish manually
    pub async fn serve(&self, dish: &str) -> ServeOutcome {
        self.serve_dish(dish).await
    }

    // ------------------------------------------------------------------
    // Tool-call dispatch (the trust boundary)
    // ------------------------------------------------------------------

    /// Dispatch one tool call from the planning agent.
    ///
    /// Always returns a structured outcome; never panics and never lets a
    /// service failure escape. Validation failures mutate nothing and log
    /// nothing.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolOutcome {
        info!(tool = %call.name, args = %call.arguments, "dispatching tool call");

        match call.name.as_str() {
            SERVE => {
                let args: ServeArgs = match call.parse_arguments() {
                    Ok(args) => args,
                    Err(_) => return ToolOutcome::failure("serve requires a `dish` string"),
                };
                self.dispatch_serve(&args.dish).await
            }
            ABANDON => self.dispatch_abandon(),
            name => {
                let Some(action) = actions::find(name) else {
                    return ToolOutcome::failure(format!("unknown action '{name}'"));
                };
                if action.terminal {
                    return ToolOutcome::failure(format!("unknown action '{name}'"));
                }
                let args: IngredientArgs = match call.parse_arguments() {
                    Ok(args) => args,
                    Err(_) => {
                        return ToolOutcome::failure(format!(
                            "'{name}' requires an `ingredients` array of strings"
                        ))
                    }
                };
                match self.attempt(action, &args.ingredients).await {
                    Ok(ingredient) => ToolOutcome::ok(serde_json::json!({
                        "result": ingredient.name,
                        "emoji": ingredient.emoji,
                    })),
                    Err(e) => ToolOutcome::failure(e.to_string()),
                }
            }
        }
    }

    /// Validate and execute one combining action.
    ///
    /// Side-effect order is fixed: the pending timeline entry is appended
    /// before the resolver call begins, so in-flight attempts are always
    /// observable.
    async fn attempt(&self, action: &KitchenAction, requested: &[String]) -> Result<Ingredient> {
        if requested.is_empty() {
            return Err(Error::Validation("no ingredients requested".to_string()));
        }

        let resolved = self.pantry.resolve_all(requested);
        if resolved.is_empty() {
            return Err(Error::Validation(
                "ingredients missing from pantry".to_string(),
            ));
        }

        let names: Vec<String> = resolved.iter().map(|i| i.name.clone()).collect();
        let narration = self.take_narration();
        let entry_id = self
            .timeline
            .begin_attempt(action.name, names.clone(), narration);
        self.emit(KitchenEvent::AttemptStarted {
            entry_id,
            action: action.name.to_string(),
        });

        match self.resolver.resolve(action.display_name, &resolved).await {
            Ok(ingredient) => {
                // Idempotent growth: an existing canonical name is kept
                self.pantry.insert(ingredient.clone());
                self.timeline
                    .resolve(entry_id, AttemptResult::Produced(ingredient.clone()));
                self.emit(KitchenEvent::AttemptResolved {
                    entry_id,
                    success: true,
                    result_name: Some(ingredient.name.clone()),
                });
                info!(
                    action = %action.name,
                    result = %ingredient.name,
                    "combination succeeded"
                );
                Ok(ingredient)
            }
            Err(e) => {
                self.timeline.resolve(entry_id, AttemptResult::Failed);
                self.emit(KitchenEvent::AttemptResolved {
                    entry_id,
                    success: false,
                    result_name: None,
                });
                warn!(action = %action.name, error = %e, "combination failed");
                Err(e)
            }
        }
    }

    async fn dispatch_serve(&self, dish: &str) -> ToolOutcome {
        match self.serve_dish(dish).await {
            ServeOutcome::NoActiveOrders => {
                ToolOutcome::ok(serde_json::json!({"served": dish}))
            }
            ServeOutcome::Matched { order } => ToolOutcome::ok(serde_json::json!({
                "served": dish,
                "order": order.name,
            })),
            ServeOutcome::NoMatch => {
                ToolOutcome::failure("dish did not satisfy any active order")
            }
        }
    }

    /// Serve a dish: exactly one narration entry regardless of outcome
    async fn serve_dish(&self, dish: &str) -> ServeOutcome {
        let outcome = self.verifier.verify(dish).await;

        let line = match &outcome {
            ServeOutcome::NoActiveOrders => {
                format!("Served {dish}. No active orders to satisfy.")
            }
            ServeOutcome::Matched { order } => {
                format!("Served {dish} — order \"{}\" fulfilled.", order.name)
            }
            ServeOutcome::NoMatch => {
                format!("Served {dish}, but it did not satisfy any active order.")
            }
        };
        let text = match self.take_narration() {
            Some(pending) => format!("{pending}\n{line}"),
            None => line,
        };
        self.timeline.narrate(text);

        let matched = matches!(outcome, ServeOutcome::Matched { .. });
        self.emit(KitchenEvent::DishServed {
            dish: dish.to_string(),
            matched,
        });
        if let ServeOutcome::Matched { order } = &outcome {
            self.emit(KitchenEvent::OrderCompleted {
                order_id: order.id,
                served_dish: dish.to_string(),
            });
        }

        outcome
    }

    fn dispatch_abandon(&self) -> ToolOutcome {
        let count = self.ledger.abandon_in_progress();
        let line = format!("Abandoned the kitchen. {count} order(s) vanished.");
        let text = match self.take_narration() {
            Some(pending) => format!("{pending}\n{line}"),
            None => line,
        };
        self.timeline.narrate(text);
        self.emit(KitchenEvent::OrdersAbandoned { count });
        info!(count, "orders abandoned");
        ToolOutcome::ok(serde_json::json!({"abandoned": count}))
    }

    // ------------------------------------------------------------------
    // Agent session driving
    // ------------------------------------------------------------------

    fn stash_narration(&self, text: String) {
        let mut slot = self
            .pending_narration
            .lock()
            .expect("narration lock poisoned");
        // Back-to-back narration turns before a call collapse into one slot
        *slot = Some(match slot.take() {
            Some(existing) => format!("{existing}\n{text}"),
            None => text,
        });
    }

    fn take_narration(&self) -> Option<String> {
        self.pending_narration
            .lock()
            .expect("narration lock poisoned")
            .take()
    }

    /// Session configuration for opening a planner session against this
    /// kitchen: the planner instruction plus the declared tool catalog.
    #[must_use]
    pub fn session_config(&self, model: impl Into<String>) -> SessionConfig {
        SessionConfig::new(model, &self.config.planner_instruction)
            .with_tools(actions::tool_definitions())
    }

    /// Drive an agent session to completion.
    ///
    /// Sends the directive, then answers every approved tool call through
    /// [`Kitchen::dispatch`] until the session closes or the step cap is
    /// reached. Narration that accompanies tool calls is buffered and
    /// attached to the next timeline entry.
    pub async fn run_session(
        &self,
        session: &mut dyn AgentSession,
        directive: &str,
    ) -> Result<SessionReport> {
        let mut report = SessionReport::default();
        session.send(directive).await.map_err(Error::Llm)?;

        loop {
            match session.next_event().await.map_err(Error::Llm)? {
                AgentEvent::Narration {
                    text,
                    with_tool_calls,
                } => {
                    if with_tool_calls {
                        self.stash_narration(text);
                    } else {
                        self.emit(KitchenEvent::Narration { text: text.clone() });
                        self.timeline.narrate(text);
                        report.narrations += 1;
                    }
                }
                AgentEvent::ToolCall(call) => {
                    if report.tool_calls >= self.config.max_session_steps {
                        warn!(cap = self.config.max_session_steps, "session step cap reached");
                        session
                            .submit_outcome(
                                &call.id,
                                ToolOutcome::failure("session step cap reached"),
                            )
                            .await
                            .map_err(Error::Llm)?;
                        break;
                    }
                    let served = call.name == SERVE;
                    let outcome = self.dispatch(&call).await;
                    report.tool_calls += 1;
                    if served && outcome.success {
                        report.dishes_served += 1;
                    }
                    session
                        .submit_outcome(&call.id, outcome)
                        .await
                        .map_err(Error::Llm)?;
                }
                AgentEvent::Closed => break,
            }
        }

        Ok(report)
    }

    /// Pick up one order and run an agent session to cook it
    pub async fn cook_order(
        &self,
        session: &mut dyn AgentSession,
        order_id: Uuid,
    ) -> Result<SessionReport> {
        let order = self
            .ledger
            .get(order_id)
            .ok_or_else(|| Error::Ledger(format!("unknown order {order_id}")))?;
        if self.pickup_order(order_id) {
            info!(order = %order.name, "order picked up for ai cook");
        }
        let directive = format!("Cook and serve: {}.", order.name);
        self.run_session(session, &directive).await
    }

    /// Pick up a batch of orders atomically and run one consolidated session.
    ///
    /// The orchestrator holds no batch state; each dish is served and
    /// verified independently against the shared ledger.
    pub async fn cook_orders(
        &self,
        session: &mut dyn AgentSession,
        order_ids: &[Uuid],
    ) -> Result<SessionReport> {
        if order_ids.is_empty() {
            return Err(Error::Validation("no orders requested".to_string()));
        }
        if !self.ledger.pickup_many(order_ids) {
            return Err(Error::Ledger(
                "batch pickup failed: every order must exist and be not started".to_string(),
            ));
        }
        let mut names = Vec::new();
        for id in order_ids {
            self.emit(KitchenEvent::OrderPickedUp { order_id: *id });
            if let Some(order) = self.ledger.get(*id) {
                names.push(order.name);
            }
        }
        let directive = format!(
            "Cook and serve each of these dishes, serving each one as soon as it is ready: {}.",
            names.join(", ")
        );
        self.run_session(session, &directive).await
    }
}
