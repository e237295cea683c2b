//! Verification Matcher - the serving judge
//!
//! Decides whether a served dish satisfies any in-progress order. Orders
//! are evaluated strictly sequentially in ledger order; the first order the
//! service reports as matching above the confidence threshold wins, and a
//! single served dish satisfies at most one order. A service error for one
//! order skips that order rather than blocking the rest.

use crate::config::KitchenConfig;
use crate::ledger::{Order, OrderLedger, DEFAULT_DISH_EMOJI};
use crate::pantry::Pantry;
use serde::Deserialize;
use std::sync::Arc;
use tiffin_llm::{decode_structured, CompletionProvider, CompletionRequest, Message};
use tracing::{debug, warn};

/// Structured-output contract for a verification query
#[derive(Debug, Deserialize)]
struct VerificationReply {
    matches: bool,
    confidence: f64,
    explanation: String,
}

/// Result of serving a dish
#[derive(Debug, Clone)]
pub enum ServeOutcome {
    /// No order was in progress; a free-form serve with nothing to satisfy
    NoActiveOrders,
    /// The dish fulfilled exactly this order
    Matched {
        /// The completed order
        order: Order,
    },
    /// No in-progress order matched; the ledger is unchanged
    NoMatch,
}

/// Judge that matches served dishes against in-progress orders
pub struct DishVerifier {
    provider: Arc<dyn CompletionProvider>,
    ledger: Arc<OrderLedger>,
    pantry: Arc<Pantry>,
    model: String,
    instruction: String,
    threshold: f64,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl DishVerifier {
    /// Create a new verifier
    #[must_use]
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        ledger: Arc<OrderLedger>,
        pantry: Arc<Pantry>,
        config: &KitchenConfig,
    ) -> Self {
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| provider.default_model().to_string());
        Self {
            provider,
            ledger,
            pantry,
            model,
            instruction: config.verifier_instruction.clone(),
            threshold: config.confidence_threshold,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Verify a served dish against the in-progress orders.
    ///
    /// Completes the first order that matches above the threshold. With no
    /// in-progress orders this trivially succeeds without touching the
    /// ledger.
    pub async fn verify(&self, dish: &str) -> ServeOutcome {
        let candidates = self.ledger.in_progress();
        if candidates.is_empty() {
            return ServeOutcome::NoActiveOrders;
        }

        for order in candidates {
            match self.query(dish, &order.name).await {
                Ok(reply) => {
                    debug!(
                        dish = %dish,
                        order = %order.name,
                        matches = reply.matches,
                        confidence = reply.confidence,
                        explanation = %reply.explanation,
                        "verification query answered"
                    );
                    if reply.matches && reply.confidence > self.threshold {
                        let emoji = self
                            .pantry
                            .lookup(dish)
                            .map(|i| i.emoji)
                            .unwrap_or_else(|| DEFAULT_DISH_EMOJI.to_string());
                        self.ledger.complete(order.id, dish, Some(emoji));
                        let completed = self.ledger.get(order.id).unwrap_or(order);
                        return ServeOutcome::Matched { order: completed };
                    }
                }
                Err(e) => {
                    // Transient failure for one order must not block the rest
                    warn!(
                        dish = %dish,
                        order = %order.name,
                        error = %e,
                        "verification query failed, skipping order"
                    );
                }
            }
        }

        ServeOutcome::NoMatch
    }

    async fn query(&self, dish: &str, order_name: &str) -> tiffin_llm::Result<VerificationReply> {
        let prompt = format!(
            "Served dish: \"{dish}\". Order: \"{order_name}\". \
             Does the served dish satisfy the order?"
        );

        let mut request = CompletionRequest::new(&self.model)
            .with_message(Message::system(&self.instruction))
            .with_message(Message::user(prompt));
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let response = self.provider.complete(request).await?;
        decode_structured(&response.content)
    }
}
