//! Combination Resolver - the ingredient oracle
//!
//! Maps (action, ingredients) to a single new ingredient by asking the
//! completion service, under the fixed culinary-expert instruction and the
//! `{result_name, emoji}` structured-output contract. Stateless and
//! reentrant; concurrency discipline (one outstanding action per actor) is
//! enforced by the caller.

use crate::config::KitchenConfig;
use crate::error::{Error, Result};
use crate::pantry::Ingredient;
use serde::Deserialize;
use std::sync::Arc;
use tiffin_llm::{decode_structured, CompletionProvider, CompletionRequest, Message};
use tracing::debug;

/// Structured-output contract for a combination
#[derive(Debug, Deserialize)]
struct CombinationReply {
    result_name: String,
    emoji: String,
}

/// Oracle that resolves ingredient combinations
pub struct CombinationResolver {
    provider: Arc<dyn CompletionProvider>,
    model: String,
    instruction: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl CombinationResolver {
    /// Create a new resolver
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>, config: &KitchenConfig) -> Self {
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| provider.default_model().to_string());
        Self {
            provider,
            model,
            instruction: config.combiner_instruction.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Resolve an action over validated ingredients into a new ingredient.
    ///
    /// Any service error or malformed output surfaces as an `Err`; the
    /// caller must treat that as "combination failed", log the sentinel, and
    /// leave the pantry untouched.
    pub async fn resolve(&self, action: &str, ingredients: &[Ingredient]) -> Result<Ingredient> {
        let names: Vec<&str> = ingredients.iter().map(|i| i.name.as_str()).collect();
        let prompt = format!(
            "Technique: {action}. Ingredients: {}. What single ingredient results?",
            names.join(", ")
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

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| Error::Resolution(e.to_string()))?;
        let reply: CombinationReply = decode_structured(&response.content)
            .map_err(|e| Error::Resolution(e.to_string()))?;

        debug!(
            action = %action,
            result = %reply.result_name,
            "combination resolved"
        );

        Ok(Ingredient::new(reply.result_name, reply.emoji))
    }
}
