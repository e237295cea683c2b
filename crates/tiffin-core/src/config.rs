//! Kitchen configuration

/// Fixed instruction for the combination oracle session
pub const COMBINER_INSTRUCTION: &str = "You are a South Indian culinary expert. \
Given a cooking technique and a list of ingredients, name the single most \
plausible resulting ingredient. Respond with JSON only, exactly \
{\"result_name\": string, \"emoji\": string}. No prose, no markdown fences.";

/// Fixed instruction for the verification judge session
pub const VERIFIER_INSTRUCTION: &str = "You are a South Indian culinary expert \
judging whether a served dish satisfies an order. Respond with JSON only, \
exactly {\"matches\": boolean, \"confidence\": number between 0 and 1, \
\"explanation\": string}. No prose, no markdown fences.";

/// Default instruction for the autonomous planner session
pub const PLANNER_INSTRUCTION: &str = "You are an autonomous cook in a South \
Indian kitchen. Use the provided tools to combine pantry ingredients step by \
step, then call `serve` with the finished dish name for each order. Only use \
ingredient names that exist in the pantry. Call `abandon` only if an order \
cannot be completed.";

/// Configuration for the kitchen engine
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Model override; provider default when `None`
    pub model: Option<String>,
    /// Verification acceptance threshold (accept when confidence is above it)
    pub confidence_threshold: f64,
    /// Cap on tool calls answered per agent session run
    pub max_session_steps: usize,
    /// System instruction for the combination oracle
    pub combiner_instruction: String,
    /// System instruction for the verification judge
    pub verifier_instruction: String,
    /// System instruction for the planner session
    pub planner_instruction: String,
    /// Temperature for oracle/judge requests
    pub temperature: Option<f32>,
    /// Max tokens for oracle/judge requests
    pub max_tokens: Option<u32>,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            model: None,
            confidence_threshold: 0.7,
            max_session_steps: 50,
            combiner_instruction: COMBINER_INSTRUCTION.to_string(),
            verifier_instruction: VERIFIER_INSTRUCTION.to_string(),
            planner_instruction: PLANNER_INSTRUCTION.to_string(),
            temperature: Some(0.2),
            max_tokens: Some(256),
        }
    }
}

impl KitchenConfig {
    /// Create a new configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model override
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the verification acceptance threshold
    #[must_use]
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Set the session step cap
    #[must_use]
    pub fn with_max_session_steps(mut self, max: usize) -> Self {
        self.max_session_steps = max;
        self
    }

    /// Override the planner instruction
    #[must_use]
    pub fn with_planner_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.planner_instruction = instruction.into();
        self
    }
}
