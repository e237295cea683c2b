//! Agent chat session abstraction
//!
//! A session is configured once with a system instruction and a declared
//! tool catalog, then driven as an event stream: it emits narration text and
//! approved tool calls, and will not proceed past a tool call until the
//! caller answers it with a [`ToolOutcome`].

use crate::error::Result;
use crate::tools::{ToolCall, ToolDefinition};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One-time configuration for opening an agent session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Model to use
    pub model: String,
    /// System instruction
    pub system_instruction: String,
    /// Declared tool catalog, one definition per callable tool
    pub tools: Vec<ToolDefinition>,
}

impl SessionConfig {
    /// Create a new session configuration
    #[must_use]
    pub fn new(model: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_instruction: system_instruction.into(),
            tools: Vec::new(),
        }
    }

    /// Set the declared tool catalog
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }
}

/// Events emitted by a live agent session
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// Free-text narration from the model.
    ///
    /// `with_tool_calls` is true when the same model turn also carried tool
    /// calls; such text accompanies the upcoming calls rather than standing
    /// alone.
    Narration {
        /// Narration text
        text: String,
        /// Whether pending tool calls accompany this text
        with_tool_calls: bool,
    },
    /// An approved tool call. Must be answered via
    /// [`AgentSession::submit_outcome`] before the session proceeds.
    ToolCall(ToolCall),
    /// The session finished its run
    Closed,
}

/// Structured answer to a tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// Whether the call succeeded
    pub success: bool,
    /// Result payload (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error description (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolOutcome {
    /// A successful outcome with a result payload
    #[must_use]
    pub fn ok(result: serde_json::Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    /// A failed outcome with an error description
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Trait for stateful tool-calling chat sessions
#[async_trait]
pub trait AgentSession: Send {
    /// Send a user directive into the session
    async fn send(&mut self, directive: &str) -> Result<()>;

    /// Receive the next session event
    async fn next_event(&mut self) -> Result<AgentEvent>;

    /// Answer a tool call so the session can proceed
    async fn submit_outcome(&mut self, tool_call_id: &str, outcome: ToolOutcome) -> Result<()>;
}
