//! Tiffin LLM - Completion Service Abstraction
//!
//! This crate provides the LLM-facing surface for the Tiffin kitchen:
//! - Provider: `CompletionProvider` trait for prompt/response backends
//! - Session: `AgentSession` trait for stateful tool-calling chat sessions
//! - Structured: defensive decoding of model output into typed contracts
//!
//! Transport is intentionally absent. Concrete backends live outside this
//! workspace; the engine only ever sees the traits defined here.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod completion;
pub mod error;
pub mod message;
pub mod provider;
pub mod session;
pub mod structured;
pub mod tools;

pub use completion::{CompletionRequest, CompletionResponse, TokenUsage};
pub use error::{Error, Result};
pub use message::{Message, MessageRole};
pub use provider::CompletionProvider;
pub use session::{AgentEvent, AgentSession, SessionConfig, ToolOutcome};
pub use structured::{decode_structured, extract_json};
pub use tools::{ToolCall, ToolDefinition};
