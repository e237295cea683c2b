//! Completion provider trait
//!
//! The engine treats the completion service as an opaque prompt-in,
//! text-out backend. Structured-output contracts are enforced by the
//! caller via [`crate::structured`], not by the provider.

use crate::completion::{CompletionRequest, CompletionResponse};
use crate::error::Result;
use async_trait::async_trait;

/// Trait that all completion backends must implement
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Get the default model
    fn default_model(&self) -> &str;

    /// Complete a conversation (text only)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}
