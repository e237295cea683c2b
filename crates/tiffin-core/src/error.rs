//! Error types for tiffin-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed tool-call arguments or unresolvable names.
    /// Reported synchronously; no state is mutated.
    #[error("validation error: {0}")]
    Validation(String),

    /// Combination resolution failed (service error or malformed output)
    #[error("resolution error: {0}")]
    Resolution(String),

    /// Invalid order lifecycle operation
    #[error("ledger error: {0}")]
    Ledger(String),

    /// Completion service error
    #[error("llm error: {0}")]
    Llm(#[from] tiffin_llm::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
