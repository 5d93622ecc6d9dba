// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for deferred-execution wrappers
//!
//! Timing edge cases (infinite delays, full queues, redundant cancels) are
//! not errors. Only fallible construction surfaces a `DeferError`.

use thiserror::Error;

/// Errors that can occur while building deferred wrappers
#[derive(Debug, Error)]
pub enum DeferError {
    /// No async runtime is available to host timers
    #[error("No timer runtime available: {0}")]
    NoRuntime(String),

    /// Argument value could not be turned into a cache key
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for deferred-execution operations
pub type DeferResult<T> = Result<T, DeferError>;

impl From<serde_json::Error> for DeferError {
    fn from(err: serde_json::Error) -> Self {
        DeferError::Serialization(err.to_string())
    }
}

impl From<tokio::runtime::TryCurrentError> for DeferError {
    fn from(err: tokio::runtime::TryCurrentError) -> Self {
        DeferError::NoRuntime(err.to_string())
    }
}
