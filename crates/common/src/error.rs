//! Common error types for ShardChat
//!
//! This module defines all error types used across the ShardChat system.
//! The orchestrator's HTTP layer maps these onto status codes at the request
//! boundary; nothing here is transport-specific.

use thiserror::Error;

/// Main error type for ShardChat
#[derive(Error, Debug)]
pub enum ShardChatError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Prompt exceeded the hard character ceiling; no process is spawned
    #[error("Prompt too large: {len} chars (max: {max}). Please reduce context or history.")]
    PromptTooLarge { len: usize, max: usize },

    /// The launched generation process exited non-zero
    #[error("{0}")]
    Generation(String),

    /// Launcher resolution or spawn errors
    #[error("Launch error: {0}")]
    Launch(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShardChatError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        ShardChatError::Config(msg.into())
    }

    /// Create a generation-failure error from a captured stderr.
    ///
    /// A blank stderr degrades to the generic fallback so the client always
    /// receives a non-empty message.
    pub fn generation(stderr: impl Into<String>) -> Self {
        let msg = stderr.into();
        let msg = msg.trim();
        if msg.is_empty() {
            ShardChatError::Generation("generation process failed".to_string())
        } else {
            ShardChatError::Generation(msg.to_string())
        }
    }

    /// Create a launch error
    pub fn launch(msg: impl Into<String>) -> Self {
        ShardChatError::Launch(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        ShardChatError::InvalidInput(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        ShardChatError::Internal(msg.into())
    }

    /// Whether this error is the client's fault (maps to a 400-class status)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ShardChatError::PromptTooLarge { .. } | ShardChatError::InvalidInput(_)
        )
    }
}

/// Result type alias for ShardChat operations
pub type Result<T> = std::result::Result<T, ShardChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_too_large_message() {
        let err = ShardChatError::PromptTooLarge {
            len: 600_001,
            max: 600_000,
        };
        assert_eq!(
            err.to_string(),
            "Prompt too large: 600001 chars (max: 600000). Please reduce context or history."
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn test_generation_fallback_on_empty_stderr() {
        let err = ShardChatError::generation("   \n");
        assert_eq!(err.to_string(), "generation process failed");
    }

    #[test]
    fn test_generation_trims_stderr() {
        let err = ShardChatError::generation("ranks failed to rendezvous\n");
        assert_eq!(err.to_string(), "ranks failed to rendezvous");
        assert!(!err.is_client_error());
    }
}
