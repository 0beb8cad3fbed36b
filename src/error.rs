//! Error types for aibot-link.

use thiserror::Error;

/// Main error type for all link operations.
#[derive(Debug, Error)]
pub enum AibotError {
    /// I/O error from the underlying serial bridge.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A payload was handed to a link that is already closed.
    #[error("Link closed")]
    LinkClosed,

    /// Failure reported by the link implementation.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type alias using AibotError.
pub type Result<T> = std::result::Result<T, AibotError>;
