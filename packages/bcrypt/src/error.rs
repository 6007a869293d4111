//! Error handling for the bcrypt engine

use async_task::TaskError;
use thiserror::Error;

/// Bcrypt-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BcryptError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid base64 symbol {symbol:?} at offset {offset}")]
    InvalidEncoding { symbol: char, offset: usize },

    #[error("Destination buffer too small: expected at least {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("Allocation failure: {0}")]
    AllocationFailure(String),

    #[error("Hash task error: {0}")]
    Task(#[from] TaskError),
}

impl BcryptError {
    /// Create an `invalid_argument` error
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Whether this error belongs to the caller-input class.
    ///
    /// Bad identifiers, bad base64 and undersized buffers are all rejected
    /// before any cipher state exists; allocation and task failures are not.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::InvalidEncoding { .. } | Self::BufferTooSmall { .. }
        )
    }
}

/// Result type for bcrypt operations
pub type Result<T> = std::result::Result<T, BcryptError>;
