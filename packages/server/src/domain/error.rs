//! Domain error types.

use thiserror::Error;

/// Errors raised by the connection registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Connection '{0}' is not registered")]
    ConnectionNotFound(String),

    #[error("Connection '{0}' is already registered")]
    AlreadyRegistered(String),
}

/// Errors raised while pushing events to connections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Failed to encode event: {0}")]
    Encode(String),
}
