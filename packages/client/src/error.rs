//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not open the connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An open connection dropped
    #[error("Connection lost")]
    ConnectionLost,

    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),

    /// The terminal input could not be read
    #[error("Input error: {0}")]
    Input(String),

    #[error("Failed to reconnect after {0} attempts")]
    ReconnectExhausted(u32),
}

/// Display name rejected at entry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("O nome não pode ficar vazio.")]
    Empty,

    #[error("Already chatting as '{0}'")]
    AlreadyNamed(String),
}

/// Message send rejected before anything was emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendRejected {
    #[error("no display name chosen")]
    Unnamed,

    #[error("message is empty")]
    Empty,

    #[error("not connected")]
    Disconnected,
}
