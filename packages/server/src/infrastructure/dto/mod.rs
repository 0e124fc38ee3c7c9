//! Data Transfer Objects (DTOs) for the chat wire protocol.
//!
//! - `websocket`: named events carried in WebSocket text frames
//! - `conversion`: DTO ⇄ domain entity conversions

pub mod conversion;
pub mod websocket;
