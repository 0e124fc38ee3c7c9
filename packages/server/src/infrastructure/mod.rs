//! Infrastructure layer: wire DTOs, the in-memory connection registry and the
//! WebSocket message pusher.

pub mod dto;
pub mod message_pusher;
pub mod repository;
