//! Relay hub for the Chatzito real-time chat.
//!
//! The hub accepts WebSocket connections and fans chat messages, join/leave
//! notices and typing indicators out to every connected peer.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
