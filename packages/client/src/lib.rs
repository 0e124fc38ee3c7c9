//! Terminal chat client for the Chatzito relay hub.
//!
//! The client keeps the per-session chat state (display name, message log,
//! connection flag, remote typing set), mirrors the hub's typing debounce
//! locally and renders everything to the terminal.

pub mod domain;
pub mod error;
pub mod formatter;
pub mod input;
pub mod runner;
pub mod session;
pub mod state;
pub mod ui;

pub use runner::run_client;
