//! UI layer: axum router, WebSocket handler and server lifecycle.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, ServerError};
pub use signal::shutdown_signal;
