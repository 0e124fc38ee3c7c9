//! Shared building blocks for the Chatzito server and client.
//!
//! - `logger`: tracing subscriber setup for the binaries
//! - `time`: wall-clock timestamps with a clock abstraction for testability
//! - `presence`: debounced per-key expiry timers (typing indicators)

pub mod logger;
pub mod presence;
pub mod time;
