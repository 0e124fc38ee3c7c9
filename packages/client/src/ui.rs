//! UI utilities for the client.

use std::io::Write;

use tokio::sync::watch;

/// Terminal output shared by the session and the reconnect loop.
///
/// The readline thread owns the input line; everything printed here is
/// written above it and the prompt is redrawn afterwards.
pub struct Console {
    prompt: watch::Sender<String>,
}

impl Console {
    pub fn new(prompt: watch::Sender<String>) -> Self {
        Self { prompt }
    }

    /// Change the prompt used by the next readline call.
    pub fn set_prompt(&self, prompt: impl Into<String>) {
        self.prompt.send_replace(prompt.into());
    }

    pub fn prompt(&self) -> String {
        self.prompt.borrow().clone()
    }

    /// Print a block of text above the input line
    pub fn show(&self, text: &str) {
        println!("\r{}", text);
        redisplay_prompt(&self.prompt());
    }
}

/// Redisplay the prompt after printing output
pub fn redisplay_prompt(prompt: &str) {
    print!("{}", prompt);
    std::io::stdout().flush().ok();
}

/// Prompt shown while chatting
pub fn chat_prompt(name: &str) -> String {
    format!("{}> ", name)
}

/// Prompt shown at name entry
pub const NAME_PROMPT: &str = "nome> ";
