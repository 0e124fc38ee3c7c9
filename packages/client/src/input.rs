//! Terminal input on a dedicated readline thread.
//!
//! Lines and keystrokes are forwarded to the async side over a channel.
//! Keystrokes are observed through the editor's hint hook, which runs after
//! every edit of the line.

use rustyline::{
    Context, Editor, Helper, completion::Completer, error::ReadlineError, highlight::Highlighter,
    hint::Hinter, history::DefaultHistory, validate::Validator,
};
use tokio::sync::{mpsc, watch};

/// Input observed on the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A submitted line (untrimmed)
    Line(String),
    /// The line being edited changed and is not empty
    Keystroke,
    /// The terminal cannot be read anymore
    Failed(String),
}

/// Editor helper reporting every non-empty edit as a keystroke
struct KeystrokeHelper {
    events: mpsc::UnboundedSender<InputEvent>,
}

impl Hinter for KeystrokeHelper {
    type Hint = String;

    fn hint(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if !line.is_empty() {
            self.events.send(InputEvent::Keystroke).ok();
        }
        None
    }
}

impl Completer for KeystrokeHelper {
    type Candidate = String;
}

impl Highlighter for KeystrokeHelper {}

impl Validator for KeystrokeHelper {}

impl Helper for KeystrokeHelper {}

/// Spawn the readline thread.
///
/// The receiver yields `None` once the terminal reaches EOF or Ctrl+C, and
/// [`InputEvent::Failed`] before closing on any other readline error.
pub fn spawn_input(prompt: watch::Receiver<String>) -> mpsc::UnboundedReceiver<InputEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let mut rl = match Editor::<KeystrokeHelper, DefaultHistory>::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                tx.send(InputEvent::Failed(e.to_string())).ok();
                return;
            }
        };
        rl.set_helper(Some(KeystrokeHelper { events: tx.clone() }));

        loop {
            let current_prompt = prompt.borrow().clone();
            match rl.readline(&current_prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str()).ok();
                    }
                    if tx.send(InputEvent::Line(line)).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    tx.send(InputEvent::Failed(err.to_string())).ok();
                    break;
                }
            }
        }
        // Drop the helper so its sender does not keep the channel open
        rl.set_helper(None);
    });

    rx
}
