//! Client execution logic with reconnection support.

use std::time::Duration;

use chatzito_shared::{
    presence::TYPING_TIMEOUT,
    time::{Clock, SystemClock},
};
use tokio::sync::{mpsc, watch};

use crate::{
    domain::{is_logout_command, should_attempt_reconnect, should_exit_immediately},
    error::{ClientError, SendRejected},
    formatter::MessageFormatter,
    input::{InputEvent, spawn_input},
    session::{SessionEnd, run_client_session},
    state::{ChatState, Phase},
    ui::{Console, NAME_PROMPT, chat_prompt},
};

pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;
pub const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the chat client until the terminal closes.
///
/// # Arguments
///
/// * `url` - WebSocket URL of the hub
/// * `name` - Display name to start with; prompted for when `None` or invalid
pub async fn run_client(url: String, name: Option<String>) -> Result<(), ClientError> {
    let (prompt_tx, prompt_rx) = watch::channel(NAME_PROMPT.to_string());
    let console = Console::new(prompt_tx);
    let mut input = spawn_input(prompt_rx);
    let clock = SystemClock;
    let mut state = ChatState::new();

    if let Some(raw) = name
        && let Err(e) = state.set_name(&raw)
    {
        console.show(&e.to_string());
    }

    loop {
        if state.phase() == Phase::Unnamed
            && !prompt_name(&mut state, &mut input, &console).await?
        {
            tracing::info!("Input closed at name entry");
            return Ok(());
        }

        match connect_with_retry(&url, &mut state, &mut input, &console, &clock).await? {
            SessionEnd::LoggedOut => {
                tracing::info!("Logged out");
                console.show(&MessageFormatter::format_logged_out());
            }
            SessionEnd::Quit => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
        }
    }
}

/// Ask for a display name until a valid one is entered.
///
/// Returns `false` if the input closed first.
async fn prompt_name(
    state: &mut ChatState,
    input: &mut mpsc::UnboundedReceiver<InputEvent>,
    console: &Console,
) -> Result<bool, ClientError> {
    console.set_prompt(NAME_PROMPT);
    console.show(&MessageFormatter::format_name_prompt());

    while let Some(event) = input.recv().await {
        match event {
            InputEvent::Line(raw) => match state.set_name(&raw) {
                Ok(name) => {
                    tracing::info!("Display name set to '{}'", name);
                    return Ok(true);
                }
                Err(e) => console.show(&e.to_string()),
            },
            InputEvent::Keystroke => {}
            InputEvent::Failed(reason) => return Err(ClientError::Input(reason)),
        }
    }

    Ok(false)
}

/// Keep a session running, reconnecting after failures.
///
/// The failure counter only counts consecutive failed connects; it starts
/// over once a connection was established and then lost.
async fn connect_with_retry(
    url: &str,
    state: &mut ChatState,
    input: &mut mpsc::UnboundedReceiver<InputEvent>,
    console: &Console,
    clock: &dyn Clock,
) -> Result<SessionEnd, ClientError> {
    if let Some(name) = state.name() {
        console.set_prompt(chat_prompt(name.as_str()));
        console.show(&MessageFormatter::format_welcome(name.as_str()));
    }

    let mut failed_attempts = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} (attempt {}/{})",
            url,
            failed_attempts + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        let error = match run_client_session(url, state, input, console, clock, TYPING_TIMEOUT).await
        {
            Ok(end) => return Ok(end),
            Err(e) if should_exit_immediately(&e) => return Err(e),
            Err(e) => e,
        };

        if matches!(error, ClientError::ConnectionLost) {
            tracing::warn!("Connection lost");
            failed_attempts = 0;
        } else {
            tracing::warn!("Connection failed: {}", error);
            failed_attempts += 1;
        }

        if !should_attempt_reconnect(&error, failed_attempts, MAX_RECONNECT_ATTEMPTS) {
            tracing::error!(
                "Failed to reconnect after {} attempts. Exiting.",
                MAX_RECONNECT_ATTEMPTS
            );
            return Err(ClientError::ReconnectExhausted(MAX_RECONNECT_ATTEMPTS));
        }

        if failed_attempts == 0 {
            console.show(&MessageFormatter::format_disconnected());
        } else {
            console.show(&MessageFormatter::format_connection_error(
                failed_attempts,
                MAX_RECONNECT_ATTEMPTS,
            ));
        }

        tracing::info!("Reconnecting in {} seconds...", RECONNECT_INTERVAL_SECS);
        if let Some(end) = wait_before_reconnect(state, input, console, clock).await? {
            return Ok(end);
        }
    }
}

/// Sleep out the reconnect interval while keeping the input responsive.
///
/// Messages are rejected while disconnected. Returns `Some` if the user
/// logged out or closed the terminal in the meantime.
async fn wait_before_reconnect(
    state: &mut ChatState,
    input: &mut mpsc::UnboundedReceiver<InputEvent>,
    console: &Console,
    clock: &dyn Clock,
) -> Result<Option<SessionEnd>, ClientError> {
    let sleep = tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS));
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return Ok(None),
            event = input.recv() => match event {
                Some(InputEvent::Line(line)) if is_logout_command(&line) => {
                    // Nobody to notify while offline
                    state.logout();
                    return Ok(Some(SessionEnd::LoggedOut));
                }
                Some(InputEvent::Line(line)) => {
                    if state.compose_message(&line, clock.wall_clock()) != Err(SendRejected::Empty) {
                        console.show(&MessageFormatter::format_send_rejected());
                    }
                }
                Some(InputEvent::Keystroke) => {}
                Some(InputEvent::Failed(reason)) => return Err(ClientError::Input(reason)),
                None => return Ok(Some(SessionEnd::Quit)),
            },
        }
    }
}
