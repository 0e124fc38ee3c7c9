//! WebSocket client session management.
//!
//! One session lives from a successful connect to either a deliberate exit
//! or a dropped connection. The session owns two debounce tables: one that
//! expires remote typists locally, and one that sends our own stop-typing
//! signal after a quiet period.

use std::time::Duration;

use chatzito_server::infrastructure::dto::websocket::{ClientEvent, ServerEvent};
use chatzito_shared::{
    presence::{DebouncedPresence, Expired},
    time::Clock,
};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use crate::{
    domain::is_logout_command,
    error::{ClientError, SendRejected},
    formatter::MessageFormatter,
    input::InputEvent,
    state::{ChatState, Inbound, TypingIndicator},
    ui::Console,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Tables keyed by user name
type TypingTable = DebouncedPresence<String>;
type TypingExpiry = mpsc::UnboundedReceiver<Expired<String, ()>>;

/// How a session ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// `/sair`: back to name entry
    LoggedOut,
    /// The terminal closed: exit the program
    Quit,
}

/// Typing indicator as last printed.
///
/// Only changes are printed, including the change back to nobody typing.
#[derive(Debug, Default)]
struct TypingView {
    shown: Option<TypingIndicator>,
}

impl TypingView {
    /// Text to print if `current` differs from what is on screen
    fn update(&mut self, current: Option<TypingIndicator>) -> Option<String> {
        if self.shown == current {
            return None;
        }
        let text = MessageFormatter::format_typing_status(current.as_ref());
        self.shown = current;
        Some(text)
    }
}

/// Per-session typing state: remote typists, our own stop-typing timer and
/// the indicator on screen.
struct Typing {
    remote: TypingTable,
    remote_expired: TypingExpiry,
    local: TypingTable,
    local_expired: TypingExpiry,
    view: TypingView,
}

impl Typing {
    fn new(timeout: Duration) -> Self {
        let (remote, remote_expired) = TypingTable::new(timeout);
        let (local, local_expired) = TypingTable::new(timeout);
        Self {
            remote,
            remote_expired,
            local,
            local_expired,
            view: TypingView::default(),
        }
    }

    /// Cancel both tables. Returns how many timers were pending.
    async fn teardown(&mut self) -> usize {
        self.view = TypingView::default();
        self.remote.cancel_all().await + self.local.cancel_all().await
    }
}

/// Connect to `url` and run the chat until the user leaves or the
/// connection drops.
///
/// A dropped connection is reported as [`ClientError::ConnectionLost`]; a
/// failed connect as [`ClientError::ConnectionError`].
pub async fn run_client_session(
    url: &str,
    state: &mut ChatState,
    input: &mut mpsc::UnboundedReceiver<InputEvent>,
    console: &Console,
    clock: &dyn Clock,
    typing_timeout: Duration,
) -> Result<SessionEnd, ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    tracing::info!("Connected to chat server at {}", url);

    let (mut write, mut read) = ws_stream.split();

    let Some(joined) = state.on_connected() else {
        tracing::warn!("Connected without a display name, closing");
        write.close().await.ok();
        return Ok(SessionEnd::LoggedOut);
    };
    console.show(&MessageFormatter::format_connected());
    let own_name = state.name().map(|name| name.as_str());
    console.show(&MessageFormatter::format_log(state.messages(), own_name));

    let mut typing = Typing::new(typing_timeout);

    let outcome = match send_event(&mut write, &joined).await {
        Ok(()) => {
            event_loop(
                &mut write,
                &mut read,
                state,
                input,
                console,
                clock,
                &mut typing,
            )
            .await
        }
        Err(e) => Err(e),
    };

    // Teardown: no timer outlives the session
    let cancelled = typing.teardown().await;
    tracing::debug!("Session ended, cancelled {} typing timers", cancelled);
    if state.is_connected() {
        state.on_disconnected();
    }

    outcome
}

async fn event_loop(
    write: &mut WsSink,
    read: &mut WsSource,
    state: &mut ChatState,
    input: &mut mpsc::UnboundedReceiver<InputEvent>,
    console: &Console,
    clock: &dyn Clock,
    typing: &mut Typing,
) -> Result<SessionEnd, ClientError> {
    loop {
        let step = tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    handle_frame(text.as_str(), state, typing, console).await;
                    Ok(None)
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    Err(ClientError::ConnectionLost)
                }
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    Err(ClientError::ConnectionLost)
                }
                Some(Ok(_)) => Ok(None),
            },
            event = input.recv() => match event {
                Some(InputEvent::Line(line)) if is_logout_command(&line) => {
                    leave(write, state, &typing.local).await.map(|()| Some(SessionEnd::LoggedOut))
                }
                Some(InputEvent::Line(line)) => {
                    send_line(&line, write, state, &typing.local, console, clock).await.map(|()| None)
                }
                Some(InputEvent::Keystroke) => {
                    keystroke(write, state, &typing.local).await.map(|()| None)
                }
                Some(InputEvent::Failed(reason)) => {
                    tracing::error!("Terminal input failed: {}", reason);
                    leave(write, state, &typing.local)
                        .await
                        .and(Err(ClientError::Input(reason)))
                }
                None => leave(write, state, &typing.local).await.map(|()| Some(SessionEnd::Quit)),
            },
            Some(expired) = typing.remote_expired.recv() => {
                expire_remote(&expired.key, state, typing, console);
                Ok(None)
            }
            Some(expired) = typing.local_expired.recv() => {
                send_event(write, &ClientEvent::stop_typing(expired.key)).await.map(|()| None)
            }
        };

        match step {
            Ok(None) => {}
            Ok(Some(end)) => return Ok(end),
            Err(e) => return Err(e),
        }
    }
}

/// Apply one text frame from the hub and render its effect.
///
/// Returns the typing status line if the indicator changed.
async fn handle_frame(
    text: &str,
    state: &mut ChatState,
    typing: &mut Typing,
    console: &Console,
) -> Option<String> {
    let event = match serde_json::from_str::<ServerEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Ignoring unrecognized frame: {}", e);
            return None;
        }
    };

    match state.apply(event) {
        Inbound::Appended(line) => {
            let own_name = state.name().map(|name| name.as_str());
            console.show(&MessageFormatter::format_line(&line, own_name));
            None
        }
        Inbound::TypingStarted(user) => {
            typing.remote.refresh(user, ()).await;
            show_typing(state, &mut typing.view, console)
        }
        Inbound::TypingStopped(user) => {
            typing.remote.cancel(&user).await;
            show_typing(state, &mut typing.view, console)
        }
        Inbound::Suppressed | Inbound::Ignored => None,
    }
}

/// Drop a remote typist whose local window elapsed.
fn expire_remote(
    user: &str,
    state: &mut ChatState,
    typing: &mut Typing,
    console: &Console,
) -> Option<String> {
    if !state.expire_typing(user) {
        return None;
    }
    tracing::debug!("Typing indicator for '{}' expired", user);
    show_typing(state, &mut typing.view, console)
}

fn show_typing(state: &ChatState, view: &mut TypingView, console: &Console) -> Option<String> {
    let text = view.update(state.typing_indicator())?;
    console.show(&text);
    Some(text)
}

async fn send_line(
    line: &str,
    write: &mut WsSink,
    state: &ChatState,
    local_typing: &TypingTable,
    console: &Console,
    clock: &dyn Clock,
) -> Result<(), ClientError> {
    match state.compose_message(line, clock.wall_clock()) {
        Ok(events) => {
            if let Some(name) = state.name() {
                local_typing.cancel(&name.to_string()).await;
            }
            for event in &events {
                send_event(write, event).await?;
            }
            Ok(())
        }
        Err(SendRejected::Empty) => Ok(()),
        Err(e) => {
            tracing::debug!("Message not sent: {}", e);
            console.show(&MessageFormatter::format_send_rejected());
            Ok(())
        }
    }
}

async fn keystroke(
    write: &mut WsSink,
    state: &ChatState,
    local_typing: &TypingTable,
) -> Result<(), ClientError> {
    let (Some(event), Some(name)) = (state.keystroke(), state.name()) else {
        return Ok(());
    };
    local_typing.refresh(name.to_string(), ()).await;
    send_event(write, &event).await
}

/// Announce the departure and close the socket.
async fn leave(
    write: &mut WsSink,
    state: &mut ChatState,
    local_typing: &TypingTable,
) -> Result<(), ClientError> {
    local_typing.cancel_all().await;
    if let Some(event) = state.logout() {
        send_event(write, &event).await?;
    }
    write.close().await.ok();
    Ok(())
}

async fn send_event(write: &mut WsSink, event: &ClientEvent) -> Result<(), ClientError> {
    let json = serde_json::to_string(event)?;
    write.send(Message::Text(json.into())).await.map_err(|e| {
        tracing::warn!("Failed to send '{}': {}", event.name(), e);
        ClientError::ConnectionLost
    })
}
