//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, UserName},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::ConnectError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StatusCode> {
    let connection_id = ConnectionId::generate();

    // Create a channel for this connection to receive events
    let (tx, rx) = mpsc::unbounded_channel();

    match state
        .connect_participant_usecase
        .execute(connection_id, tx)
        .await
    {
        Ok(connection) => {
            tracing::info!(
                "Connection '{}' opened at {}",
                connection_id,
                connection.connected_at.as_str()
            );
            Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id, rx)))
        }
        Err(ConnectError::AlreadyRegistered(id)) => {
            tracing::warn!("Connection '{}' is already registered. Rejecting.", id);
            Err(StatusCode::CONFLICT)
        }
    }
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - Channel receiver for frames addressed to this connection
/// * `sender` - WebSocket sink of this connection
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Route one inbound event to its use case.
async fn dispatch_event(state: &AppState, connection_id: ConnectionId, event: ClientEvent) {
    let name = event.name();
    let result = match event {
        ClientEvent::UserJoined(payload) => state
            .join_chat_usecase
            .execute(connection_id, UserName::new(payload.user))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ClientEvent::UserLeft(payload) => state
            .leave_chat_usecase
            .execute(UserName::new(payload.user))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ClientEvent::Message(line) => state
            .relay_message_usecase
            .execute(line.into())
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ClientEvent::Typing(payload) => state
            .typing_usecase
            .update(connection_id, UserName::new(payload.user), payload.is_typing)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ClientEvent::StopTyping(payload) => state
            .typing_usecase
            .stop(connection_id, UserName::new(payload.user))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
    };

    if let Err(e) = result {
        tracing::warn!(
            "Failed to handle '{}' from connection '{}': {}",
            name,
            connection_id,
            e
        );
    }
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();

    // Events of one connection are handled one at a time, in arrival order
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", connection_id, text.as_str());

                    match serde_json::from_str::<ClientEvent>(text.as_str()) {
                        Ok(event) => dispatch_event(&state_clone, connection_id, event).await,
                        Err(e) => {
                            tracing::warn!(
                                "Dropping malformed frame from '{}': {}",
                                connection_id,
                                e
                            );
                        }
                    }
                }
                Message::Binary(data) => {
                    tracing::debug!(
                        "Ignoring {} bytes of binary data from '{}'",
                        data.len(),
                        connection_id
                    );
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    match state
        .disconnect_participant_usecase
        .execute(connection_id)
        .await
    {
        Ok(Some(name)) => {
            tracing::info!("Connection '{}' ('{}') disconnected", connection_id, name);
        }
        Ok(None) => {
            tracing::info!("Connection '{}' disconnected before joining", connection_id);
        }
        Err(e) => {
            tracing::warn!("Failed to disconnect '{}': {}", connection_id, e);
        }
    }
}
