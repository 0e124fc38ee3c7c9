//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, JoinChatUseCase, LeaveChatUseCase,
    RelayMessageUseCase, TypingUseCase,
};

use super::{handler::websocket_handler, signal::shutdown_signal, state::AppState};

/// Errors that stop the hub
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// WebSocket relay hub
///
/// Owns the use cases (and through them the connection registry and the
/// typing timer table) for the lifetime of the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(connect, disconnect, join, leave, relay, typing);
/// server.run("0.0.0.0".to_string(), 3001).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
        join_chat_usecase: Arc<JoinChatUseCase>,
        leave_chat_usecase: Arc<LeaveChatUseCase>,
        relay_message_usecase: Arc<RelayMessageUseCase>,
        typing_usecase: Arc<TypingUseCase>,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                connect_participant_usecase,
                disconnect_participant_usecase,
                join_chat_usecase,
                leave_chat_usecase,
                relay_message_usecase,
                typing_usecase,
            }),
        }
    }

    /// Build the axum router
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind to `host:port` and serve until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr.clone(),
                source,
            })?;

        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!("Chat relay hub listening on {}", listener.local_addr()?);

        let typing_usecase = self.state.typing_usecase.clone();
        let expiry_task = typing_usecase.spawn_expiry_loop();

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await;

        expiry_task.abort();
        let cancelled = typing_usecase.shutdown().await;
        tracing::info!(
            "Server shutdown complete ({} pending typing timers cancelled)",
            cancelled
        );

        result.map_err(ServerError::from)
    }
}
