//! Chatzito relay hub.
//!
//! Relays chat messages, join/leave notices and typing indicators between
//! every connected client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chatzito-server
//! cargo run --bin chatzito-server -- --host 127.0.0.1 --port 3001
//! ```

use std::{collections::HashMap, sync::Arc, time::Duration};

use chatzito_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryConnectionRepository,
    },
    ui::Server,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, JoinChatUseCase,
        LeaveChatUseCase, RelayMessageUseCase, TypingUseCase,
    },
};
use chatzito_shared::{logger::setup_logger, time::SystemClock};
use clap::Parser;
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "chatzito-server")]
#[command(about = "WebSocket relay hub for the Chatzito chat", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3001")]
    port: u16,

    /// Silence (in milliseconds) after which a typing user is reported as stopped
    #[arg(long, default_value = "2500")]
    typing_timeout_ms: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Connection registry (in-memory)
    let repository = Arc::new(InMemoryConnectionRepository::new());

    // 2. MessagePusher (WebSocket implementation)
    let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(message_pusher_clients));

    // 3. UseCases
    let clock = Arc::new(SystemClock);
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let join_chat_usecase = Arc::new(JoinChatUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let leave_chat_usecase = Arc::new(LeaveChatUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock,
    ));
    let relay_message_usecase = Arc::new(RelayMessageUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let typing_usecase = Arc::new(TypingUseCase::new(
        repository,
        message_pusher,
        Duration::from_millis(args.typing_timeout_ms),
    ));

    // 4. Create and run the server
    let server = Server::new(
        connect_participant_usecase,
        disconnect_participant_usecase,
        join_chat_usecase,
        leave_chat_usecase,
        relay_message_usecase,
        typing_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
