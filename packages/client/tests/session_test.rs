//! Client sessions against a live hub.

use std::{sync::Arc, time::Duration};

use chatzito_client::{
    input::InputEvent,
    session::{SessionEnd, run_client_session},
    state::ChatState,
    ui::Console,
};
use chatzito_server::{
    infrastructure::{
        dto::websocket::{ChatLine, ClientEvent, LineType, ServerEvent, TypingPayload},
        message_pusher::WebSocketMessagePusher,
        repository::InMemoryConnectionRepository,
    },
    ui::Server,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, JoinChatUseCase,
        LeaveChatUseCase, RelayMessageUseCase, TypingUseCase,
    },
};
use chatzito_shared::time::FixedClock;
use chrono::{Local, TimeZone};
use futures_util::{SinkExt, StreamExt};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::{mpsc, watch},
    task::JoinHandle,
    time::timeout,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const HUB_TYPING_TIMEOUT: Duration = Duration::from_millis(300);
const CLIENT_TYPING_TIMEOUT: Duration = Duration::from_millis(100);
const RECV_TIMEOUT: Duration = Duration::from_secs(3);

fn ten_o_clock() -> FixedClock {
    FixedClock::new(Local.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap())
}

async fn start_hub() -> String {
    let repository = Arc::new(InMemoryConnectionRepository::new());
    let pusher = Arc::new(WebSocketMessagePusher::default());
    let clock = Arc::new(ten_o_clock());

    let server = Server::new(
        Arc::new(ConnectParticipantUseCase::new(
            repository.clone(),
            pusher.clone(),
            clock.clone(),
        )),
        Arc::new(DisconnectParticipantUseCase::new(
            repository.clone(),
            pusher.clone(),
            clock.clone(),
        )),
        Arc::new(JoinChatUseCase::new(
            repository.clone(),
            pusher.clone(),
            clock.clone(),
        )),
        Arc::new(LeaveChatUseCase::new(
            repository.clone(),
            pusher.clone(),
            clock,
        )),
        Arc::new(RelayMessageUseCase::new(repository.clone(), pusher.clone())),
        Arc::new(TypingUseCase::new(repository, pusher, HUB_TYPING_TIMEOUT)),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.serve(listener, std::future::pending()));

    format!("ws://{}/ws", addr)
}

/// Raw protocol peer watching what the client under test sends
struct Observer {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Observer {
    async fn join(url: &str, name: &str) -> Self {
        let (stream, _response) = connect_async(url).await.unwrap();
        let mut observer = Self { stream };
        let json = serde_json::to_string(&ClientEvent::user_joined(name)).unwrap();
        observer
            .stream
            .send(Message::Text(json.into()))
            .await
            .unwrap();
        assert_eq!(observer.recv().await, system("entrou na sala.", name));
        observer
    }

    async fn recv(&mut self) -> ServerEvent {
        loop {
            let msg = timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for event")
                .expect("stream ended")
                .expect("websocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    async fn assert_silent(&mut self, window: Duration) {
        if let Ok(Some(Ok(Message::Text(text)))) = timeout(window, self.stream.next()).await {
            panic!("unexpected event: {}", text.as_str());
        }
    }
}

fn system(text: &str, user: &str) -> ServerEvent {
    ServerEvent::System(ChatLine {
        r#type: LineType::System,
        text: text.to_string(),
        user: user.to_string(),
        timestamp: "10:00:00".to_string(),
    })
}

fn typing(user: &str, is_typing: bool) -> ServerEvent {
    ServerEvent::Typing(TypingPayload {
        user: user.to_string(),
        is_typing,
    })
}

/// Run a session named `name` in the background, driven by the returned sender
fn spawn_session(
    url: String,
    name: &str,
) -> (
    mpsc::UnboundedSender<InputEvent>,
    JoinHandle<(Result<SessionEnd, chatzito_client::error::ClientError>, ChatState)>,
) {
    let mut state = ChatState::new();
    state.set_name(name).unwrap();
    let (input_tx, mut input) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        let (prompt_tx, _prompt_rx) = watch::channel(String::new());
        let console = Console::new(prompt_tx);
        let clock = ten_o_clock();
        let result = run_client_session(
            &url,
            &mut state,
            &mut input,
            &console,
            &clock,
            CLIENT_TYPING_TIMEOUT,
        )
        .await;
        (result, state)
    });

    (input_tx, handle)
}

#[tokio::test]
async fn test_session_joins_chats_and_leaves() {
    // テスト項目: セッションは入室、入力中通知、送信、退室を順に行う
    // given (前提条件):
    let url = start_hub().await;
    let mut caio = Observer::join(&url, "Caio").await;
    let (input_tx, session) = spawn_session(url, "Bea");
    assert_eq!(caio.recv().await, system("entrou na sala.", "Bea"));

    // when (操作):
    input_tx.send(InputEvent::Keystroke).unwrap();
    input_tx.send(InputEvent::Line("oi".to_string())).unwrap();

    // then (期待する結果):
    assert_eq!(caio.recv().await, typing("Bea", true));
    assert_eq!(
        caio.recv().await,
        ServerEvent::Message(ChatLine {
            r#type: LineType::Message,
            text: "oi".to_string(),
            user: "Bea".to_string(),
            timestamp: "10:00:00".to_string(),
        })
    );
    assert_eq!(caio.recv().await, typing("Bea", false));

    // 入力が閉じられると退室して終了する
    drop(input_tx);
    assert_eq!(caio.recv().await, system("saiu da sala.", "Bea"));
    assert_eq!(caio.recv().await, system("desconectou.", "Bea"));

    let (result, state) = session.await.unwrap();
    assert!(matches!(result, Ok(SessionEnd::Quit)));
    assert!(state.name().is_none());
}

#[tokio::test]
async fn test_idle_keystroke_sends_stop_typing_once() {
    // テスト項目: キー入力の後に無操作が続くと stop_typing が一度だけ送られる
    // given (前提条件):
    let url = start_hub().await;
    let mut caio = Observer::join(&url, "Caio").await;
    let (input_tx, _session) = spawn_session(url, "Bea");
    assert_eq!(caio.recv().await, system("entrou na sala.", "Bea"));

    // when (操作):
    input_tx.send(InputEvent::Keystroke).unwrap();
    input_tx.send(InputEvent::Keystroke).unwrap();

    // then (期待する結果):
    assert_eq!(caio.recv().await, typing("Bea", true));
    assert_eq!(caio.recv().await, typing("Bea", true));
    assert_eq!(caio.recv().await, typing("Bea", false));
    caio.assert_silent(HUB_TYPING_TIMEOUT * 2).await;
}

#[tokio::test]
async fn test_logout_command_leaves_and_ends_session() {
    // テスト項目: /sair を入力すると退室通知を送り、名前入力状態に戻る
    // given (前提条件):
    let url = start_hub().await;
    let mut caio = Observer::join(&url, "Caio").await;
    let (input_tx, session) = spawn_session(url, "Bea");
    assert_eq!(caio.recv().await, system("entrou na sala.", "Bea"));

    // when (操作):
    input_tx.send(InputEvent::Line("/sair".to_string())).unwrap();

    // then (期待する結果):
    assert_eq!(caio.recv().await, system("saiu da sala.", "Bea"));
    let (result, state) = session.await.unwrap();
    assert!(matches!(result, Ok(SessionEnd::LoggedOut)));
    assert!(state.name().is_none());
    assert!(state.messages().is_empty());
}

#[tokio::test]
async fn test_terminal_failure_leaves_and_reports_input_error() {
    // テスト項目: 端末の読み込みが失敗すると退室通知を送り、入力エラーでセッションを終える
    // given (前提条件):
    let url = start_hub().await;
    let mut caio = Observer::join(&url, "Caio").await;
    let (input_tx, session) = spawn_session(url, "Bea");
    assert_eq!(caio.recv().await, system("entrou na sala.", "Bea"));

    // when (操作):
    input_tx
        .send(InputEvent::Failed("terminal gone".to_string()))
        .unwrap();

    // then (期待する結果):
    assert_eq!(caio.recv().await, system("saiu da sala.", "Bea"));
    let (result, state) = session.await.unwrap();
    assert!(matches!(
        result,
        Err(chatzito_client::error::ClientError::Input(reason)) if reason == "terminal gone"
    ));
    assert!(!state.is_connected());
}
