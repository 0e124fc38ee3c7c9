//! UseCase: メッセージ中継処理（`message`）
//!
//! 受け取ったメッセージをそのまま、送信者を含む全ての接続にブロードキャストします。
//! 送信者は `user` フィールドと自分の名前を比較して自分のメッセージを見分けます。

use std::sync::Arc;

use crate::domain::{ChatLine, ConnectionId, ConnectionRepository, MessagePusher, OutboundEvent};

use super::error::RelayError;

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    repository: Arc<dyn ConnectionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayMessageUseCase {
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// メッセージ中継を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - ブロードキャスト対象の接続 ID リスト
    /// * `Err(RelayError)` - ブロードキャスト失敗
    pub async fn execute(&self, line: ChatLine) -> Result<Vec<ConnectionId>, RelayError> {
        let targets = self.repository.get_all_connection_ids().await;
        self.message_pusher
            .broadcast(targets.clone(), &OutboundEvent::Message(line))
            .await
            .map_err(|e| RelayError::BroadcastFailed(e.to_string()))?;

        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Connection, LineKind, MockMessagePusher, UserName, WallClockTime},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryConnectionRepository,
        },
    };
    use tokio::sync::mpsc;

    fn line(text: &str) -> ChatLine {
        ChatLine {
            kind: LineKind::Message,
            text: text.to_string(),
            user: UserName::from("Bea"),
            timestamp: WallClockTime::new("10:00:00"),
        }
    }

    async fn register(
        repository: &InMemoryConnectionRepository,
        pusher: &WebSocketMessagePusher,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let id = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        repository
            .add_connection(Connection::new(id, WallClockTime::new("09:59:00")))
            .await
            .unwrap();
        pusher.register_client(id, tx).await;
        (id, rx)
    }

    #[tokio::test]
    async fn test_relay_reaches_sender_and_others_unmodified() {
        // テスト項目: メッセージは送信者を含む全員に、内容を変えずに届く
        // given (前提条件):
        let repository = Arc::new(InMemoryConnectionRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let (bea, mut bea_rx) = register(&repository, &pusher).await;
        let (caio, mut caio_rx) = register(&repository, &pusher).await;
        let usecase = RelayMessageUseCase::new(repository, pusher);

        // when (操作):
        let targets = usecase.execute(line("oi")).await.unwrap();

        // then (期待する結果):
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&bea) && targets.contains(&caio));
        let expected = r#"{"event":"message","data":{"type":"message","text":"oi","user":"Bea","timestamp":"10:00:00"}}"#;
        assert_eq!(bea_rx.recv().await.unwrap(), expected);
        assert_eq!(caio_rx.recv().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_relay_passes_line_verbatim_to_pusher() {
        // テスト項目: MessagePusher に渡されるイベントは受け取った行そのもの
        // given (前提条件):
        let repository = Arc::new(InMemoryConnectionRepository::new());
        repository
            .add_connection(Connection::new(
                ConnectionId::generate(),
                WallClockTime::new("09:59:00"),
            ))
            .await
            .unwrap();
        let mut pusher = MockMessagePusher::new();
        let expected = OutboundEvent::Message(line("  espaços  "));
        pusher
            .expect_broadcast()
            .withf(move |targets, event| targets.len() == 1 && *event == expected)
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = RelayMessageUseCase::new(repository, Arc::new(pusher));

        // when (操作):
        let result = usecase.execute(line("  espaços  ")).await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_relay_without_connections() {
        // テスト項目: 接続がない場合でもエラーにならない
        // given (前提条件):
        let repository = Arc::new(InMemoryConnectionRepository::new());
        let usecase =
            RelayMessageUseCase::new(repository, Arc::new(WebSocketMessagePusher::default()));

        // when (操作):
        let result = usecase.execute(line("oi")).await;

        // then (期待する結果):
        assert_eq!(result, Ok(vec![]));
    }
}
