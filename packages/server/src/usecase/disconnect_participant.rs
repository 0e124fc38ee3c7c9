//! UseCase: 切断処理
//!
//! 接続をレジストリと MessagePusher から取り除き、名前がバインドされていた場合は
//! 残りの全ての接続に「desconectou.」通知をブロードキャストします。
//!
//! 切断したユーザーの入力中タイマーはここでは取り消しません。期限切れの
//! `typing(false)` が切断後に届くことがありますが、他の参加者の表示にしか影響しません。

use std::sync::Arc;

use chatzito_shared::time::Clock;

use crate::domain::{
    ChatLine, ConnectionId, ConnectionRepository, MessagePusher, OutboundEvent, SystemNotice,
    UserName, WallClockTime,
};

use super::error::DisconnectError;

/// 切断処理のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（接続レジストリの抽象化）
    repository: Arc<dyn ConnectionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// 切断処理を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(UserName))` - 名前がバインドされていた接続（通知をブロードキャスト済み）
    /// * `Ok(None)` - 名前がバインドされていなかった接続（通知なし）
    /// * `Err(DisconnectError)` - 未登録の接続、またはブロードキャスト失敗
    pub async fn execute(&self, id: ConnectionId) -> Result<Option<UserName>, DisconnectError> {
        let connection = self
            .repository
            .remove_connection(&id)
            .await
            .map_err(|_| DisconnectError::NotConnected(id.to_string()))?;

        self.message_pusher.unregister_client(&id).await;

        let Some(name) = connection.name else {
            return Ok(None);
        };

        let notice = OutboundEvent::System(ChatLine::system(
            SystemNotice::Disconnected,
            name.clone(),
            WallClockTime::now(self.clock.as_ref()),
        ));
        let targets = self.repository.get_all_connection_ids().await;
        self.message_pusher
            .broadcast(targets, &notice)
            .await
            .map_err(|e| DisconnectError::BroadcastFailed(e.to_string()))?;

        Ok(Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Connection, MessagePusher},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryConnectionRepository,
        },
    };
    use chatzito_shared::time::FixedClock;
    use chrono::{Local, TimeZone};
    use tokio::sync::mpsc;

    struct Fixture {
        repository: Arc<InMemoryConnectionRepository>,
        pusher: Arc<WebSocketMessagePusher>,
        usecase: DisconnectParticipantUseCase,
    }

    fn fixture() -> Fixture {
        let repository = Arc::new(InMemoryConnectionRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let clock = FixedClock::new(Local.with_ymd_and_hms(2024, 1, 15, 10, 0, 5).unwrap());
        let usecase =
            DisconnectParticipantUseCase::new(repository.clone(), pusher.clone(), Arc::new(clock));
        Fixture {
            repository,
            pusher,
            usecase,
        }
    }

    async fn connect(
        fixture: &Fixture,
        name: Option<&str>,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let id = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        fixture
            .repository
            .add_connection(Connection::new(id, WallClockTime::new("10:00:00")))
            .await
            .unwrap();
        if let Some(name) = name {
            fixture
                .repository
                .bind_name(&id, UserName::from(name))
                .await
                .unwrap();
        }
        fixture.pusher.register_client(id, tx).await;
        (id, rx)
    }

    #[tokio::test]
    async fn test_disconnect_named_connection_broadcasts_notice() {
        // テスト項目: 名前付き接続の切断時、残りの接続に desconectou. 通知が届く
        // given (前提条件):
        let fixture = fixture();
        let (ana, _ana_rx) = connect(&fixture, Some("Ana")).await;
        let (_bea, mut bea_rx) = connect(&fixture, Some("Bea")).await;

        // when (操作):
        let result = fixture.usecase.execute(ana).await;

        // then (期待する結果):
        assert_eq!(result, Ok(Some(UserName::from("Ana"))));
        assert_eq!(
            bea_rx.recv().await.unwrap(),
            r#"{"event":"system","data":{"type":"system","text":"desconectou.","user":"Ana","timestamp":"10:00:05"}}"#
        );
        assert_eq!(fixture.repository.count_connections().await, 1);
    }

    #[tokio::test]
    async fn test_disconnect_unnamed_connection_is_silent() {
        // テスト項目: 名前がバインドされていない接続の切断では通知しない
        // given (前提条件):
        let fixture = fixture();
        let (anonymous, _rx) = connect(&fixture, None).await;
        let (_bea, mut bea_rx) = connect(&fixture, Some("Bea")).await;

        // when (操作):
        let result = fixture.usecase.execute(anonymous).await;

        // then (期待する結果):
        assert_eq!(result, Ok(None));
        assert!(bea_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_disconnect_last_connection() {
        // テスト項目: 最後の接続が切断されても（通知対象なし）成功する
        // given (前提条件):
        let fixture = fixture();
        let (ana, _rx) = connect(&fixture, Some("Ana")).await;

        // when (操作):
        let result = fixture.usecase.execute(ana).await;

        // then (期待する結果):
        assert_eq!(result, Ok(Some(UserName::from("Ana"))));
        assert_eq!(fixture.repository.count_connections().await, 0);
    }

    #[tokio::test]
    async fn test_disconnect_unknown_connection_fails() {
        // テスト項目: 未登録の接続の切断はエラーになる
        // given (前提条件):
        let fixture = fixture();

        // when (操作):
        let result = fixture.usecase.execute(ConnectionId::generate()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(DisconnectError::NotConnected(_))));
    }
}
