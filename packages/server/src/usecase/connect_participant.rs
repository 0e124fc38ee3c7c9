//! UseCase: 接続登録処理
//!
//! 新しい WebSocket 接続をレジストリと MessagePusher に登録します。
//! 名前のバインドは `user_joined` イベント（JoinChatUseCase）で行われます。

use std::sync::Arc;

use chatzito_shared::time::Clock;

use crate::domain::{
    Connection, ConnectionId, ConnectionRepository, MessagePusher, PusherChannel, RepositoryError,
    WallClockTime,
};

use super::error::ConnectError;

/// 接続登録のユースケース
pub struct ConnectParticipantUseCase {
    /// Repository（接続レジストリの抽象化）
    repository: Arc<dyn ConnectionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
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

    /// 接続登録を実行
    ///
    /// # Arguments
    ///
    /// * `id` - 接続 ID
    /// * `sender` - この接続への送信チャネル
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - 登録された接続
    /// * `Err(ConnectError)` - 同じ接続 ID が既に登録されている
    pub async fn execute(
        &self,
        id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<Connection, ConnectError> {
        let connection = Connection::new(id, WallClockTime::now(self.clock.as_ref()));

        self.repository
            .add_connection(connection.clone())
            .await
            .map_err(|e| match e {
                RepositoryError::AlreadyRegistered(id) | RepositoryError::ConnectionNotFound(id) => {
                    ConnectError::AlreadyRegistered(id)
                }
            })?;

        self.message_pusher.register_client(id, sender).await;

        Ok(connection)
    }

    /// 接続数を取得
    pub async fn count_connections(&self) -> usize {
        self.repository.count_connections().await
    }
}
