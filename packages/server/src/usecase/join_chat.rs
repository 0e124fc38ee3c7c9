//! UseCase: 入室処理（`user_joined`）
//!
//! 接続に名前をバインドし、送信者を含む全ての接続に「entrou na sala.」通知を
//! ブロードキャストします。名前の一意性はチェックしません。

use std::sync::Arc;

use chatzito_shared::time::Clock;

use crate::domain::{
    ChatLine, ConnectionId, ConnectionRepository, MessagePusher, OutboundEvent, SystemNotice,
    UserName, WallClockTime,
};

use super::error::JoinError;

/// 入室のユースケース
pub struct JoinChatUseCase {
    repository: Arc<dyn ConnectionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinChatUseCase {
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

    /// 入室を実行
    ///
    /// # Arguments
    ///
    /// * `from` - `user_joined` を送った接続
    /// * `user` - 名乗った名前
    ///
    /// # Returns
    ///
    /// * `Ok(ChatLine)` - ブロードキャストした入室通知
    /// * `Err(JoinError)` - 未登録の接続、またはブロードキャスト失敗
    pub async fn execute(&self, from: ConnectionId, user: UserName) -> Result<ChatLine, JoinError> {
        let newly_bound = self
            .repository
            .bind_name(&from, user.clone())
            .await
            .map_err(|_| JoinError::NotConnected(from.to_string()))?;
        if !newly_bound {
            tracing::warn!(
                "Connection '{}' already has a name bound, keeping it (joined again as '{}')",
                from,
                user
            );
        }

        let line = ChatLine::system(
            SystemNotice::Joined,
            user,
            WallClockTime::now(self.clock.as_ref()),
        );
        let targets = self.repository.get_all_connection_ids().await;
        self.message_pusher
            .broadcast(targets, &OutboundEvent::System(line.clone()))
            .await
            .map_err(|e| JoinError::BroadcastFailed(e.to_string()))?;

        Ok(line)
    }
}
