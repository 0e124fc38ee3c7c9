//! UseCase: 退室処理（`user_left`）
//!
//! 全ての接続に「saiu da sala.」通知をブロードキャストします。
//! 接続の名前のバインドは解除しません（切断時に desconectou. 通知が続きます）。

use std::sync::Arc;

use chatzito_shared::time::Clock;

use crate::domain::{
    ChatLine, ConnectionRepository, MessagePusher, OutboundEvent, SystemNotice, UserName,
    WallClockTime,
};

use super::error::LeaveError;

/// 退室のユースケース
pub struct LeaveChatUseCase {
    repository: Arc<dyn ConnectionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl LeaveChatUseCase {
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

    /// 退室通知を全ての接続にブロードキャスト
    pub async fn execute(&self, user: UserName) -> Result<ChatLine, LeaveError> {
        let line = ChatLine::system(
            SystemNotice::Left,
            user,
            WallClockTime::now(self.clock.as_ref()),
        );
        let targets = self.repository.get_all_connection_ids().await;
        self.message_pusher
            .broadcast(targets, &OutboundEvent::System(line.clone()))
            .await
            .map_err(|e| LeaveError::BroadcastFailed(e.to_string()))?;

        Ok(line)
    }
}
