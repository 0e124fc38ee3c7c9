//! UseCase: 入力中インジケーター（`typing` / `stop_typing`）
//!
//! - `typing(user, true)`: 送信者以外に転送し、ユーザーの期限タイマーを再始動
//! - `typing(user, false)`: 送信者以外に転送するだけ（タイマーには触れない）
//! - `stop_typing(user)`: タイマーを取り消し、送信者以外に `typing(user, false)` を転送
//! - タイマー期限切れ: 最後にタイマーを更新した接続以外に `typing(user, false)` を送信
//!
//! タイマーテーブルはこのユースケースが所有し、ハブの起動・停止と寿命を共にします。

use std::{sync::Arc, time::Duration};

use chatzito_shared::presence::{DebouncedPresence, Expired};
use tokio::{
    sync::{Mutex, mpsc},
    task::JoinHandle,
};

use crate::domain::{
    ConnectionId, ConnectionRepository, MessagePusher, OutboundEvent, TypingNotice, UserName,
    select_targets,
};

use super::error::TypingError;

type TypingExpiry = mpsc::UnboundedReceiver<Expired<UserName, ConnectionId>>;

/// 入力中インジケーターのユースケース
pub struct TypingUseCase {
    repository: Arc<dyn ConnectionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    /// ユーザー名 → 最後にタイマーを更新した接続
    timers: DebouncedPresence<UserName, ConnectionId>,
    /// 期限切れ通知の受信側（`spawn_expiry_loop` が取り出す）
    expired: Mutex<Option<TypingExpiry>>,
}

impl TypingUseCase {
    /// 新しい TypingUseCase を作成
    ///
    /// # Arguments
    ///
    /// * `timeout` - 最後の入力からの無音期間（通常 2.5 秒）
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        timeout: Duration,
    ) -> Self {
        let (timers, expired) = DebouncedPresence::new(timeout);
        Self {
            repository,
            message_pusher,
            timers,
            expired: Mutex::new(Some(expired)),
        }
    }

    /// `typing` イベントを処理
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - 転送先の接続 ID リスト（送信者を除く）
    pub async fn update(
        &self,
        from: ConnectionId,
        user: UserName,
        is_typing: bool,
    ) -> Result<Vec<ConnectionId>, TypingError> {
        let notice = TypingNotice {
            user: user.clone(),
            is_typing,
        };
        let targets = self.forward(&from, notice).await?;

        if is_typing {
            let replaced = self.timers.refresh(user.clone(), from).await;
            tracing::debug!(
                "Typing timer for '{}' {}",
                user,
                if replaced { "restarted" } else { "started" }
            );
        }

        Ok(targets)
    }

    /// `stop_typing` イベントを処理
    pub async fn stop(
        &self,
        from: ConnectionId,
        user: UserName,
    ) -> Result<Vec<ConnectionId>, TypingError> {
        if self.timers.cancel(&user).await.is_some() {
            tracing::debug!("Typing timer for '{}' cancelled", user);
        }
        self.forward(&from, TypingNotice::stopped(user)).await
    }

    /// 期限切れ通知を処理するタスクを起動
    ///
    /// サーバー停止時に返された `JoinHandle` を abort してください。
    pub fn spawn_expiry_loop(self: &Arc<Self>) -> JoinHandle<()> {
        let usecase = Arc::clone(self);
        tokio::spawn(async move {
            let Some(mut expired) = usecase.expired.lock().await.take() else {
                tracing::warn!("Typing expiry loop is already running");
                return;
            };

            while let Some(Expired { key: user, value: origin }) = expired.recv().await {
                tracing::debug!("Typing timer for '{}' expired", user);
                if let Err(e) = usecase.forward(&origin, TypingNotice::stopped(user)).await {
                    tracing::warn!("Failed to broadcast typing expiry: {}", e);
                }
            }
        })
    }

    /// 保留中の全てのタイマーを取り消す
    pub async fn shutdown(&self) -> usize {
        self.timers.cancel_all().await
    }

    /// 保留中のタイマー数
    pub async fn pending_timers(&self) -> usize {
        self.timers.len().await
    }

    pub async fn is_typing(&self, user: &UserName) -> bool {
        self.timers.is_pending(user).await
    }

    async fn forward(
        &self,
        from: &ConnectionId,
        notice: TypingNotice,
    ) -> Result<Vec<ConnectionId>, TypingError> {
        let all = self.repository.get_all_connection_ids().await;
        let targets = select_targets(all, Some(from));
        self.message_pusher
            .broadcast(targets.clone(), &OutboundEvent::Typing(notice))
            .await
            .map_err(|e| TypingError::BroadcastFailed(e.to_string()))?;
        Ok(targets)
    }
}
