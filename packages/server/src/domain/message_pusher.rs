//! MessagePusher trait 定義
//!
//! 接続へのイベント送信（通知）の抽象化。
//! WebSocket による実装は `infrastructure::message_pusher` にあります。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, OutboundEvent};

/// Outbound channel of one connection (serialized frames)
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Pushes hub events to registered connections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャネルを登録
    async fn register_client(&self, id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャネルを登録解除
    async fn unregister_client(&self, id: &ConnectionId);

    /// 複数の接続にイベントを送信（一部の送信失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;
}
