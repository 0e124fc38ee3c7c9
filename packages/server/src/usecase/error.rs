//! UseCase error types.

use thiserror::Error;

/// 接続登録時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("Connection '{0}' is already registered")]
    AlreadyRegistered(String),
}

/// 切断処理時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisconnectError {
    #[error("Connection '{0}' is not registered")]
    NotConnected(String),

    #[error("Failed to broadcast disconnect notice: {0}")]
    BroadcastFailed(String),
}

/// 入室処理時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("Connection '{0}' is not registered")]
    NotConnected(String),

    #[error("Failed to broadcast join notice: {0}")]
    BroadcastFailed(String),
}

/// 退室処理時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveError {
    #[error("Failed to broadcast leave notice: {0}")]
    BroadcastFailed(String),
}

/// メッセージ中継時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("Failed to broadcast message: {0}")]
    BroadcastFailed(String),
}

/// 入力中通知の処理時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypingError {
    #[error("Failed to broadcast typing notice: {0}")]
    BroadcastFailed(String),
}
