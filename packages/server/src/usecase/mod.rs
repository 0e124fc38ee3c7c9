//! UseCase 層
//!
//! ハブが受け取る各イベントに対応するユースケース。
//! Repository と MessagePusher の trait にのみ依存します。

pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod join_chat;
pub mod leave_chat;
pub mod relay_message;
pub mod typing;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, DisconnectError, JoinError, LeaveError, RelayError, TypingError};
pub use join_chat::JoinChatUseCase;
pub use leave_chat::LeaveChatUseCase;
pub use relay_message::RelayMessageUseCase;
pub use typing::TypingUseCase;
