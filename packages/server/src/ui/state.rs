//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, JoinChatUseCase, LeaveChatUseCase,
    RelayMessageUseCase, TypingUseCase,
};

/// Shared application state (one per hub)
pub struct AppState {
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    pub join_chat_usecase: Arc<JoinChatUseCase>,
    pub leave_chat_usecase: Arc<LeaveChatUseCase>,
    pub relay_message_usecase: Arc<RelayMessageUseCase>,
    pub typing_usecase: Arc<TypingUseCase>,
}
