//! Conversion logic between DTOs and domain entities.

use crate::domain::{
    ChatLine, LineKind, OutboundEvent, TypingNotice, UserName, WallClockTime,
};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Entity
// ========================================

impl From<dto::LineType> for LineKind {
    fn from(dto: dto::LineType) -> Self {
        match dto {
            dto::LineType::Message => LineKind::Message,
            dto::LineType::System => LineKind::System,
        }
    }
}

impl From<dto::ChatLine> for ChatLine {
    fn from(dto: dto::ChatLine) -> Self {
        Self {
            kind: dto.r#type.into(),
            text: dto.text,
            user: UserName::new(dto.user),
            timestamp: WallClockTime::new(dto.timestamp),
        }
    }
}

impl From<dto::TypingPayload> for TypingNotice {
    fn from(dto: dto::TypingPayload) -> Self {
        Self {
            user: UserName::new(dto.user),
            is_typing: dto.is_typing,
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<LineKind> for dto::LineType {
    fn from(kind: LineKind) -> Self {
        match kind {
            LineKind::Message => dto::LineType::Message,
            LineKind::System => dto::LineType::System,
        }
    }
}

impl From<ChatLine> for dto::ChatLine {
    fn from(model: ChatLine) -> Self {
        Self {
            r#type: model.kind.into(),
            text: model.text,
            user: model.user.into_string(),
            timestamp: model.timestamp.into_string(),
        }
    }
}

impl From<TypingNotice> for dto::TypingPayload {
    fn from(model: TypingNotice) -> Self {
        Self {
            user: model.user.into_string(),
            is_typing: model.is_typing,
        }
    }
}

impl From<OutboundEvent> for dto::ServerEvent {
    fn from(event: OutboundEvent) -> Self {
        match event {
            OutboundEvent::Message(line) => dto::ServerEvent::Message(line.into()),
            OutboundEvent::System(line) => dto::ServerEvent::System(line.into()),
            OutboundEvent::Typing(notice) => dto::ServerEvent::Typing(notice.into()),
        }
    }
}
