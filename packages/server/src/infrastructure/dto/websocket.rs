//! WebSocket event DTOs.
//!
//! Every text frame carries one named event:
//!
//! ```text
//! {"event": "<name>", "data": { ...payload... }}
//! ```

use serde::{Deserialize, Serialize};

/// Kind of a chat line on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    Message,
    System,
}

/// Chat line payload: `{type, text, user, timestamp}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLine {
    pub r#type: LineType,
    pub text: String,
    pub user: String,
    pub timestamp: String,
}

/// Payload carrying only a user name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    pub user: String,
}

/// Typing indicator payload: `{user, isTyping}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingPayload {
    pub user: String,
    #[serde(rename = "isTyping", default)]
    pub is_typing: bool,
}

/// Events sent from a client to the hub
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    UserJoined(UserPayload),
    UserLeft(UserPayload),
    Message(ChatLine),
    Typing(TypingPayload),
    StopTyping(UserPayload),
}

/// Events sent from the hub to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Message(ChatLine),
    System(ChatLine),
    Typing(TypingPayload),
}

impl ClientEvent {
    pub fn user_joined(user: impl Into<String>) -> Self {
        ClientEvent::UserJoined(UserPayload { user: user.into() })
    }

    pub fn user_left(user: impl Into<String>) -> Self {
        ClientEvent::UserLeft(UserPayload { user: user.into() })
    }

    pub fn typing(user: impl Into<String>, is_typing: bool) -> Self {
        ClientEvent::Typing(TypingPayload {
            user: user.into(),
            is_typing,
        })
    }

    pub fn stop_typing(user: impl Into<String>) -> Self {
        ClientEvent::StopTyping(UserPayload { user: user.into() })
    }

    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::UserJoined(_) => "user_joined",
            ClientEvent::UserLeft(_) => "user_left",
            ClientEvent::Message(_) => "message",
            ClientEvent::Typing(_) => "typing",
            ClientEvent::StopTyping(_) => "stop_typing",
        }
    }
}
