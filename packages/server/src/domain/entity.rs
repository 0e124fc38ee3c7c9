//! Domain entities.
//!
//! Every entity here is transient: it lives only for the duration of a
//! connection or of a single relay.

use super::value_object::{ConnectionId, UserName, WallClockTime};

/// Kind of a chat log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// User-authored message
    Message,
    /// Server-synthesized join/leave/disconnect notice
    System,
}

/// Server-synthesized notices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemNotice {
    Joined,
    Left,
    Disconnected,
}

impl SystemNotice {
    /// Localized notice text, rendered after the user name
    pub fn text(&self) -> &'static str {
        match self {
            SystemNotice::Joined => "entrou na sala.",
            SystemNotice::Left => "saiu da sala.",
            SystemNotice::Disconnected => "desconectou.",
        }
    }
}

/// One line of the chat log (message or system notice)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub kind: LineKind,
    pub text: String,
    pub user: UserName,
    pub timestamp: WallClockTime,
}

impl ChatLine {
    /// Build a system notice line about `user`
    pub fn system(notice: SystemNotice, user: UserName, timestamp: WallClockTime) -> Self {
        Self {
            kind: LineKind::System,
            text: notice.text().to_string(),
            user,
            timestamp,
        }
    }
}

/// Typing indicator state change for one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingNotice {
    pub user: UserName,
    pub is_typing: bool,
}

impl TypingNotice {
    pub fn started(user: UserName) -> Self {
        Self {
            user,
            is_typing: true,
        }
    }

    pub fn stopped(user: UserName) -> Self {
        Self {
            user,
            is_typing: false,
        }
    }
}

/// Events the hub pushes to connections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    Message(ChatLine),
    System(ChatLine),
    Typing(TypingNotice),
}

/// An open connection and the name bound to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub name: Option<UserName>,
    pub connected_at: WallClockTime,
}

impl Connection {
    pub fn new(id: ConnectionId, connected_at: WallClockTime) -> Self {
        Self {
            id,
            name: None,
            connected_at,
        }
    }

    /// Bind a display name to this connection.
    ///
    /// Only the first name sticks; returns `false` if a name was already bound.
    pub fn bind_name(&mut self, name: UserName) -> bool {
        if self.name.is_some() {
            return false;
        }
        self.name = Some(name);
        true
    }
}
