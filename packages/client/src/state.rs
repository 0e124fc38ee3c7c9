//! Per-session chat state.
//!
//! `ChatState` is a plain value: it never performs I/O. Every transition
//! returns the events (if any) the caller has to put on the wire, so the
//! whole client protocol can be tested without a socket.

use chatzito_server::{
    domain::SystemNotice,
    infrastructure::dto::websocket::{ChatLine, ClientEvent, LineType, ServerEvent},
};

use crate::{
    domain::DisplayName,
    error::{NameError, SendRejected},
};

/// Coarse session phase derived from the state fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unnamed,
    Disconnected,
    Connected,
}

/// What an inbound event did to the state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// The line was appended to the log
    Appended(ChatLine),
    /// Our own join notice echoed back by the hub
    Suppressed,
    TypingStarted(String),
    TypingStopped(String),
    /// Typing event about ourselves or without a user
    Ignored,
}

/// Typing indicator shown under the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypingIndicator {
    Single(String),
    Multiple,
}

#[derive(Debug, Default)]
pub struct ChatState {
    name: Option<DisplayName>,
    connected: bool,
    messages: Vec<ChatLine>,
    // insertion-ordered set of remote typists
    typing_users: Vec<String>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&DisplayName> {
        self.name.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn messages(&self) -> &[ChatLine] {
        &self.messages
    }

    pub fn typing_users(&self) -> &[String] {
        &self.typing_users
    }

    pub fn phase(&self) -> Phase {
        match (&self.name, self.connected) {
            (None, _) => Phase::Unnamed,
            (Some(_), false) => Phase::Disconnected,
            (Some(_), true) => Phase::Connected,
        }
    }

    /// Accept the name typed at the prompt.
    pub fn set_name(&mut self, raw: &str) -> Result<&DisplayName, NameError> {
        if let Some(current) = &self.name {
            return Err(NameError::AlreadyNamed(current.to_string()));
        }
        let name = DisplayName::parse(raw)?;
        Ok(&*self.name.insert(name))
    }

    /// Mark the connection as open and return the announcement to send.
    ///
    /// Returns `None` while unnamed; nothing is announced then.
    pub fn on_connected(&mut self) -> Option<ClientEvent> {
        let name = self.name.as_ref()?;
        self.connected = true;
        Some(ClientEvent::user_joined(name.as_str()))
    }

    /// Mark the connection as lost. Remote typists are forgotten.
    pub fn on_disconnected(&mut self) {
        self.connected = false;
        self.typing_users.clear();
    }

    /// Leave the chat: back to name entry with an empty log.
    ///
    /// Returns the departure notice to send, if a name was set.
    pub fn logout(&mut self) -> Option<ClientEvent> {
        let name = self.name.take()?;
        self.connected = false;
        self.messages.clear();
        self.typing_users.clear();
        Some(ClientEvent::user_left(name.as_str()))
    }

    /// Apply one event received from the hub.
    pub fn apply(&mut self, event: ServerEvent) -> Inbound {
        match event {
            ServerEvent::Message(line) => self.append(line),
            ServerEvent::System(line) => {
                if self.is_own_join_notice(&line) {
                    Inbound::Suppressed
                } else {
                    self.append(line)
                }
            }
            ServerEvent::Typing(payload) => {
                if payload.user.is_empty() || self.is_own_name(&payload.user) {
                    return Inbound::Ignored;
                }
                if payload.is_typing {
                    if !self.typing_users.contains(&payload.user) {
                        self.typing_users.push(payload.user.clone());
                    }
                    Inbound::TypingStarted(payload.user)
                } else {
                    self.typing_users.retain(|user| *user != payload.user);
                    Inbound::TypingStopped(payload.user)
                }
            }
        }
    }

    /// Drop `user` from the typing set after its local debounce window.
    ///
    /// Returns `true` if the set changed.
    pub fn expire_typing(&mut self, user: &str) -> bool {
        let before = self.typing_users.len();
        self.typing_users.retain(|typist| typist != user);
        before != self.typing_users.len()
    }

    /// Build the events for sending `text`: the message itself followed by
    /// the sender's stop-typing signal.
    pub fn compose_message(
        &self,
        text: &str,
        timestamp: String,
    ) -> Result<[ClientEvent; 2], SendRejected> {
        let name = self.name.as_ref().ok_or(SendRejected::Unnamed)?;
        if text.trim().is_empty() {
            return Err(SendRejected::Empty);
        }
        if !self.connected {
            return Err(SendRejected::Disconnected);
        }

        let line = ChatLine {
            r#type: LineType::Message,
            text: text.to_string(),
            user: name.to_string(),
            timestamp,
        };
        Ok([
            ClientEvent::Message(line),
            ClientEvent::stop_typing(name.as_str()),
        ])
    }

    /// Typing signal for a keystroke in the message field.
    pub fn keystroke(&self) -> Option<ClientEvent> {
        match (&self.name, self.connected) {
            (Some(name), true) => Some(ClientEvent::typing(name.as_str(), true)),
            _ => None,
        }
    }

    pub fn typing_indicator(&self) -> Option<TypingIndicator> {
        match self.typing_users.as_slice() {
            [] => None,
            [user] => Some(TypingIndicator::Single(user.clone())),
            _ => Some(TypingIndicator::Multiple),
        }
    }

    fn append(&mut self, line: ChatLine) -> Inbound {
        self.messages.push(line.clone());
        Inbound::Appended(line)
    }

    fn is_own_name(&self, user: &str) -> bool {
        self.name.as_ref().is_some_and(|name| name.as_str() == user)
    }

    fn is_own_join_notice(&self, line: &ChatLine) -> bool {
        line.text == SystemNotice::Joined.text() && self.is_own_name(&line.user)
    }
}
