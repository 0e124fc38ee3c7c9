//! Domain layer: value objects, entities and the interfaces the hub depends on.

pub mod broadcast;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use broadcast::select_targets;
pub use entity::{ChatLine, Connection, LineKind, OutboundEvent, SystemNotice, TypingNotice};
pub use error::{MessagePushError, RepositoryError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::ConnectionRepository;
pub use value_object::{ConnectionId, UserName, WallClockTime};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
