//! Broadcast target selection.

use super::value_object::ConnectionId;

/// Select broadcast targets from all open connections.
///
/// # Arguments
///
/// * `all` - Every registered connection
/// * `exclude` - A connection to leave out (usually the sender), or `None` to target everyone
///
/// # Returns
///
/// The connections that should receive the event
pub fn select_targets(all: Vec<ConnectionId>, exclude: Option<&ConnectionId>) -> Vec<ConnectionId> {
    match exclude {
        Some(excluded) => all.into_iter().filter(|id| id != excluded).collect(),
        None => all,
    }
}
