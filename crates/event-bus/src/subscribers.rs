//! Connection → user bookkeeping for the live channel
//!
//! Connections register with a `join` message after their user id has been
//! validated, and are removed on disconnect. The registry is process-wide
//! state and resets on restart. All sends are broadcasts; the mapping exists
//! for observability, not targeted delivery.

use crate::ConnectionId;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One registered connection
#[derive(Clone, Debug, Serialize, Deserialize, TS, PartialEq, Eq)]
#[ts(export, export_to = "../../../packages/frontend/src/events.ts")]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub user_id: String,
    pub connection_id: ConnectionId,
}

/// Registry of currently connected, joined clients
#[derive(Debug, Default)]
pub struct Subscribers {
    connections: DashMap<ConnectionId, String>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    pub fn join(&self, connection_id: impl Into<ConnectionId>, user_id: impl Into<String>) {
        self.connections.insert(connection_id.into(), user_id.into());
    }

    /// Remove a connection, returning the user it was joined as.
    pub fn leave(&self, connection_id: &str) -> Option<String> {
        self.connections
            .remove(connection_id)
            .map(|(_, user_id)| user_id)
    }

    pub fn user_for(&self, connection_id: &str) -> Option<String> {
        self.connections
            .get(connection_id)
            .map(|entry| entry.value().clone())
    }

    /// Current registrations, ordered by user id for stable output.
    pub fn snapshot(&self) -> Vec<Subscriber> {
        let mut subscribers: Vec<Subscriber> = self
            .connections
            .iter()
            .map(|entry| Subscriber {
                user_id: entry.value().clone(),
                connection_id: entry.key().clone(),
            })
            .collect();
        subscribers.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        subscribers
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_and_leave() {
        let subscribers = Subscribers::new();
        subscribers.join("conn-1", "user-a");
        subscribers.join("conn-2", "user-b");

        assert_eq!(subscribers.len(), 2);
        assert_eq!(subscribers.user_for("conn-1").as_deref(), Some("user-a"));

        assert_eq!(subscribers.leave("conn-1").as_deref(), Some("user-a"));
        assert!(subscribers.user_for("conn-1").is_none());
        assert_eq!(subscribers.len(), 1);
    }

    #[test]
    fn test_leave_unknown_connection_is_none() {
        let subscribers = Subscribers::new();
        assert!(subscribers.leave("ghost").is_none());
    }

    #[test]
    fn test_rejoin_replaces_user() {
        let subscribers = Subscribers::new();
        subscribers.join("conn-1", "user-a");
        subscribers.join("conn-1", "user-b");

        assert_eq!(subscribers.len(), 1);
        assert_eq!(subscribers.user_for("conn-1").as_deref(), Some("user-b"));
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let subscribers = Subscribers::new();
        subscribers.join("conn-2", "zoe");
        subscribers.join("conn-1", "amir");

        let snapshot = subscribers.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].user_id, "amir");
        assert_eq!(snapshot[1].user_id, "zoe");
    }
}
