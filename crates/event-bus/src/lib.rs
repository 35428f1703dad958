//! # Pulseboard Event Bus
//!
//! The event bus provides the real-time communication backbone of the
//! service: every entity mutation and report lifecycle transition is
//! broadcast as a structured event, fanned out to all connected clients.
//!
//! ## Purpose
//!
//! - **Broadcasting report lifecycle events** as the generation worker moves
//!   reports through `pending → in_progress → completed | failed`
//! - **Relaying client-emitted events** (status pings, notifications) to
//!   every other connection
//! - **Providing structured payloads** whose TypeScript types are generated
//!   via ts-rs for frontend consumption
//!
//! ## Event Flow Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────┐    ┌─────────────────┐
//! │   Producers     │    │  Event Bus   │    │   Consumers     │
//! │                 │───▶│  (Broadcast) │───▶│   • WebSocket   │
//! │ • HTTP handlers │    │              │    │   • SSE feed    │
//! │ • Queue worker  │    │              │    │   • Frontend    │
//! │ • Channel relay │    │              │    │                 │
//! └─────────────────┘    └──────────────┘    └─────────────────┘
//! ```
//!
//! Delivery is best-effort: there is no replay buffer, and a disconnected
//! client misses whatever was published while it was away.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, Sender};
use ts_rs::TS;

pub mod subscribers;

pub use subscribers::{Subscriber, Subscribers};

use store::{Report, Team};

/// Identifies one live client connection on the channel
pub type ConnectionId = String;

/// Every event the service broadcasts, tagged with its wire name.
/// Serialized form: `{"event": "<name>", "data": {...}}`.
#[derive(Clone, Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/events.ts")]
#[serde(tag = "event", content = "data")]
pub enum PulseEvent {
    #[serde(rename = "user:connected")]
    UserConnected(UserConnectedPayload),
    #[serde(rename = "report:created")]
    ReportCreated(ReportCreatedPayload),
    #[serde(rename = "report:status")]
    ReportStatus(ReportStatusPayload),
    #[serde(rename = "report:status:update")]
    ReportStatusUpdate(ReportStatusPayload),
    #[serde(rename = "report:deleted")]
    ReportDeleted(ReportDeletedPayload),
    #[serde(rename = "dashboard:updated")]
    DashboardUpdated(DashboardUpdatedPayload),
    #[serde(rename = "dashboard:deleted")]
    DashboardDeleted(DashboardDeletedPayload),
    #[serde(rename = "team:created")]
    TeamCreated(TeamCreatedPayload),
    #[serde(rename = "team:updated")]
    TeamUpdated(TeamUpdatedPayload),
    #[serde(rename = "team:deleted")]
    TeamDeleted(TeamDeletedPayload),
    #[serde(rename = "notification:received")]
    NotificationReceived(NotificationPayload),
}

#[derive(Clone, Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/events.ts")]
#[serde(rename_all = "camelCase")]
pub struct UserConnectedPayload {
    pub user_id: String,
    pub connection_id: ConnectionId,
}

#[derive(Clone, Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/events.ts")]
#[serde(rename_all = "camelCase")]
pub struct ReportCreatedPayload {
    pub report_id: String,
    pub title: String,
    pub team: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/events.ts")]
#[serde(rename_all = "camelCase")]
pub struct ReportStatusPayload {
    pub report_id: String,
    pub status: String,
    pub progress: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/events.ts")]
#[serde(rename_all = "camelCase")]
pub struct ReportDeletedPayload {
    pub report_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/events.ts")]
#[serde(rename_all = "camelCase")]
pub struct DashboardUpdatedPayload {
    pub dashboard_id: String,
    /// Names of the fields the update touched
    pub changed: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/events.ts")]
#[serde(rename_all = "camelCase")]
pub struct DashboardDeletedPayload {
    pub dashboard_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/events.ts")]
#[serde(rename_all = "camelCase")]
pub struct TeamCreatedPayload {
    pub team_id: String,
    pub name: String,
    pub leader: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/events.ts")]
#[serde(rename_all = "camelCase")]
pub struct TeamUpdatedPayload {
    pub team_id: String,
    pub changed: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/events.ts")]
#[serde(rename_all = "camelCase")]
pub struct TeamDeletedPayload {
    pub team_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/events.ts")]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub user_id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: DateTime<Utc>,
}

impl PulseEvent {
    /// Wire name of the event, as the frontend sees it
    pub fn name(&self) -> &'static str {
        match self {
            PulseEvent::UserConnected(_) => "user:connected",
            PulseEvent::ReportCreated(_) => "report:created",
            PulseEvent::ReportStatus(_) => "report:status",
            PulseEvent::ReportStatusUpdate(_) => "report:status:update",
            PulseEvent::ReportDeleted(_) => "report:deleted",
            PulseEvent::DashboardUpdated(_) => "dashboard:updated",
            PulseEvent::DashboardDeleted(_) => "dashboard:deleted",
            PulseEvent::TeamCreated(_) => "team:created",
            PulseEvent::TeamUpdated(_) => "team:updated",
            PulseEvent::TeamDeleted(_) => "team:deleted",
            PulseEvent::NotificationReceived(_) => "notification:received",
        }
    }

    pub fn report_created(report: &Report) -> Self {
        PulseEvent::ReportCreated(ReportCreatedPayload {
            report_id: report.id.clone(),
            title: report.title.clone(),
            team: report.team.clone(),
        })
    }

    /// Status snapshot of a report after a transition or explicit update
    pub fn report_status(report: &Report) -> Self {
        PulseEvent::ReportStatus(ReportStatusPayload {
            report_id: report.id.clone(),
            status: report.status.to_string(),
            progress: report.progress,
        })
    }

    pub fn report_deleted(report_id: impl Into<String>) -> Self {
        PulseEvent::ReportDeleted(ReportDeletedPayload {
            report_id: report_id.into(),
        })
    }

    pub fn team_created(team: &Team) -> Self {
        PulseEvent::TeamCreated(TeamCreatedPayload {
            team_id: team.id.clone(),
            name: team.name.clone(),
            leader: team.leader.clone(),
        })
    }

    /// A notification stamped with the server-side time
    pub fn notification(
        user_id: impl Into<String>,
        message: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        PulseEvent::NotificationReceived(NotificationPayload {
            user_id: user_id.into(),
            message: message.into(),
            kind: kind.into(),
            timestamp: Utc::now(),
        })
    }
}

/// An event plus the connection that emitted it. Relayed client events carry
/// their origin so the channel can skip echoing them back to the sender;
/// server-originated events have no origin and reach every connection.
#[derive(Clone, Debug)]
pub struct EventEnvelope {
    pub origin: Option<ConnectionId>,
    pub event: PulseEvent,
}

impl EventEnvelope {
    /// True when this envelope should be delivered to the given connection
    pub fn is_for(&self, connection_id: &str) -> bool {
        self.origin.as_deref() != Some(connection_id)
    }
}

#[derive(Clone, Debug)]
pub struct EventBus {
    sender: Sender<EventEnvelope>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1024);
        Self { sender }
    }

    /// Broadcast a server-originated event to every connection.
    pub fn publish(&self, event: PulseEvent) {
        self.send(EventEnvelope {
            origin: None,
            event,
        });
    }

    /// Broadcast an event relayed from a client connection. The originating
    /// connection will not receive its own event back.
    pub fn publish_from(&self, origin: impl Into<ConnectionId>, event: PulseEvent) {
        self.send(EventEnvelope {
            origin: Some(origin.into()),
            event,
        });
    }

    fn send(&self, envelope: EventEnvelope) {
        if self.sender.send(envelope.clone()).is_err() {
            // No receivers connected; dropping the event is fine.
            tracing::debug!("No receivers for event: {}", envelope.event.name());
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = EventBus::new();
        let mut receiver = bus.subscribe();

        bus.publish(PulseEvent::report_deleted("r-1"));

        let envelope = receiver.recv().await.unwrap();
        assert!(envelope.origin.is_none());
        assert_eq!(envelope.event.name(), "report:deleted");
        assert!(envelope.is_for("any-connection"));
    }

    #[tokio::test]
    async fn test_publish_from_excludes_sender() {
        let bus = EventBus::new();
        let mut receiver = bus.subscribe();

        bus.publish_from(
            "conn-1",
            PulseEvent::NotificationReceived(NotificationPayload {
                user_id: "u-1".to_string(),
                message: "hi".to_string(),
                kind: "info".to_string(),
                timestamp: Utc::now(),
            }),
        );

        let envelope = receiver.recv().await.unwrap();
        assert_eq!(envelope.origin.as_deref(), Some("conn-1"));
        assert!(!envelope.is_for("conn-1"));
        assert!(envelope.is_for("conn-2"));
    }

    #[test]
    fn test_publish_without_receivers_is_silent() {
        let bus = EventBus::new();
        bus.publish(PulseEvent::report_deleted("r-1"));
    }

    #[test]
    fn test_wire_format() {
        let event = PulseEvent::ReportStatus(ReportStatusPayload {
            report_id: "r-1".to_string(),
            status: "completed".to_string(),
            progress: 100,
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "report:status");
        assert_eq!(json["data"]["reportId"], "r-1");
        assert_eq!(json["data"]["status"], "completed");
        assert_eq!(json["data"]["progress"], 100);
    }

    #[test]
    fn test_notification_carries_server_timestamp() {
        let event = PulseEvent::notification("u-1", "New report assigned: Q3", "info");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "notification:received");
        assert_eq!(json["data"]["type"], "info");
        assert!(json["data"]["timestamp"].is_string());
    }
}
