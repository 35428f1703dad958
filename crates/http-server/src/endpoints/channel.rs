//! Bidirectional live channel.
//!
//! Clients connect over WebSocket, announce themselves with a `join` frame,
//! and from then on receive every broadcast event except the ones they
//! emitted themselves. Inbound frames use the same tagged wire shape as
//! outbound events: `{"event": "<name>", "data": {...}}`.

use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use event_bus::{PulseEvent, ReportStatusPayload, UserConnectedPayload};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    pub user_id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Frames clients may send over the channel
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(tag = "event", content = "data")]
pub enum ChannelMessage {
    #[serde(rename = "join")]
    Join(JoinPayload),
    #[serde(rename = "report:status")]
    ReportStatus(ReportStatusPayload),
    #[serde(rename = "notification:create")]
    NotificationCreate(NotificationDraft),
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct ChannelResponses {
    // The channel upgrades to a WebSocket; there is no JSON response body
}

pub struct ChannelEndpointConfig;

impl EndpointConfigTypes for ChannelEndpointConfig {
    type PathRequest = EmptyRequest;
    type BodyRequest = EmptyRequest;
    type QueryRequest = EmptyRequest;
    type Response = ChannelResponses;
}

define_endpoint! {
    ChannelEndpoint,
    ChannelEndpointDef,
    Get,
    "/channel",
    ts_path_type = "\"/api/channel\"",
    config = ChannelEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

pub async fn channel_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| channel_connection(socket, state))
}

async fn channel_connection(socket: WebSocket, state: AppState) {
    let connection_id = uuid::Uuid::new_v4().to_string();
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.event_bus.subscribe();

    tracing::info!("Channel connection established: {}", connection_id);

    loop {
        tokio::select! {
            inbound = receiver.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = handle_channel_message(&state, &connection_id, &text) {
                            if sender.send(Message::Text(reply.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::warn!("Channel error for {}: {}", connection_id, e);
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
            outbound = events.recv() => {
                match outbound {
                    Ok(envelope) => {
                        if !envelope.is_for(&connection_id) {
                            continue;
                        }
                        match serde_json::to_string(&envelope.event) {
                            Ok(json) => {
                                if sender.send(Message::Text(json.into())).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => tracing::error!("Failed to serialize event: {}", e),
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Channel {} lagged, skipped {} events", connection_id, skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    match state.subscribers.leave(&connection_id) {
        Some(user_id) => {
            tracing::info!("Channel connection closed: {} (user {})", connection_id, user_id);
        }
        None => tracing::info!("Channel connection closed: {}", connection_id),
    }
}

/// Apply one inbound frame. Returns a JSON string to send back directly on
/// the originating socket, if the frame warrants an acknowledgement.
fn handle_channel_message(state: &AppState, connection_id: &str, text: &str) -> Option<String> {
    let message: ChannelMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Ignoring malformed channel frame: {}", e);
            return None;
        }
    };

    match message {
        ChannelMessage::Join(payload) => {
            if state.store.get_user(&payload.user_id).is_none() {
                tracing::warn!("Join for unknown user {} ignored", payload.user_id);
                return None;
            }
            state.subscribers.join(connection_id, &payload.user_id);

            let ack = PulseEvent::UserConnected(UserConnectedPayload {
                user_id: payload.user_id,
                connection_id: connection_id.to_string(),
            });
            match serde_json::to_string(&ack) {
                Ok(json) => Some(json),
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                    None
                }
            }
        }
        ChannelMessage::ReportStatus(payload) => {
            state
                .event_bus
                .publish_from(connection_id, PulseEvent::ReportStatusUpdate(payload));
            None
        }
        ChannelMessage::NotificationCreate(draft) => {
            state.event_bus.publish_from(
                connection_id,
                PulseEvent::notification(draft.user_id, draft.message, draft.kind),
            );
            None
        }
    }
}
