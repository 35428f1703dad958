use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::AppState;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::Stream;
use futures_util::StreamExt;
use serde::Serialize;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use ts_rs::TS;

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct EventsResponses {
    // SSE responses don't need structured response types; events stream as
    // `pulse-event` frames whose data is a serialized PulseEvent
}

pub struct EventsEndpointConfig;

impl EndpointConfigTypes for EventsEndpointConfig {
    type PathRequest = EmptyRequest;
    type BodyRequest = EmptyRequest;
    type QueryRequest = EmptyRequest;
    type Response = EventsResponses;
}

define_endpoint! {
    EventsEndpoint,
    EventsEndpointDef,
    Get,
    "/events",
    ts_path_type = "\"/api/events\"",
    config = EventsEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

/// Read-only Server-Sent Events feed of everything the service broadcasts.
/// Consumers that also need to emit use the WebSocket channel instead.
pub async fn events_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.event_bus.subscribe();

    let stream = BroadcastStream::new(receiver).filter_map(|result| async move {
        match result {
            Ok(envelope) => match serde_json::to_string(&envelope.event) {
                Ok(json) => Some(Ok(Event::default().event("pulse-event").data(json))),
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Event stream lagged: {}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
