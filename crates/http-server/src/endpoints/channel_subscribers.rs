use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use event_bus::Subscriber;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct SubscriberListResponse {
    pub subscribers: Vec<Subscriber>,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct ChannelSubscribersResponses {
    #[serde(rename = "200")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<SubscriberListResponse>,
}

pub struct ChannelSubscribersEndpointConfig;

impl EndpointConfigTypes for ChannelSubscribersEndpointConfig {
    type PathRequest = EmptyRequest;
    type BodyRequest = EmptyRequest;
    type QueryRequest = EmptyRequest;
    type Response = ChannelSubscribersResponses;
}

define_endpoint! {
    ChannelSubscribersEndpoint,
    ChannelSubscribersEndpointDef,
    Get,
    "/channel/subscribers",
    ts_path_type = "\"/api/channel/subscribers\"",
    config = ChannelSubscribersEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

/// Who is currently joined on the live channel.
pub async fn channel_subscribers_handler(
    State(state): State<AppState>,
) -> Json<SubscriberListResponse> {
    Json(SubscriberListResponse {
        subscribers: state.subscribers.snapshot(),
    })
}
