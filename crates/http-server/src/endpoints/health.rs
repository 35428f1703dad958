use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Serialize, Deserialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct HealthResponses {
    #[serde(rename = "200")]
    pub ok: HealthResponse,
}

pub struct HealthEndpointConfig;

impl EndpointConfigTypes for HealthEndpointConfig {
    type PathRequest = EmptyRequest;
    type BodyRequest = EmptyRequest;
    type QueryRequest = EmptyRequest;
    type Response = HealthResponses;
}

define_endpoint! {
    HealthEndpoint,
    HealthEndpointDef,
    Get,
    "/health",
    ts_path_type = "\"/api/health\"",
    config = HealthEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

/// Liveness probe. Answers as soon as the router is serving.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
