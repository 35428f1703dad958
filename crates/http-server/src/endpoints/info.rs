use crate::contract::{EmptyRequest, EndpointConfigTypes, CONTRACT_VERSION};
use crate::define_endpoint;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct ServerInfoResponse {
    pub name: String,
    pub version: String,
    pub port: u16,
    pub contract_version: u32,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct InfoResponses {
    #[serde(rename = "200")]
    pub ok: ServerInfoResponse,
}

pub struct InfoEndpointConfig;

impl EndpointConfigTypes for InfoEndpointConfig {
    type PathRequest = EmptyRequest;
    type BodyRequest = EmptyRequest;
    type QueryRequest = EmptyRequest;
    type Response = InfoResponses;
}

define_endpoint! {
    InfoEndpoint,
    InfoEndpointDef,
    Get,
    "/info",
    ts_path_type = "\"/api/info\"",
    config = InfoEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

/// Server identity plus the contract version the frontend was generated
/// against, so a stale bundle can detect itself.
pub async fn info_handler(port: u16) -> Json<ServerInfoResponse> {
    Json(ServerInfoResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        port,
        contract_version: CONTRACT_VERSION,
    })
}
