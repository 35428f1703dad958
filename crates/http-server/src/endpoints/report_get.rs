use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::error::ApiResult;
use crate::views::{report_view, ReportView};
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use store::StoreError;
use ts_rs::TS;

#[derive(Deserialize, Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct ReportPathRequest {
    pub id: String,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct ReportGetResponses {
    #[serde(rename = "200")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<ReportView>,
}

pub struct ReportGetEndpointConfig;

impl EndpointConfigTypes for ReportGetEndpointConfig {
    type PathRequest = ReportPathRequest;
    type BodyRequest = EmptyRequest;
    type QueryRequest = EmptyRequest;
    type Response = ReportGetResponses;
}

define_endpoint! {
    ReportGetEndpoint,
    ReportGetEndpointDef,
    Get,
    "/reports/{id}",
    ts_path_type = "\"/api/reports/${string}\"",
    config = ReportGetEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

pub async fn report_get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReportView>> {
    let report = state
        .store
        .get_report(&id)
        .ok_or_else(|| StoreError::not_found("Report", &id))?;

    Ok(Json(report_view(&state.store, &report)))
}
