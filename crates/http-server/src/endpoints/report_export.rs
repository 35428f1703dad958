use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::endpoints::report_get::ReportPathRequest;
use crate::error::ApiResult;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use store::StoreError;
use ts_rs::TS;

/// Download shape: content fields plus raw reference ids, no populated
/// display records. Exports are meant to be re-importable elsewhere.
#[derive(Serialize, Deserialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(rename_all = "camelCase")]
pub struct ReportExportResponse {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub kind: String,
    #[ts(type = "Record<string, unknown>")]
    pub data: Map<String, Value>,
    #[ts(type = "Record<string, unknown>")]
    pub metadata: Map<String, Value>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub team: String,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct ReportExportResponses {
    #[serde(rename = "200")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<ReportExportResponse>,
}

pub struct ReportExportEndpointConfig;

impl EndpointConfigTypes for ReportExportEndpointConfig {
    type PathRequest = ReportPathRequest;
    type BodyRequest = EmptyRequest;
    type QueryRequest = EmptyRequest;
    type Response = ReportExportResponses;
}

define_endpoint! {
    ReportExportEndpoint,
    ReportExportEndpointDef,
    Get,
    "/reports/{id}/export",
    ts_path_type = "\"/api/reports/${string}/export\"",
    config = ReportExportEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

pub async fn report_export_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let report = state
        .store
        .get_report(&id)
        .ok_or_else(|| StoreError::not_found("Report", &id))?;

    let export = ReportExportResponse {
        title: report.title,
        description: report.description,
        kind: report.kind.to_string(),
        data: report.data,
        metadata: report.metadata,
        created_at: report.created_at,
        created_by: report.created_by,
        team: report.team,
    };

    Ok((
        [(
            header::CONTENT_DISPOSITION,
            "attachment; filename=report-export.json",
        )],
        Json(export),
    ))
}
