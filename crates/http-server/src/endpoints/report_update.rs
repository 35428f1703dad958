use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::endpoints::report_get::ReportPathRequest;
use crate::error::{ApiError, ApiResult};
use crate::identity::CurrentUser;
use crate::views::{report_view, ReportView};
use crate::AppState;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use event_bus::PulseEvent;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use store::{ReportPatch, StoreError};
use ts_rs::TS;

#[derive(Deserialize, Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportRequest {
    #[ts(optional)]
    pub title: Option<String>,
    #[ts(optional)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    #[ts(optional)]
    pub kind: Option<String>,
    #[ts(optional)]
    #[ts(type = "Record<string, unknown>")]
    pub data: Option<Map<String, Value>>,
    /// Administrative override of the pipeline-owned state
    #[ts(optional)]
    pub status: Option<String>,
    #[ts(optional)]
    pub progress: Option<i64>,
    #[ts(optional)]
    #[ts(type = "Record<string, unknown>")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct ReportUpdateResponses {
    #[serde(rename = "200")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<ReportView>,
}

pub struct ReportUpdateEndpointConfig;

impl EndpointConfigTypes for ReportUpdateEndpointConfig {
    type PathRequest = ReportPathRequest;
    type BodyRequest = UpdateReportRequest;
    type QueryRequest = EmptyRequest;
    type Response = ReportUpdateResponses;
}

define_endpoint! {
    ReportUpdateEndpoint,
    ReportUpdateEndpointDef,
    Put,
    "/reports/{id}",
    ts_path_type = "\"/api/reports/${string}\"",
    config = ReportUpdateEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

/// Owner-or-admin patch. A status override broadcasts the report's resulting
/// state, so passive listeners stay in sync with manual corrections too.
pub async fn report_update_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateReportRequest>,
) -> ApiResult<Json<ReportView>> {
    let report = state
        .store
        .get_report(&id)
        .ok_or_else(|| StoreError::not_found("Report", &id))?;
    if !user.can_modify(&report.created_by) {
        return Err(ApiError::forbidden());
    }

    let status_override = payload.status.is_some();
    let updated = state.store.update_report(
        &id,
        ReportPatch {
            title: payload.title,
            description: payload.description,
            kind: payload.kind,
            data: payload.data,
            status: payload.status,
            progress: payload.progress,
            metadata: payload.metadata,
        },
    )?;

    if status_override {
        state.event_bus.publish(PulseEvent::report_status(&updated));
    }
    tracing::info!("Updated report {}", updated.id);

    Ok(Json(report_view(&state.store, &updated)))
}
