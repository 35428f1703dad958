use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::error::{ApiError, ApiResult};
use crate::identity::CurrentUser;
use crate::queue::Job;
use crate::views::{report_view, ReportView};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use event_bus::PulseEvent;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use store::NewReport;
use ts_rs::TS;

#[derive(Deserialize, Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub title: String,
    #[ts(optional)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub kind: String,
    #[ts(optional)]
    #[ts(type = "Record<string, unknown>")]
    pub data: Option<Map<String, Value>>,
    pub team: String,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    #[ts(optional)]
    #[ts(type = "Record<string, unknown>")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct ReportCreateResponses {
    #[serde(rename = "201")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<ReportView>,
}

pub struct ReportCreateEndpointConfig;

impl EndpointConfigTypes for ReportCreateEndpointConfig {
    type PathRequest = EmptyRequest;
    type BodyRequest = CreateReportRequest;
    type QueryRequest = EmptyRequest;
    type Response = ReportCreateResponses;
}

define_endpoint! {
    ReportCreateEndpoint,
    ReportCreateEndpointDef,
    Post,
    "/reports",
    ts_path_type = "\"/api/reports\"",
    config = ReportCreateEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

/// Persists the report and enqueues its generation job. The report is
/// returned in its stored (pending) form; generation progress arrives over
/// the event feeds. If the job cannot be enqueued the report stays persisted
/// and the request fails, so a client can retry by updating it.
pub async fn report_create_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateReportRequest>,
) -> ApiResult<(StatusCode, Json<ReportView>)> {
    let report = state.store.create_report(NewReport {
        title: payload.title,
        description: payload.description,
        kind: payload.kind,
        data: payload.data,
        team: payload.team,
        created_by: user.id().to_string(),
        assigned_to: payload.assigned_to,
        metadata: payload.metadata,
    })?;

    let job = Job::GenerateReport {
        report_id: report.id.clone(),
    };
    if let Err(e) = state.job_dispatcher.dispatch(job).await {
        return Err(ApiError::Internal(e.context(format!(
            "Failed to enqueue generation job for report {}",
            report.id
        ))));
    }

    state.event_bus.publish(PulseEvent::report_created(&report));
    for assignee in &report.assigned_to {
        state.event_bus.publish(PulseEvent::notification(
            assignee,
            format!("New report assigned: {}", report.title),
            "info",
        ));
    }
    tracing::info!("Created report {} ({})", report.id, report.title);

    Ok((StatusCode::CREATED, Json(report_view(&state.store, &report))))
}
