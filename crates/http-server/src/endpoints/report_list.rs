use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::pagination::Page;
use crate::views::{report_view, ReportView};
use crate::AppState;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use store::ReportFilter;
use ts_rs::TS;

#[derive(Deserialize, Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct ReportListQueryRequest {
    #[ts(optional)]
    pub page: Option<i32>,
    #[ts(optional)]
    pub limit: Option<i32>,
    /// Case-insensitive match on title and description
    #[ts(optional)]
    pub search: Option<String>,
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    #[ts(optional)]
    pub kind: Option<String>,
    #[ts(optional)]
    pub status: Option<String>,
    #[ts(optional)]
    pub team: Option<String>,
}

#[derive(Serialize, Deserialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(rename_all = "camelCase")]
pub struct ReportListResponse {
    pub reports: Vec<ReportView>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total_items: i64,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct ReportListResponses {
    #[serde(rename = "200")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<ReportListResponse>,
}

pub struct ReportListEndpointConfig;

impl EndpointConfigTypes for ReportListEndpointConfig {
    type PathRequest = EmptyRequest;
    type BodyRequest = EmptyRequest;
    type QueryRequest = ReportListQueryRequest;
    type Response = ReportListResponses;
}

define_endpoint! {
    ReportListEndpoint,
    ReportListEndpointDef,
    Get,
    "/reports",
    ts_path_type = "\"/api/reports\"",
    config = ReportListEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

pub async fn report_list_handler(
    State(state): State<AppState>,
    Query(query): Query<ReportListQueryRequest>,
) -> Json<ReportListResponse> {
    let reports = state.store.list_reports(&ReportFilter {
        search: query.search,
        kind: query.kind,
        status: query.status,
        team: query.team,
    });
    let page = Page::from_query(query.page, query.limit);

    Json(ReportListResponse {
        total_pages: page.total_pages(reports.len()),
        current_page: page.current_page(),
        total_items: reports.len() as i64,
        reports: page
            .slice(&reports)
            .iter()
            .map(|report| report_view(&state.store, report))
            .collect(),
    })
}
