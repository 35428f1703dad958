use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::identity::CurrentUser;
use crate::pagination::Page;
use crate::views::{dashboard_view, DashboardView};
use crate::AppState;
use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use store::DashboardFilter;
use ts_rs::TS;

#[derive(Deserialize, Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct DashboardListQueryRequest {
    #[ts(optional)]
    pub page: Option<i32>,
    #[ts(optional)]
    pub limit: Option<i32>,
    /// Case-insensitive match on name and description
    #[ts(optional)]
    pub search: Option<String>,
    #[ts(optional)]
    pub team: Option<String>,
}

#[derive(Serialize, Deserialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(rename_all = "camelCase")]
pub struct DashboardListResponse {
    pub dashboards: Vec<DashboardView>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total_items: i64,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct DashboardListResponses {
    #[serde(rename = "200")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<DashboardListResponse>,
}

pub struct DashboardListEndpointConfig;

impl EndpointConfigTypes for DashboardListEndpointConfig {
    type PathRequest = EmptyRequest;
    type BodyRequest = EmptyRequest;
    type QueryRequest = DashboardListQueryRequest;
    type Response = DashboardListResponses;
}

define_endpoint! {
    DashboardListEndpoint,
    DashboardListEndpointDef,
    Get,
    "/dashboards",
    ts_path_type = "\"/api/dashboards\"",
    config = DashboardListEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

/// Admins see every dashboard; everyone else sees the ones they created
/// or were shared into.
pub async fn dashboard_list_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<DashboardListQueryRequest>,
) -> Json<DashboardListResponse> {
    let viewer = if user.is_admin() {
        None
    } else {
        Some(user.id().to_string())
    };
    let dashboards = state.store.list_dashboards(&DashboardFilter {
        viewer,
        search: query.search,
        team: query.team,
    });
    let page = Page::from_query(query.page, query.limit);

    Json(DashboardListResponse {
        total_pages: page.total_pages(dashboards.len()),
        current_page: page.current_page(),
        total_items: dashboards.len() as i64,
        dashboards: page
            .slice(&dashboards)
            .iter()
            .map(|dashboard| dashboard_view(&state.store, dashboard, &dashboard.widgets))
            .collect(),
    })
}
