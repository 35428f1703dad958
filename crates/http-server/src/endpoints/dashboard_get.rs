use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::error::{ApiError, ApiResult};
use crate::identity::CurrentUser;
use crate::resolver::resolve_widgets;
use crate::views::{dashboard_view, DashboardView};
use crate::AppState;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use store::StoreError;
use ts_rs::TS;

#[derive(Deserialize, Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct DashboardPathRequest {
    pub id: String,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct DashboardGetResponses {
    #[serde(rename = "200")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<DashboardView>,
}

pub struct DashboardGetEndpointConfig;

impl EndpointConfigTypes for DashboardGetEndpointConfig {
    type PathRequest = DashboardPathRequest;
    type BodyRequest = EmptyRequest;
    type QueryRequest = EmptyRequest;
    type Response = DashboardGetResponses;
}

define_endpoint! {
    DashboardGetEndpoint,
    DashboardGetEndpointDef,
    Get,
    "/dashboards/{id}",
    ts_path_type = "\"/api/dashboards/${string}\"",
    config = DashboardGetEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

/// Reads resolve widgets against live data; see [`crate::resolver`].
pub async fn dashboard_get_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<DashboardView>> {
    let dashboard = state
        .store
        .get_dashboard(&id)
        .ok_or_else(|| StoreError::not_found("Dashboard", &id))?;

    if !dashboard.is_visible_to(user.id()) && !user.is_admin() {
        return Err(ApiError::forbidden());
    }

    let widgets = resolve_widgets(&state.store, &dashboard);
    Ok(Json(dashboard_view(&state.store, &dashboard, &widgets)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::USER_ID_HEADER;
    use crate::testing::{authed_server, build_app_state, Seed};
    use axum::http::StatusCode;
    use axum::{routing::get, Router};
    use store::{NewDashboard, NewReport, WidgetDraft, WidgetPositionDraft};

    fn server_with_route(state: &crate::AppState) -> axum_test::TestServer {
        authed_server(
            Router::new().route("/api/dashboards/{id}", get(dashboard_get_handler)),
            state,
        )
    }

    fn chart_dashboard(state: &crate::AppState, seed: &Seed, shared: Vec<String>) -> store::Dashboard {
        state
            .store
            .create_dashboard(NewDashboard {
                name: "Ops overview".to_string(),
                widgets: vec![WidgetDraft {
                    kind: "chart".to_string(),
                    title: "Velocity".to_string(),
                    position: Some(WidgetPositionDraft {
                        row: 0,
                        col: 0,
                        size_x: 2,
                        size_y: 1,
                    }),
                    ..Default::default()
                }],
                team: seed.team.id.clone(),
                created_by: seed.member.id.clone(),
                shared_with: shared,
                ..Default::default()
            })
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_dashboard_resolves_chart_widgets() {
        let (state, seed, _temp_dir) = build_app_state();
        let report = state
            .store
            .create_report(NewReport {
                title: "Sprint Velocity".to_string(),
                kind: "performance".to_string(),
                team: seed.team.id.clone(),
                created_by: seed.leader.id.clone(),
                ..Default::default()
            })
            .unwrap();
        state
            .store
            .complete_report(&report.id, serde_json::Map::new())
            .unwrap()
            .unwrap();
        let dashboard = chart_dashboard(&state, &seed, vec![]);
        let server = server_with_route(&state);

        let response = server
            .get(&format!("/api/dashboards/{}", dashboard.id))
            .add_header(USER_ID_HEADER, &seed.member.id)
            .await;

        response.assert_status_ok();
        let body: DashboardView = response.json();
        assert_eq!(body.id, dashboard.id);
        let reports = body.widgets[0].data["reports"].as_array().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0]["title"], "Sprint Velocity");
    }

    #[tokio::test]
    async fn test_shared_user_can_read() {
        let (state, seed, _temp_dir) = build_app_state();
        let reader = state
            .store
            .create_user(store::NewUser {
                email: "reader@example.com".to_string(),
                first_name: "Rita".to_string(),
                last_name: "Reader".to_string(),
                role: None,
            })
            .unwrap();
        // sharing requires team membership
        state
            .store
            .update_team(
                &seed.team.id,
                store::TeamPatch {
                    members: Some(vec![seed.member.id.clone(), reader.id.clone()]),
                    ..Default::default()
                },
            )
            .unwrap();
        let dashboard = chart_dashboard(&state, &seed, vec![reader.id.clone()]);
        let server = server_with_route(&state);

        let response = server
            .get(&format!("/api/dashboards/{}", dashboard.id))
            .add_header(USER_ID_HEADER, &reader.id)
            .await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_unshared_user_is_forbidden() {
        let (state, seed, _temp_dir) = build_app_state();
        let outsider = state
            .store
            .create_user(store::NewUser {
                email: "watcher@example.com".to_string(),
                first_name: "Wanda".to_string(),
                last_name: "Watcher".to_string(),
                role: None,
            })
            .unwrap();
        let dashboard = chart_dashboard(&state, &seed, vec![]);
        let server = server_with_route(&state);

        let response = server
            .get(&format!("/api/dashboards/{}", dashboard.id))
            .add_header(USER_ID_HEADER, &outsider.id)
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_admin_can_read_any_dashboard() {
        let (state, seed, _temp_dir) = build_app_state();
        let dashboard = chart_dashboard(&state, &seed, vec![]);
        let server = server_with_route(&state);

        let response = server
            .get(&format!("/api/dashboards/{}", dashboard.id))
            .add_header(USER_ID_HEADER, &seed.leader.id)
            .await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_get_missing_dashboard_is_404() {
        let (state, seed, _temp_dir) = build_app_state();
        let server = server_with_route(&state);

        let response = server
            .get("/api/dashboards/nope")
            .add_header(USER_ID_HEADER, &seed.member.id)
            .await;

        response.assert_status_not_found();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Dashboard not found: nope");
    }
}
