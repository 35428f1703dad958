use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::error::ApiResult;
use crate::identity::CurrentUser;
use crate::views::{dashboard_view, DashboardView};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use event_bus::PulseEvent;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use store::{NewDashboard, WidgetDraft, WidgetPositionDraft};
use ts_rs::TS;

#[derive(Deserialize, Serialize, TS, Default, Clone, Copy)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(rename_all = "camelCase")]
pub struct WidgetPositionRequest {
    pub row: i64,
    pub col: i64,
    pub size_x: i64,
    pub size_y: i64,
}

#[derive(Deserialize, Serialize, TS, Default, Clone)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(rename_all = "camelCase")]
pub struct WidgetRequest {
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub kind: String,
    pub title: String,
    #[ts(optional)]
    #[ts(type = "Record<string, unknown>")]
    pub data: Option<Map<String, Value>>,
    #[ts(optional)]
    #[ts(type = "Record<string, unknown>")]
    pub config: Option<Map<String, Value>>,
    #[ts(optional)]
    pub position: Option<WidgetPositionRequest>,
}

impl WidgetRequest {
    pub fn into_draft(self) -> WidgetDraft {
        WidgetDraft {
            kind: self.kind,
            title: self.title,
            data: self.data,
            config: self.config,
            position: self.position.map(|p| WidgetPositionDraft {
                row: p.row,
                col: p.col,
                size_x: p.size_x,
                size_y: p.size_y,
            }),
        }
    }
}

#[derive(Deserialize, Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(rename_all = "camelCase")]
pub struct CreateDashboardRequest {
    pub name: String,
    #[ts(optional)]
    pub description: Option<String>,
    #[serde(default)]
    pub widgets: Vec<WidgetRequest>,
    pub team: String,
    #[serde(default)]
    pub shared_with: Vec<String>,
    #[ts(optional)]
    #[ts(type = "Record<string, unknown>")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct DashboardCreateResponses {
    #[serde(rename = "201")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DashboardView>,
}

pub struct DashboardCreateEndpointConfig;

impl EndpointConfigTypes for DashboardCreateEndpointConfig {
    type PathRequest = EmptyRequest;
    type BodyRequest = CreateDashboardRequest;
    type QueryRequest = EmptyRequest;
    type Response = DashboardCreateResponses;
}

define_endpoint! {
    DashboardCreateEndpoint,
    DashboardCreateEndpointDef,
    Post,
    "/dashboards",
    ts_path_type = "\"/api/dashboards\"",
    config = DashboardCreateEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

pub async fn dashboard_create_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateDashboardRequest>,
) -> ApiResult<(StatusCode, Json<DashboardView>)> {
    let dashboard = state.store.create_dashboard(NewDashboard {
        name: payload.name,
        description: payload.description,
        widgets: payload
            .widgets
            .into_iter()
            .map(WidgetRequest::into_draft)
            .collect(),
        team: payload.team,
        created_by: user.id().to_string(),
        shared_with: payload.shared_with,
        metadata: payload.metadata,
    })?;

    for shared_user in &dashboard.shared_with {
        state.event_bus.publish(PulseEvent::notification(
            shared_user,
            format!("New dashboard shared: {}", dashboard.name),
            "info",
        ));
    }
    tracing::info!("Created dashboard {} ({})", dashboard.id, dashboard.name);

    Ok((
        StatusCode::CREATED,
        Json(dashboard_view(&state.store, &dashboard, &dashboard.widgets)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::USER_ID_HEADER;
    use crate::testing::{authed_server, build_app_state};
    use axum::{routing::post, Router};
    use serde_json::json;

    fn server_with_route(state: &crate::AppState) -> axum_test::TestServer {
        authed_server(
            Router::new().route("/api/dashboards", post(dashboard_create_handler)),
            state,
        )
    }

    #[tokio::test]
    async fn test_create_dashboard_with_widgets() {
        let (state, seed, _temp_dir) = build_app_state();
        let server = server_with_route(&state);

        let response = server
            .post("/api/dashboards")
            .add_header(USER_ID_HEADER, &seed.leader.id)
            .json(&json!({
                "name": "Ops overview",
                "team": seed.team.id,
                "widgets": [{
                    "type": "metric",
                    "title": "Open reports",
                    "position": {"row": 0, "col": 0, "sizeX": 1, "sizeY": 1}
                }]
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: DashboardView = response.json();
        assert_eq!(body.name, "Ops overview");
        assert_eq!(body.widgets.len(), 1);
        assert_eq!(body.widgets[0].kind, "metric");
        assert_eq!(body.created_by.as_ref().unwrap().id, seed.leader.id);
        assert!(state.store.get_dashboard(&body.id).is_some());
    }

    #[tokio::test]
    async fn test_sharing_notifies_each_user() {
        let (state, seed, _temp_dir) = build_app_state();
        let mut events = state.event_bus.subscribe();
        let server = server_with_route(&state);

        let response = server
            .post("/api/dashboards")
            .add_header(USER_ID_HEADER, &seed.leader.id)
            .json(&json!({
                "name": "Team KPIs",
                "team": seed.team.id,
                "sharedWith": [seed.member.id]
            }))
            .await;

        response.assert_status(StatusCode::CREATED);

        let envelope = events.try_recv().unwrap();
        match envelope.event {
            PulseEvent::NotificationReceived(payload) => {
                assert_eq!(payload.user_id, seed.member.id);
                assert_eq!(payload.message, "New dashboard shared: Team KPIs");
                assert_eq!(payload.kind, "info");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_widget_without_position_rejected() {
        let (state, seed, _temp_dir) = build_app_state();
        let server = server_with_route(&state);

        let response = server
            .post("/api/dashboards")
            .add_header(USER_ID_HEADER, &seed.leader.id)
            .json(&json!({
                "name": "Broken",
                "team": seed.team.id,
                "widgets": [{"type": "chart", "title": "No position"}]
            }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Widget position is required");
        assert!(state
            .store
            .list_dashboards(&store::DashboardFilter::default())
            .is_empty());
    }

    #[tokio::test]
    async fn test_sharing_outside_the_team_rejected() {
        let (state, seed, _temp_dir) = build_app_state();
        let outsider = state
            .store
            .create_user(store::NewUser {
                email: "outsider@example.com".to_string(),
                first_name: "Odd".to_string(),
                last_name: "OneOut".to_string(),
                role: None,
            })
            .unwrap();
        let server = server_with_route(&state);

        let response = server
            .post("/api/dashboards")
            .add_header(USER_ID_HEADER, &seed.leader.id)
            .json(&json!({
                "name": "Private board",
                "team": seed.team.id,
                "sharedWith": [outsider.id]
            }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Some shared users are not in the team");
    }
}
