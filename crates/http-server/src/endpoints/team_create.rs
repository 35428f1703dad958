use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::error::{ApiError, ApiResult};
use crate::identity::CurrentUser;
use crate::views::{team_view, TeamView};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use event_bus::PulseEvent;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use store::NewTeam;
use ts_rs::TS;

#[derive(Deserialize, Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    pub name: String,
    #[ts(optional)]
    pub description: Option<String>,
    #[serde(default)]
    pub members: Vec<String>,
    pub leader: String,
    #[ts(optional)]
    pub status: Option<String>,
    #[ts(optional)]
    #[ts(type = "Record<string, unknown>")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct TeamCreateResponses {
    #[serde(rename = "201")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<TeamView>,
}

pub struct TeamCreateEndpointConfig;

impl EndpointConfigTypes for TeamCreateEndpointConfig {
    type PathRequest = EmptyRequest;
    type BodyRequest = CreateTeamRequest;
    type QueryRequest = EmptyRequest;
    type Response = TeamCreateResponses;
}

define_endpoint! {
    TeamCreateEndpoint,
    TeamCreateEndpointDef,
    Post,
    "/teams",
    ts_path_type = "\"/api/teams\"",
    config = TeamCreateEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

pub async fn team_create_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<TeamView>)> {
    if !user.is_admin() {
        return Err(ApiError::forbidden());
    }

    let team = state.store.create_team(NewTeam {
        name: payload.name,
        description: payload.description,
        members: payload.members,
        leader: payload.leader,
        status: payload.status,
        metadata: payload.metadata,
    })?;

    state.event_bus.publish(PulseEvent::team_created(&team));
    tracing::info!("Created team {} ({})", team.id, team.name);

    Ok((StatusCode::CREATED, Json(team_view(&state.store, &team))))
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
            Router::new().route("/api/teams", post(team_create_handler)),
            state,
        )
    }

    #[tokio::test]
    async fn test_admin_creates_team() {
        let (state, seed, _temp_dir) = build_app_state();
        let mut events = state.event_bus.subscribe();
        let server = server_with_route(&state);

        let response = server
            .post("/api/teams")
            .add_header(USER_ID_HEADER, &seed.leader.id)
            .json(&json!({
                "name": "Growth Team",
                "leader": seed.leader.id,
                "members": [seed.member.id]
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: TeamView = response.json();
        assert_eq!(body.name, "Growth Team");
        assert_eq!(body.status, "active");
        assert_eq!(body.leader.as_ref().unwrap().id, seed.leader.id);
        assert_eq!(body.members.len(), 1);

        let envelope = events.try_recv().unwrap();
        match envelope.event {
            PulseEvent::TeamCreated(payload) => {
                assert_eq!(payload.team_id, body.id);
                assert_eq!(payload.name, "Growth Team");
                assert_eq!(payload.leader, seed.leader.id);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        let (state, seed, _temp_dir) = build_app_state();
        let mut events = state.event_bus.subscribe();
        let server = server_with_route(&state);

        let response = server
            .post("/api/teams")
            .add_header(USER_ID_HEADER, &seed.member.id)
            .json(&json!({
                "name": "Shadow Team",
                "leader": seed.member.id
            }))
            .await;

        response.assert_status_forbidden();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Unauthorized");
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unknown_leader_rejected() {
        let (state, seed, _temp_dir) = build_app_state();
        let server = server_with_route(&state);

        let response = server
            .post("/api/teams")
            .add_header(USER_ID_HEADER, &seed.leader.id)
            .json(&json!({
                "name": "Ghost Team",
                "leader": "ghost"
            }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Team leader must be a valid user");
    }
}
