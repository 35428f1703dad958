use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::error::ApiResult;
use crate::views::{team_view, TeamView};
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use store::StoreError;
use ts_rs::TS;

#[derive(Deserialize, Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct TeamPathRequest {
    pub id: String,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct TeamGetResponses {
    #[serde(rename = "200")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<TeamView>,
}

pub struct TeamGetEndpointConfig;

impl EndpointConfigTypes for TeamGetEndpointConfig {
    type PathRequest = TeamPathRequest;
    type BodyRequest = EmptyRequest;
    type QueryRequest = EmptyRequest;
    type Response = TeamGetResponses;
}

define_endpoint! {
    TeamGetEndpoint,
    TeamGetEndpointDef,
    Get,
    "/teams/{id}",
    ts_path_type = "\"/api/teams/${string}\"",
    config = TeamGetEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

pub async fn team_get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TeamView>> {
    let team = state
        .store
        .get_team(&id)
        .ok_or_else(|| StoreError::not_found("Team", &id))?;

    Ok(Json(team_view(&state.store, &team)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::USER_ID_HEADER;
    use crate::testing::{authed_server, build_app_state};
    use axum::{routing::get, Router};

    #[tokio::test]
    async fn test_get_team_populates_references() {
        let (state, seed, _temp_dir) = build_app_state();
        let server = authed_server(
            Router::new().route("/api/teams/{id}", get(team_get_handler)),
            &state,
        );

        let response = server
            .get(&format!("/api/teams/{}", seed.team.id))
            .add_header(USER_ID_HEADER, &seed.member.id)
            .await;

        response.assert_status_ok();
        let body: TeamView = response.json();
        assert_eq!(body.id, seed.team.id);
        assert_eq!(body.leader.as_ref().unwrap().first_name, seed.leader.first_name);
        assert_eq!(body.members[0].id, seed.member.id);
    }

    #[tokio::test]
    async fn test_get_missing_team_is_404() {
        let (state, seed, _temp_dir) = build_app_state();
        let server = authed_server(
            Router::new().route("/api/teams/{id}", get(team_get_handler)),
            &state,
        );

        let response = server
            .get("/api/teams/nope")
            .add_header(USER_ID_HEADER, &seed.member.id)
            .await;

        response.assert_status_not_found();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Team not found: nope");
    }
}
