use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::pagination::Page;
use crate::views::{team_view, TeamView};
use crate::AppState;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use store::TeamFilter;
use ts_rs::TS;

#[derive(Deserialize, Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct TeamListQueryRequest {
    #[ts(optional)]
    pub page: Option<i32>,
    #[ts(optional)]
    pub limit: Option<i32>,
    /// Case-insensitive match on name and description
    #[ts(optional)]
    pub search: Option<String>,
    #[ts(optional)]
    pub status: Option<String>,
}

#[derive(Serialize, Deserialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(rename_all = "camelCase")]
pub struct TeamListResponse {
    pub teams: Vec<TeamView>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total_items: i64,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct TeamListResponses {
    #[serde(rename = "200")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<TeamListResponse>,
}

pub struct TeamListEndpointConfig;

impl EndpointConfigTypes for TeamListEndpointConfig {
    type PathRequest = EmptyRequest;
    type BodyRequest = EmptyRequest;
    type QueryRequest = TeamListQueryRequest;
    type Response = TeamListResponses;
}

define_endpoint! {
    TeamListEndpoint,
    TeamListEndpointDef,
    Get,
    "/teams",
    ts_path_type = "\"/api/teams\"",
    config = TeamListEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

pub async fn team_list_handler(
    State(state): State<AppState>,
    Query(query): Query<TeamListQueryRequest>,
) -> Json<TeamListResponse> {
    let teams = state.store.list_teams(&TeamFilter {
        search: query.search,
        status: query.status,
    });
    let page = Page::from_query(query.page, query.limit);

    Json(TeamListResponse {
        total_pages: page.total_pages(teams.len()),
        current_page: page.current_page(),
        total_items: teams.len() as i64,
        teams: page
            .slice(&teams)
            .iter()
            .map(|team| team_view(&state.store, team))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::USER_ID_HEADER;
    use crate::testing::{authed_server, build_app_state};
    use axum::{routing::get, Router};
    use store::NewTeam;

    fn server_with_route(state: &crate::AppState) -> axum_test::TestServer {
        authed_server(
            Router::new().route("/api/teams", get(team_list_handler)),
            state,
        )
    }

    #[tokio::test]
    async fn test_list_teams_newest_first() {
        let (state, seed, _temp_dir) = build_app_state();
        let second = state
            .store
            .create_team(NewTeam {
                name: "Data Team".to_string(),
                leader: seed.leader.id.clone(),
                ..Default::default()
            })
            .unwrap();
        let server = server_with_route(&state);

        let response = server
            .get("/api/teams")
            .add_header(USER_ID_HEADER, &seed.member.id)
            .await;

        response.assert_status_ok();
        let body: TeamListResponse = response.json();
        assert_eq!(body.total_items, 2);
        assert_eq!(body.teams[0].id, second.id);
        assert_eq!(body.teams[1].id, seed.team.id);
    }

    #[tokio::test]
    async fn test_search_filters_by_name() {
        let (state, seed, _temp_dir) = build_app_state();
        state
            .store
            .create_team(NewTeam {
                name: "Data Team".to_string(),
                leader: seed.leader.id.clone(),
                ..Default::default()
            })
            .unwrap();
        let server = server_with_route(&state);

        let response = server
            .get("/api/teams")
            .add_query_param("search", "platform")
            .add_header(USER_ID_HEADER, &seed.member.id)
            .await;

        response.assert_status_ok();
        let body: TeamListResponse = response.json();
        assert_eq!(body.total_items, 1);
        assert_eq!(body.teams[0].id, seed.team.id);
    }

    #[tokio::test]
    async fn test_status_filter_excludes_active() {
        let (state, seed, _temp_dir) = build_app_state();
        state
            .store
            .create_team(NewTeam {
                name: "Old Guard".to_string(),
                leader: seed.leader.id.clone(),
                status: Some("archived".to_string()),
                ..Default::default()
            })
            .unwrap();
        let server = server_with_route(&state);

        let response = server
            .get("/api/teams")
            .add_query_param("status", "archived")
            .add_header(USER_ID_HEADER, &seed.member.id)
            .await;

        response.assert_status_ok();
        let body: TeamListResponse = response.json();
        assert_eq!(body.total_items, 1);
        assert_eq!(body.teams[0].name, "Old Guard");
    }

    #[tokio::test]
    async fn test_empty_match_reports_zero_pages() {
        let (state, seed, _temp_dir) = build_app_state();
        let server = server_with_route(&state);

        let response = server
            .get("/api/teams")
            .add_query_param("search", "no such team")
            .add_header(USER_ID_HEADER, &seed.member.id)
            .await;

        response.assert_status_ok();
        let body: TeamListResponse = response.json();
        assert_eq!(body.total_items, 0);
        assert_eq!(body.total_pages, 0);
        assert_eq!(body.current_page, 1);
        assert!(body.teams.is_empty());
    }
}
