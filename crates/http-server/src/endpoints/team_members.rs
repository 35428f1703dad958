use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::endpoints::team_get::TeamPathRequest;
use crate::error::ApiResult;
use crate::views::{to_member_view, MemberView};
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use store::StoreError;
use ts_rs::TS;

#[derive(Serialize, Deserialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct TeamMembersResponse {
    pub members: Vec<MemberView>,
    pub leader: Option<MemberView>,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct TeamMembersResponses {
    #[serde(rename = "200")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<TeamMembersResponse>,
}

pub struct TeamMembersEndpointConfig;

impl EndpointConfigTypes for TeamMembersEndpointConfig {
    type PathRequest = TeamPathRequest;
    type BodyRequest = EmptyRequest;
    type QueryRequest = EmptyRequest;
    type Response = TeamMembersResponses;
}

define_endpoint! {
    TeamMembersEndpoint,
    TeamMembersEndpointDef,
    Get,
    "/teams/{id}/members",
    ts_path_type = "\"/api/teams/${string}/members\"",
    config = TeamMembersEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

/// The roster: member users plus the leader, as display records. Ids without
/// a user behind them drop out of the list.
pub async fn team_members_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TeamMembersResponse>> {
    let team = state
        .store
        .get_team(&id)
        .ok_or_else(|| StoreError::not_found("Team", &id))?;

    let members = team
        .members
        .iter()
        .filter_map(|member_id| state.store.get_user(member_id))
        .map(|user| to_member_view(&user))
        .collect();
    let leader = state
        .store
        .get_user(&team.leader)
        .map(|user| to_member_view(&user));

    Ok(Json(TeamMembersResponse { members, leader }))
}
