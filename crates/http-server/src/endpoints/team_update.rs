use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::endpoints::team_get::TeamPathRequest;
use crate::error::{ApiError, ApiResult};
use crate::identity::CurrentUser;
use crate::views::{team_view, TeamView};
use crate::AppState;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use event_bus::{PulseEvent, TeamUpdatedPayload};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use store::TeamPatch;
use ts_rs::TS;

#[derive(Deserialize, Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamRequest {
    #[ts(optional)]
    pub name: Option<String>,
    #[ts(optional)]
    pub description: Option<String>,
    #[ts(optional)]
    pub members: Option<Vec<String>>,
    #[ts(optional)]
    pub status: Option<String>,
    #[ts(optional)]
    #[ts(type = "Record<string, unknown>")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct TeamUpdateResponses {
    #[serde(rename = "200")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<TeamView>,
}

pub struct TeamUpdateEndpointConfig;

impl EndpointConfigTypes for TeamUpdateEndpointConfig {
    type PathRequest = TeamPathRequest;
    type BodyRequest = UpdateTeamRequest;
    type QueryRequest = EmptyRequest;
    type Response = TeamUpdateResponses;
}

define_endpoint! {
    TeamUpdateEndpoint,
    TeamUpdateEndpointDef,
    Put,
    "/teams/{id}",
    ts_path_type = "\"/api/teams/${string}\"",
    config = TeamUpdateEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

pub async fn team_update_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTeamRequest>,
) -> ApiResult<Json<TeamView>> {
    if !user.is_admin() {
        return Err(ApiError::forbidden());
    }

    let (team, changed) = state.store.update_team(
        &id,
        TeamPatch {
            name: payload.name,
            description: payload.description,
            members: payload.members,
            status: payload.status,
            metadata: payload.metadata,
        },
    )?;

    state
        .event_bus
        .publish(PulseEvent::TeamUpdated(TeamUpdatedPayload {
            team_id: team.id.clone(),
            changed: changed.iter().map(|field| field.to_string()).collect(),
        }));
    tracing::info!("Updated team {} ({:?})", team.id, changed);

    Ok(Json(team_view(&state.store, &team)))
}
