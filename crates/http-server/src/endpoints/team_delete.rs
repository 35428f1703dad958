use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::endpoints::shared::MessageResponse;
use crate::endpoints::team_get::TeamPathRequest;
use crate::error::{ApiError, ApiResult};
use crate::identity::CurrentUser;
use crate::AppState;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use event_bus::{PulseEvent, TeamDeletedPayload};
use serde::Serialize;
use ts_rs::TS;

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct TeamDeleteResponses {
    #[serde(rename = "200")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<MessageResponse>,
}

pub struct TeamDeleteEndpointConfig;

impl EndpointConfigTypes for TeamDeleteEndpointConfig {
    type PathRequest = TeamPathRequest;
    type BodyRequest = EmptyRequest;
    type QueryRequest = EmptyRequest;
    type Response = TeamDeleteResponses;
}

define_endpoint! {
    TeamDeleteEndpoint,
    TeamDeleteEndpointDef,
    Delete,
    "/teams/{id}",
    ts_path_type = "\"/api/teams/${string}\"",
    config = TeamDeleteEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

/// Removes the team and unlinks it from every member's team list.
pub async fn team_delete_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    if !user.is_admin() {
        return Err(ApiError::forbidden());
    }

    let team = state.store.delete_team(&id)?;

    state
        .event_bus
        .publish(PulseEvent::TeamDeleted(TeamDeletedPayload {
            team_id: team.id.clone(),
        }));
    tracing::info!("Deleted team {} ({})", team.id, team.name);

    Ok(Json(MessageResponse::new("Team deleted successfully")))
}
