use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::endpoints::dashboard_get::DashboardPathRequest;
use crate::endpoints::shared::MessageResponse;
use crate::error::{ApiError, ApiResult};
use crate::identity::CurrentUser;
use crate::AppState;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use event_bus::{DashboardDeletedPayload, PulseEvent};
use serde::Serialize;
use store::StoreError;
use ts_rs::TS;

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct DashboardDeleteResponses {
    #[serde(rename = "200")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<MessageResponse>,
}

pub struct DashboardDeleteEndpointConfig;

impl EndpointConfigTypes for DashboardDeleteEndpointConfig {
    type PathRequest = DashboardPathRequest;
    type BodyRequest = EmptyRequest;
    type QueryRequest = EmptyRequest;
    type Response = DashboardDeleteResponses;
}

define_endpoint! {
    DashboardDeleteEndpoint,
    DashboardDeleteEndpointDef,
    Delete,
    "/dashboards/{id}",
    ts_path_type = "\"/api/dashboards/${string}\"",
    config = DashboardDeleteEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

pub async fn dashboard_delete_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let existing = state
        .store
        .get_dashboard(&id)
        .ok_or_else(|| StoreError::not_found("Dashboard", &id))?;
    if !user.can_modify(&existing.created_by) {
        return Err(ApiError::forbidden());
    }

    let dashboard = state.store.delete_dashboard(&id)?;
    state
        .event_bus
        .publish(PulseEvent::DashboardDeleted(DashboardDeletedPayload {
            dashboard_id: dashboard.id.clone(),
        }));
    tracing::info!("Deleted dashboard {} ({})", dashboard.id, dashboard.name);

    Ok(Json(MessageResponse::new("Dashboard deleted successfully")))
}
