use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::endpoints::dashboard_create::WidgetRequest;
use crate::endpoints::dashboard_get::DashboardPathRequest;
use crate::error::{ApiError, ApiResult};
use crate::identity::CurrentUser;
use crate::views::{dashboard_view, DashboardView};
use crate::AppState;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use event_bus::{DashboardUpdatedPayload, PulseEvent};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use store::{DashboardPatch, StoreError};
use ts_rs::TS;

#[derive(Deserialize, Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(rename_all = "camelCase")]
pub struct UpdateDashboardRequest {
    #[ts(optional)]
    pub name: Option<String>,
    #[ts(optional)]
    pub description: Option<String>,
    #[ts(optional)]
    pub widgets: Option<Vec<WidgetRequest>>,
    #[ts(optional)]
    pub shared_with: Option<Vec<String>>,
    #[ts(optional)]
    #[ts(type = "Record<string, unknown>")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct DashboardUpdateResponses {
    #[serde(rename = "200")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<DashboardView>,
}

pub struct DashboardUpdateEndpointConfig;

impl EndpointConfigTypes for DashboardUpdateEndpointConfig {
    type PathRequest = DashboardPathRequest;
    type BodyRequest = UpdateDashboardRequest;
    type QueryRequest = EmptyRequest;
    type Response = DashboardUpdateResponses;
}

define_endpoint! {
    DashboardUpdateEndpoint,
    DashboardUpdateEndpointDef,
    Put,
    "/dashboards/{id}",
    ts_path_type = "\"/api/dashboards/${string}\"",
    config = DashboardUpdateEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

pub async fn dashboard_update_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateDashboardRequest>,
) -> ApiResult<Json<DashboardView>> {
    let existing = state
        .store
        .get_dashboard(&id)
        .ok_or_else(|| StoreError::not_found("Dashboard", &id))?;
    if !user.can_modify(&existing.created_by) {
        return Err(ApiError::forbidden());
    }

    let (dashboard, changed) = state.store.update_dashboard(
        &id,
        DashboardPatch {
            name: payload.name,
            description: payload.description,
            widgets: payload
                .widgets
                .map(|widgets| widgets.into_iter().map(WidgetRequest::into_draft).collect()),
            shared_with: payload.shared_with,
            metadata: payload.metadata,
        },
    )?;

    state
        .event_bus
        .publish(PulseEvent::DashboardUpdated(DashboardUpdatedPayload {
            dashboard_id: dashboard.id.clone(),
            changed: changed.iter().map(|field| field.to_string()).collect(),
        }));
    tracing::info!("Updated dashboard {} ({:?})", dashboard.id, changed);

    Ok(Json(dashboard_view(&state.store, &dashboard, &dashboard.widgets)))
}
