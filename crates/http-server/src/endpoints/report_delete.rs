use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::endpoints::report_get::ReportPathRequest;
use crate::endpoints::shared::MessageResponse;
use crate::error::{ApiError, ApiResult};
use crate::identity::CurrentUser;
use crate::AppState;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use event_bus::PulseEvent;
use serde::Serialize;
use store::StoreError;
use ts_rs::TS;

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct ReportDeleteResponses {
    #[serde(rename = "200")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<MessageResponse>,
}

pub struct ReportDeleteEndpointConfig;

impl EndpointConfigTypes for ReportDeleteEndpointConfig {
    type PathRequest = ReportPathRequest;
    type BodyRequest = EmptyRequest;
    type QueryRequest = EmptyRequest;
    type Response = ReportDeleteResponses;
}

define_endpoint! {
    ReportDeleteEndpoint,
    ReportDeleteEndpointDef,
    Delete,
    "/reports/{id}",
    ts_path_type = "\"/api/reports/${string}\"",
    config = ReportDeleteEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

pub async fn report_delete_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let report = state
        .store
        .get_report(&id)
        .ok_or_else(|| StoreError::not_found("Report", &id))?;
    if !user.can_modify(&report.created_by) {
        return Err(ApiError::forbidden());
    }

    let report = state.store.delete_report(&id)?;

    state.event_bus.publish(PulseEvent::report_deleted(&report.id));
    tracing::info!("Deleted report {} ({})", report.id, report.title);

    Ok(Json(MessageResponse::new("Report deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::USER_ID_HEADER;
    use crate::testing::{authed_server, build_app_state, Seed};
    use crate::AppState;
    use axum::{routing::delete, Router};
    use store::NewReport;

    fn server_with_route(state: &AppState) -> axum_test::TestServer {
        authed_server(
            Router::new().route("/api/reports/{id}", delete(report_delete_handler)),
            state,
        )
    }

    fn owned_report(state: &AppState, seed: &Seed, owner: &str) -> store::Report {
        state
            .store
            .create_report(NewReport {
                title: "Disposable".to_string(),
                kind: "custom".to_string(),
                team: seed.team.id.clone(),
                created_by: owner.to_string(),
                ..Default::default()
            })
            .unwrap()
    }

    #[tokio::test]
    async fn test_owner_deletes_report() {
        let (state, seed, _temp_dir) = build_app_state();
        let report = owned_report(&state, &seed, &seed.member.id);
        let mut events = state.event_bus.subscribe();
        let server = server_with_route(&state);

        let response = server
            .delete(&format!("/api/reports/{}", report.id))
            .add_header(USER_ID_HEADER, &seed.member.id)
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Report deleted successfully");
        assert!(state.store.get_report(&report.id).is_none());

        let envelope = events.try_recv().unwrap();
        match envelope.event {
            PulseEvent::ReportDeleted(payload) => assert_eq!(payload.report_id, report.id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_owner_is_forbidden() {
        let (state, seed, _temp_dir) = build_app_state();
        let report = owned_report(&state, &seed, &seed.leader.id);
        let server = server_with_route(&state);

        let response = server
            .delete(&format!("/api/reports/{}", report.id))
            .add_header(USER_ID_HEADER, &seed.member.id)
            .await;

        response.assert_status_forbidden();
        assert!(state.store.get_report(&report.id).is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_report_is_404() {
        let (state, seed, _temp_dir) = build_app_state();
        let server = server_with_route(&state);

        let response = server
            .delete("/api/reports/nope")
            .add_header(USER_ID_HEADER, &seed.member.id)
            .await;

        response.assert_status_not_found();
    }
}
