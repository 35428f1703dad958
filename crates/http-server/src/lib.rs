pub mod contract;
pub mod endpoints;
pub mod error;
pub mod generator;
pub mod identity;
pub mod pagination;
pub mod queue;
pub mod resolver;
pub mod views;

#[cfg(test)]
pub mod testing;

use crate::{
    contract::EndpointContract,
    endpoints::{
        channel::{channel_handler, ChannelEndpoint},
        channel_subscribers::{channel_subscribers_handler, ChannelSubscribersEndpoint},
        dashboard_create::{dashboard_create_handler, DashboardCreateEndpoint},
        dashboard_delete::{dashboard_delete_handler, DashboardDeleteEndpoint},
        dashboard_get::{dashboard_get_handler, DashboardGetEndpoint},
        dashboard_list::{dashboard_list_handler, DashboardListEndpoint},
        dashboard_update::{dashboard_update_handler, DashboardUpdateEndpoint},
        events::{events_handler, EventsEndpoint},
        health::{health_handler, HealthEndpoint},
        info::{info_handler, InfoEndpoint},
        report_create::{report_create_handler, ReportCreateEndpoint},
        report_delete::{report_delete_handler, ReportDeleteEndpoint},
        report_export::{report_export_handler, ReportExportEndpoint},
        report_get::{report_get_handler, ReportGetEndpoint},
        report_list::{report_list_handler, ReportListEndpoint},
        report_update::{report_update_handler, ReportUpdateEndpoint},
        team_create::{team_create_handler, TeamCreateEndpoint},
        team_delete::{team_delete_handler, TeamDeleteEndpoint},
        team_get::{team_get_handler, TeamGetEndpoint},
        team_list::{team_list_handler, TeamListEndpoint},
        team_members::{team_members_handler, TeamMembersEndpoint},
        team_update::{team_update_handler, TeamUpdateEndpoint},
        user_create::{user_create_handler, UserCreateEndpoint},
        user_list::{user_list_handler, UserListEndpoint},
    },
    generator::SimulatedReportGenerator,
    identity::identity_middleware,
    queue::JobDispatcher,
};

use anyhow::Result;
use axum::http::HeaderValue;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use axum_embed::ServeEmbed;
use event_bus::{EventBus, Subscribers};
use rust_embed::Embed;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use store::DocumentStore;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub event_bus: Arc<EventBus>,
    pub subscribers: Arc<Subscribers>,
    pub job_dispatcher: Arc<JobDispatcher>,
}

#[derive(Embed, Clone)]
#[folder = "../../packages/frontend/dist"]
#[allow_missing = true]
struct Assets;

fn build_app(state: AppState, port: u16) -> Router {
    let cors_layer = CorsLayer::new().allow_origin(tower_http::cors::AllowOrigin::predicate(
        |origin: &HeaderValue, _| {
            if let Ok(origin_str) = origin.to_str() {
                if let Ok(uri) = origin_str.parse::<http::Uri>() {
                    return uri.host() == Some("localhost");
                }
            }
            false
        },
    ));

    let serve_assets = ServeEmbed::<Assets>::new();

    let api_router = Router::new()
        .route(HealthEndpoint::PATH, get(health_handler))
        .route(
            InfoEndpoint::PATH,
            get({
                let shared_port = port;
                move || info_handler(shared_port)
            }),
        )
        .route(EventsEndpoint::PATH, get(events_handler))
        .route(ChannelEndpoint::PATH, get(channel_handler))
        .route(
            ChannelSubscribersEndpoint::PATH,
            get(channel_subscribers_handler),
        )
        .route(UserCreateEndpoint::PATH, post(user_create_handler))
        .route(UserListEndpoint::PATH, get(user_list_handler))
        .route(TeamCreateEndpoint::PATH, post(team_create_handler))
        .route(TeamListEndpoint::PATH, get(team_list_handler))
        .route(TeamGetEndpoint::PATH, get(team_get_handler))
        .route(TeamUpdateEndpoint::PATH, put(team_update_handler))
        .route(TeamDeleteEndpoint::PATH, delete(team_delete_handler))
        .route(TeamMembersEndpoint::PATH, get(team_members_handler))
        .route(ReportCreateEndpoint::PATH, post(report_create_handler))
        .route(ReportListEndpoint::PATH, get(report_list_handler))
        .route(ReportGetEndpoint::PATH, get(report_get_handler))
        .route(ReportUpdateEndpoint::PATH, put(report_update_handler))
        .route(ReportDeleteEndpoint::PATH, delete(report_delete_handler))
        .route(ReportExportEndpoint::PATH, get(report_export_handler))
        .route(DashboardCreateEndpoint::PATH, post(dashboard_create_handler))
        .route(DashboardListEndpoint::PATH, get(dashboard_list_handler))
        .route(DashboardGetEndpoint::PATH, get(dashboard_get_handler))
        .route(DashboardUpdateEndpoint::PATH, put(dashboard_update_handler))
        .route(DashboardDeleteEndpoint::PATH, delete(dashboard_delete_handler))
        .with_state(state.clone());

    // CORS answers preflights before identity resolution runs.
    Router::new()
        .nest("/api", api_router)
        .fallback_service(serve_assets)
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer)
                .layer(middleware::from_fn_with_state(state, identity_middleware)),
        )
}

pub async fn run(port: u16, store: Arc<DocumentStore>, event_bus: Arc<EventBus>) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let job_dispatcher = Arc::new(JobDispatcher::new(
        Arc::clone(&store),
        Arc::clone(&event_bus),
        Arc::new(SimulatedReportGenerator::default()),
    ));

    let state = AppState {
        store,
        event_bus,
        subscribers: Arc::new(Subscribers::new()),
        job_dispatcher,
    };

    let app = build_app(state, port);

    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    let result = server.await;

    tracing::info!("HTTP server shut down gracefully");

    result.map_err(Into::into)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

// The preferred port is an easter egg from "pulse board":
// 'p' -> 0x70, 'b' -> 0x62 => 0x7062 => 28770
const PREFERRED_PORT: u16 = 28770;

pub fn find_unused_port() -> Result<u16> {
    match TcpListener::bind(("127.0.0.1", PREFERRED_PORT)) {
        Ok(listener) => Ok(listener.local_addr()?.port()),
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            tracing::info!(
                "Preferred port {} is busy, finding a random unused port",
                PREFERRED_PORT
            );
            let listener = TcpListener::bind("127.0.0.1:0")?;
            let port = listener.local_addr()?.port();
            Ok(port)
        }
        Err(e) => {
            tracing::error!("Error finding unused port: {e}");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::USER_ID_HEADER;
    use crate::testing::build_app_state;
    use axum_test::TestServer;

    fn full_server() -> (AppState, crate::testing::Seed, tempfile::TempDir, TestServer) {
        let (state, seed, temp_dir) = build_app_state();
        let server = TestServer::new(build_app(state.clone(), 0)).unwrap();
        (state, seed, temp_dir, server)
    }

    #[tokio::test]
    async fn test_api_is_nested_under_prefix() {
        let (_state, seed, _temp_dir, server) = full_server();

        server.get("/api/health").await.assert_status_ok();
        server
            .get("/api/teams")
            .add_header(USER_ID_HEADER, &seed.member.id)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_api_requires_identity() {
        let (_state, _seed, _temp_dir, server) = full_server();

        let response = server.get("/api/teams").await;
        response.assert_status_unauthorized();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Authentication required");
    }

    #[tokio::test]
    async fn test_user_bootstrap_is_public() {
        let (_state, _seed, _temp_dir, server) = full_server();

        let response = server
            .post("/api/users")
            .json(&serde_json::json!({
                "email": "new@pulseboard.dev",
                "firstName": "Noa",
                "lastName": "Novak"
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_localhost_origin_is_allowed() {
        let (_state, _seed, _temp_dir, server) = full_server();

        let response = server
            .get("/api/health")
            .add_header("origin", "http://localhost:5173")
            .await;

        response.assert_status_ok();
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn test_foreign_origin_is_not_allowed() {
        let (_state, _seed, _temp_dir, server) = full_server();

        let response = server
            .get("/api/health")
            .add_header("origin", "https://evil.example.com")
            .await;

        response.assert_status_ok();
        assert!(response
            .headers()
            .get("access-control-allow-origin")
            .is_none());
    }
}
