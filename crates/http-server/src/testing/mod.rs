use crate::generator::fakes::InstantGenerator;
use crate::identity::identity_middleware;
use crate::queue::JobDispatcher;
use crate::AppState;
use axum::{middleware, Router};
use axum_test::TestServer;
use event_bus::{EventBus, Subscribers};
use std::sync::Arc;
use store::{DocumentStore, NewTeam, NewUser, Team, User};
use tempfile::TempDir;

/// Baseline fixtures every test can lean on: one team, its leader (an admin)
/// and one regular member.
pub struct Seed {
    pub team: Team,
    pub leader: User,
    pub member: User,
}

/// A store on a temp directory, pre-seeded. The caller keeps the TempDir
/// alive for the duration of the test.
pub fn seed_store() -> (DocumentStore, Seed, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = DocumentStore::new(temp_dir.path().join("catalog.json"), "0.1.0".to_string())
        .unwrap();

    let leader = store
        .create_user(NewUser {
            email: "leader@pulseboard.dev".to_string(),
            first_name: "Lena".to_string(),
            last_name: "Ortiz".to_string(),
            role: Some("admin".to_string()),
        })
        .unwrap();
    let member = store
        .create_user(NewUser {
            email: "member@pulseboard.dev".to_string(),
            first_name: "Miro".to_string(),
            last_name: "Takahashi".to_string(),
            role: None,
        })
        .unwrap();
    let team = store
        .create_team(NewTeam {
            name: "Platform Team".to_string(),
            leader: leader.id.clone(),
            members: vec![member.id.clone()],
            ..Default::default()
        })
        .unwrap();

    (store, Seed { team, leader, member }, temp_dir)
}

/// Full application state over a seeded temp store. Jobs run against an
/// instant generator so report pipelines finish without delays.
pub fn build_app_state() -> (AppState, Seed, TempDir) {
    let (store, seed, temp_dir) = seed_store();
    let store = Arc::new(store);
    let event_bus = Arc::new(EventBus::new());
    let subscribers = Arc::new(Subscribers::new());
    let job_dispatcher = Arc::new(JobDispatcher::new(
        Arc::clone(&store),
        Arc::clone(&event_bus),
        Arc::new(InstantGenerator::default()),
    ));

    let state = AppState {
        store,
        event_bus,
        subscribers,
        job_dispatcher,
    };
    (state, seed, temp_dir)
}

/// Wraps the given routes the way the production router does: identity
/// middleware in front, state attached. Requests authenticate by setting the
/// `x-user-id` header.
pub fn authed_server(routes: Router<AppState>, state: &AppState) -> TestServer {
    let app = routes
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ))
        .with_state(state.clone());
    TestServer::new(app).unwrap()
}
