use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::pagination::Page;
use crate::views::{to_user_view, UserView};
use crate::AppState;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Deserialize, Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct UserListQueryRequest {
    #[ts(optional)]
    pub page: Option<i32>,
    #[ts(optional)]
    pub limit: Option<i32>,
}

#[derive(Serialize, Deserialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<UserView>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total_items: i64,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct UserListResponses {
    #[serde(rename = "200")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<UserListResponse>,
}

pub struct UserListEndpointConfig;

impl EndpointConfigTypes for UserListEndpointConfig {
    type PathRequest = EmptyRequest;
    type BodyRequest = EmptyRequest;
    type QueryRequest = UserListQueryRequest;
    type Response = UserListResponses;
}

define_endpoint! {
    UserListEndpoint,
    UserListEndpointDef,
    Get,
    "/users",
    ts_path_type = "\"/api/users\"",
    config = UserListEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

/// All users, oldest first, one page at a time.
pub async fn user_list_handler(
    State(state): State<AppState>,
    Query(query): Query<UserListQueryRequest>,
) -> Json<UserListResponse> {
    let users = state.store.list_users();
    let page = Page::from_query(query.page, query.limit);

    Json(UserListResponse {
        total_pages: page.total_pages(users.len()),
        current_page: page.current_page(),
        total_items: users.len() as i64,
        users: page.slice(&users).iter().map(to_user_view).collect(),
    })
}
