use crate::contract::{EmptyRequest, EndpointConfigTypes};
use crate::define_endpoint;
use crate::error::ApiResult;
use crate::views::{to_user_view, UserView};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use store::NewUser;
use ts_rs::TS;

#[derive(Deserialize, Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[ts(optional)]
    pub role: Option<String>,
}

#[derive(Serialize, TS, Default)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct UserCreateResponses {
    #[serde(rename = "201")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<UserView>,
}

pub struct UserCreateEndpointConfig;

impl EndpointConfigTypes for UserCreateEndpointConfig {
    type PathRequest = EmptyRequest;
    type BodyRequest = CreateUserRequest;
    type QueryRequest = EmptyRequest;
    type Response = UserCreateResponses;
}

define_endpoint! {
    UserCreateEndpoint,
    UserCreateEndpointDef,
    Post,
    "/users",
    ts_path_type = "\"/api/users\"",
    config = UserCreateEndpointConfig,
    export_to = "../../../packages/frontend/src/api.ts"
}

/// The one unauthenticated write: clients register themselves here and use
/// the returned id on every subsequent request.
pub async fn user_create_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserView>)> {
    let user = state.store.create_user(NewUser {
        email: payload.email,
        first_name: payload.first_name,
        last_name: payload.last_name,
        role: payload.role,
    })?;

    tracing::info!("Created user {} ({})", user.id, user.email);
    Ok((StatusCode::CREATED, Json(to_user_view(&user))))
}
