//! Request identity resolution.
//!
//! Authentication happens upstream of this service; requests arrive with an
//! `x-user-id` header naming the already-authenticated user. The middleware
//! resolves the header against the user collection and injects the resulting
//! [`CurrentUser`] as a request extension, so handlers extract a live user
//! snapshot instead of re-reading the header.

use crate::AppState;
use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use store::User;
use tracing::warn;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated user for the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.0.id
    }

    pub fn is_admin(&self) -> bool {
        self.0.is_admin()
    }

    /// Owner-or-admin check used by report and dashboard mutations.
    pub fn can_modify(&self, created_by: &str) -> bool {
        self.0.id == created_by || self.is_admin()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            message: "Authentication required".to_string(),
        }),
    )
        .into_response()
}

/// Paths that skip identity resolution: liveness/info probes, the user
/// bootstrap surface, and the realtime feeds (`join` frames validate their
/// own user id). Anything outside `/api` is frontend assets.
pub fn is_public_endpoint(path: &str, method: &http::Method) -> bool {
    if !path.starts_with("/api/") {
        return true;
    }
    match path {
        "/api/health" | "/api/info" | "/api/events" | "/api/channel" => true,
        "/api/users" => method == http::Method::POST,
        _ => false,
    }
}

pub async fn identity_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    if is_public_endpoint(request.uri().path(), request.method()) {
        return Ok(next.run(request).await);
    }

    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| {
            warn!("Missing {} header", USER_ID_HEADER);
            unauthorized()
        })?;

    match state.store.get_user(user_id) {
        Some(user) => {
            let mut request = request;
            request.extensions_mut().insert(CurrentUser(user));
            Ok(next.run(request).await)
        }
        None => {
            warn!("Unknown user id in {} header: {}", USER_ID_HEADER, user_id);
            Err(unauthorized())
        }
    }
}
