//! Login, registration and logout.
//!
//! Authentication itself lives in the backend; these handlers exchange
//! credentials for a token there, then open and close the local session
//! around it.

use crate::app_state::AppState;
use crate::domain::{BackendError, RegisterRequest, UserProfile};
use crate::guard::CurrentSession;
use crate::handlers::shared_types::ApiEnvelope;
use axum::{extract::State, http::StatusCode, response::Response, Extension, Json};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    // ---
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    // ---
    pub token: String,
    pub user: UserProfile,
}

/// POST /auth/login
///
/// Normalizes the email (trimmed, lowercased), exchanges the credentials
/// with the backend, and opens a session for the returned token. The
/// response carries the token the client must present as a bearer
/// credential from here on.
#[tracing::instrument(skip(state, req))]
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    // ---
    let email = req.email.trim().to_lowercase();

    let login_data = match state.backend().login(&email, &req.password).await {
        Ok(data) => data,
        Err(BackendError::Unauthorized) | Err(BackendError::Business(_)) => {
            return (
                StatusCode::UNAUTHORIZED,
                ApiEnvelope::<()>::fail("invalid email or password"),
            )
                .into_response();
        }
        Err(err @ BackendError::Transport(_)) => {
            tracing::error!("login failed: {err}");
            return (StatusCode::BAD_GATEWAY, ApiEnvelope::<()>::fail(err.to_string()))
                .into_response();
        }
    };

    let user = login_data.to_profile();
    if let Err(err) = state.sessions().open(&login_data.token, user.clone()).await {
        tracing::error!("failed to open session: {err:#}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiEnvelope::<()>::fail("could not open a session"),
        )
            .into_response();
    }

    state.metrics().record_login();
    tracing::info!(user_id = user.id, "login successful");

    ApiEnvelope::ok(LoginResponse { token: login_data.token, user }).into_response()
}

/// POST /auth/register
///
/// Pure proxy: account creation is entirely the backend's concern.
#[tracing::instrument(skip(state, req))]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    // ---
    match state.backend().register(&req).await {
        Ok(()) => ApiEnvelope::<()>::ok_message("registration complete").into_response(),
        Err(BackendError::Business(message)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, ApiEnvelope::<()>::fail(message)).into_response()
        }
        Err(err) => {
            tracing::error!("registration failed: {err}");
            (StatusCode::BAD_GATEWAY, ApiEnvelope::<()>::fail(err.to_string())).into_response()
        }
    }
}

/// POST /auth/logout
///
/// Ends the caller's session. Idempotent from the client's point of view:
/// a session that already expired answers the same way.
#[tracing::instrument(skip(state, session))]
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Response {
    // ---
    if let Err(err) = state.sessions().invalidate(&session.token).await {
        tracing::error!("logout failed: {err:#}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiEnvelope::<()>::fail("could not end the session"),
        )
            .into_response();
    }
    tracing::info!(user_id = session.user.id, "logout");
    ApiEnvelope::<()>::ok_message("logged out").into_response()
}
