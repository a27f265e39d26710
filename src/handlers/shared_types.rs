use crate::app_state::AppState;
use crate::domain::BackendError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// The `{success, message?, data?}` envelope shared with the backend API.
///
/// Every JSON response the gateway emits uses this shape, so the browser
/// client handles gateway-originated and backend-originated answers
/// identically.
#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Navigation hint attached to authorization denials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Successful envelope carrying a payload.
    pub fn ok(data: T) -> Self {
        // ---
        Self { success: true, message: None, data: Some(data), redirect: None }
    }

    /// Successful envelope with a message and no payload.
    pub fn ok_message(message: impl Into<String>) -> Self {
        // ---
        Self { success: true, message: Some(message.into()), data: None, redirect: None }
    }

    /// Failure envelope with a user-facing message.
    pub fn fail(message: impl Into<String>) -> Self {
        // ---
        Self { success: false, message: Some(message.into()), data: None, redirect: None }
    }

    /// Failure envelope pointing the client at a navigation target.
    pub fn fail_redirect(message: impl Into<String>, redirect: impl Into<String>) -> Self {
        // ---
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            redirect: Some(redirect.into()),
        }
    }
}

impl<T> IntoResponse for ApiEnvelope<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        axum::Json(self).into_response()
    }
}

/// Convert a backend failure into the response the error taxonomy demands.
///
/// A transport-level 401 is a hard session-invalidation signal regardless
/// of which endpoint produced it: the caller's session is torn down before
/// the denial is returned. Business errors surface their message verbatim;
/// transport errors surface generically and are never retried.
pub(crate) async fn backend_failure(
    state: &AppState,
    token: Option<&str>,
    err: BackendError,
) -> Response {
    // ---
    match err {
        BackendError::Unauthorized => {
            if let Some(token) = token {
                if let Err(err) = state.sessions().invalidate(token).await {
                    tracing::error!("teardown after backend 401 failed: {err:#}");
                }
            }
            (
                StatusCode::UNAUTHORIZED,
                ApiEnvelope::<()>::fail_redirect("session is no longer valid", "/login"),
            )
                .into_response()
        }
        BackendError::Business(message) => {
            (StatusCode::UNPROCESSABLE_ENTITY, ApiEnvelope::<()>::fail(message)).into_response()
        }
        BackendError::Transport(detail) => {
            tracing::error!(%detail, "backend transport failure");
            (
                StatusCode::BAD_GATEWAY,
                ApiEnvelope::<()>::fail("rental service is unreachable"),
            )
                .into_response()
        }
    }
}
