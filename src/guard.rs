//! Authorization guard wrapping every protected route.
//!
//! The guard extracts the bearer token, queries session validity (which may
//! itself end an expired session), feeds the pure gate decision, and either
//! injects the current session for handlers or answers with the redirect
//! the decision names. Each allowed request also counts as user activity
//! and rearms the session's inactivity policy.

use crate::app_state::AppState;
use crate::domain::{decide, Capability, Decision, UserProfile};
use crate::handlers::ApiEnvelope;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The validated session of the caller, injected into request extensions
/// on `Allow` so handlers never re-check authorization themselves.
#[derive(Debug, Clone)]
pub(crate) struct CurrentSession {
    // ---
    pub token: String,
    pub user: UserProfile,
}

/// Guard for routes requiring any valid session.
pub(crate) async fn require_authenticated(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    // ---
    gate(state, req, next, Capability::Authenticated).await
}

/// Guard for routes requiring a valid session with the admin flag.
pub(crate) async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    // ---
    gate(state, req, next, Capability::Admin).await
}

async fn gate(state: AppState, mut req: Request, next: Next, required: Capability) -> Response {
    // ---
    let token = bearer_token(&req);

    // Validity inspection is non-idempotent by contract: an expired session
    // is torn down as a side effect of this call.
    let session = match &token {
        Some(token) => match state.sessions().is_valid(token).await {
            Ok(session) => session,
            Err(err) => {
                tracing::error!("session lookup failed: {err:#}");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiEnvelope::<()>::fail("session storage unavailable"),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let session_valid = session.is_some();
    let is_admin = session.as_ref().is_some_and(|s| s.user.is_admin);

    match (decide(required, session_valid, is_admin), session) {
        (Decision::Allow, Some(session)) => {
            if let Err(err) = state.sessions().record_activity(&session.token).await {
                // Activity stamping is best effort; the request itself
                // still proceeds on a valid session.
                tracing::warn!("failed to record session activity: {err:#}");
            }
            req.extensions_mut().insert(CurrentSession {
                token: session.token,
                user: session.user,
            });
            next.run(req).await
        }
        // Allow with no session cannot come out of the decision table;
        // fall through to the login redirect if it ever did.
        (Decision::Allow, None) | (Decision::RedirectLogin, _) => (
            StatusCode::UNAUTHORIZED,
            ApiEnvelope::<()>::fail_redirect("authentication required", "/login"),
        )
            .into_response(),
        (Decision::RedirectHome, _) => (
            StatusCode::FORBIDDEN,
            ApiEnvelope::<()>::fail_redirect("admin access required", "/"),
        )
            .into_response(),
    }
}

/// Pull the bearer token out of the Authorization header, if any.
fn bearer_token(req: &Request) -> Option<String> {
    // ---
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}
