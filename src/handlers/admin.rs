//! Admin console: CRUD for cars, brands, colors, roles and users.
//!
//! Thin, uniform proxies over the backend CRUD endpoints. The only logic
//! owned here is field validation that must not wait for a round trip:
//! reference-entity names non-empty after trimming, vehicle fields within
//! their documented ranges. Uniqueness stays server-side.

use crate::app_state::AppState;
use crate::domain::{Brand, CarUpsert, Color, Role, UserProfile};
use crate::guard::CurrentSession;
use crate::handlers::shared_types::{backend_failure, ApiEnvelope};
use axum::response::{IntoResponse, Response};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

/// `{name}` body for brand/color/role creation.
#[derive(Debug, Deserialize)]
pub struct NamedCreate {
    // ---
    pub name: String,
}

fn trimmed_name(raw: &str) -> Result<&str, Response> {
    // ---
    let name = raw.trim();
    if name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, ApiEnvelope::<()>::fail("name must not be empty"))
            .into_response());
    }
    Ok(name)
}

fn done() -> Response {
    // ---
    ApiEnvelope::<()>::ok_message("done").into_response()
}

// ============================================================
// Cars
// ============================================================

/// POST /admin/cars
#[tracing::instrument(skip(state, session, car))]
pub async fn add_car(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Json(car): Json<CarUpsert>,
) -> Response {
    // ---
    if let Err(message) = car.validate() {
        return (StatusCode::BAD_REQUEST, ApiEnvelope::<()>::fail(message)).into_response();
    }
    match state.backend().add_car(&session.token, &car).await {
        Ok(()) => done(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}

/// PUT /admin/cars
#[tracing::instrument(skip(state, session, car))]
pub async fn update_car(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Json(car): Json<CarUpsert>,
) -> Response {
    // ---
    if let Err(message) = car.validate() {
        return (StatusCode::BAD_REQUEST, ApiEnvelope::<()>::fail(message)).into_response();
    }
    match state.backend().update_car(&session.token, &car).await {
        Ok(()) => done(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}

/// DELETE /admin/cars/{id}
#[tracing::instrument(skip(state, session))]
pub async fn delete_car(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> Response {
    // ---
    match state.backend().delete_car(&session.token, id).await {
        Ok(()) => done(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}

// ============================================================
// Brands
// ============================================================

/// POST /admin/brands
#[tracing::instrument(skip(state, session, req))]
pub async fn add_brand(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Json(req): Json<NamedCreate>,
) -> Response {
    // ---
    let name = match trimmed_name(&req.name) {
        Ok(name) => name,
        Err(response) => return response,
    };
    match state.backend().add_brand(&session.token, name).await {
        Ok(()) => done(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}

/// PUT /admin/brands
#[tracing::instrument(skip(state, session, brand))]
pub async fn update_brand(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Json(brand): Json<Brand>,
) -> Response {
    // ---
    if let Err(response) = trimmed_name(&brand.brand_name) {
        return response;
    }
    match state.backend().update_brand(&session.token, &brand).await {
        Ok(()) => done(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}

/// DELETE /admin/brands/{id}
#[tracing::instrument(skip(state, session))]
pub async fn delete_brand(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> Response {
    // ---
    match state.backend().delete_brand(&session.token, id).await {
        Ok(()) => done(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}

// ============================================================
// Colors
// ============================================================

/// POST /admin/colors
#[tracing::instrument(skip(state, session, req))]
pub async fn add_color(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Json(req): Json<NamedCreate>,
) -> Response {
    // ---
    let name = match trimmed_name(&req.name) {
        Ok(name) => name,
        Err(response) => return response,
    };
    match state.backend().add_color(&session.token, name).await {
        Ok(()) => done(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}

/// PUT /admin/colors
#[tracing::instrument(skip(state, session, color))]
pub async fn update_color(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Json(color): Json<Color>,
) -> Response {
    // ---
    if let Err(response) = trimmed_name(&color.color_name) {
        return response;
    }
    match state.backend().update_color(&session.token, &color).await {
        Ok(()) => done(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}

/// DELETE /admin/colors/{id}
#[tracing::instrument(skip(state, session))]
pub async fn delete_color(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> Response {
    // ---
    match state.backend().delete_color(&session.token, id).await {
        Ok(()) => done(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}

// ============================================================
// Roles
// ============================================================

/// GET /admin/roles
#[tracing::instrument(skip(state, session))]
pub async fn list_roles(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Response {
    // ---
    match state.backend().roles(&session.token).await {
        Ok(roles) => ApiEnvelope::ok(roles).into_response(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}

/// POST /admin/roles
#[tracing::instrument(skip(state, session, req))]
pub async fn add_role(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Json(req): Json<NamedCreate>,
) -> Response {
    // ---
    let name = match trimmed_name(&req.name) {
        Ok(name) => name,
        Err(response) => return response,
    };
    match state.backend().add_role(&session.token, name).await {
        Ok(()) => done(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}

/// PUT /admin/roles
#[tracing::instrument(skip(state, session, role))]
pub async fn update_role(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Json(role): Json<Role>,
) -> Response {
    // ---
    if let Err(response) = trimmed_name(&role.name) {
        return response;
    }
    match state.backend().update_role(&session.token, &role).await {
        Ok(()) => done(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}

/// DELETE /admin/roles/{id}
#[tracing::instrument(skip(state, session))]
pub async fn delete_role(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> Response {
    // ---
    match state.backend().delete_role(&session.token, id).await {
        Ok(()) => done(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}

// ============================================================
// Users
// ============================================================

/// GET /admin/users
#[tracing::instrument(skip(state, session))]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Response {
    // ---
    match state.backend().users(&session.token).await {
        Ok(users) => ApiEnvelope::ok(users).into_response(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}

/// PUT /admin/users
#[tracing::instrument(skip(state, session, user))]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Json(user): Json<UserProfile>,
) -> Response {
    // ---
    match state.backend().update_user(&session.token, &user).await {
        Ok(()) => done(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}

/// DELETE /admin/users/{id}
#[tracing::instrument(skip(state, session))]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> Response {
    // ---
    match state.backend().delete_user(&session.token, id).await {
        Ok(()) => done(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}
