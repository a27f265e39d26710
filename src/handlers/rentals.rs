//! Rental listing and the pricing/eligibility quote.

use crate::app_state::AppState;
use crate::domain::{quote, BackendError, CarDetail};
use crate::guard::CurrentSession;
use crate::handlers::shared_types::{backend_failure, ApiEnvelope};
use axum::response::{IntoResponse, Response};
use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::NaiveDate;
use serde::Deserialize;

/// GET /rentals
#[tracing::instrument(skip(state, session))]
pub async fn list_rentals(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Response {
    // ---
    match state.backend().rentals(&session.token).await {
        Ok(rentals) => ApiEnvelope::ok(rentals).into_response(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    // ---
    pub car_id: i64,
    pub rent_date: NaiveDate,
    pub return_date: NaiveDate,
}

/// POST /rentals/quote
///
/// Prices the proposed date range against the selected vehicle and gates
/// it on the caller's findeks score. The response tells the client whether
/// payment may be entered; the payment endpoint re-checks everything
/// anyway, so a tampered client gains nothing.
#[tracing::instrument(skip(state, session, req))]
pub async fn quote_rental(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Json(req): Json<QuoteRequest>,
) -> Response {
    // ---
    let token = session.token.as_str();

    let car = match find_car(&state, token, req.car_id).await {
        Ok(car) => car,
        Err(response) => return *response,
    };

    let score = findeks_score_or_zero(&state, token, session.user.id).await;
    match score {
        Ok(score) => match quote(&car, req.rent_date, req.return_date, score) {
            Ok(quote) => ApiEnvelope::ok(quote).into_response(),
            Err(err) => {
                (StatusCode::BAD_REQUEST, ApiEnvelope::<()>::fail(err.to_string())).into_response()
            }
        },
        Err(err) => backend_failure(&state, Some(token), err).await,
    }
}

/// Locate a listing by id, or produce the error response to return.
pub(super) async fn find_car(
    state: &AppState,
    token: &str,
    car_id: i64,
) -> Result<CarDetail, Box<Response>> {
    // ---
    let cars = match state.backend().car_details(token).await {
        Ok(cars) => cars,
        Err(err) => return Err(Box::new(backend_failure(state, Some(token), err).await)),
    };
    cars.into_iter().find(|car| car.car_id == car_id).ok_or_else(|| {
        Box::new(
            (StatusCode::NOT_FOUND, ApiEnvelope::<()>::fail("vehicle not found"))
                .into_response(),
        )
    })
}

/// Fetch the caller's findeks score, degrading to the conservative 0 when
/// the lookup fails: eligibility then fails closed instead of crashing or
/// silently granting. A 401 is not degraded; it must tear the session down.
pub(super) async fn findeks_score_or_zero(
    state: &AppState,
    token: &str,
    user_id: i64,
) -> Result<i32, BackendError> {
    // ---
    match state.backend().findeks_score(token, user_id).await {
        Ok(score) => Ok(score),
        Err(BackendError::Unauthorized) => Err(BackendError::Unauthorized),
        Err(err) => {
            tracing::warn!("findeks score unavailable, assuming 0: {err}");
            Ok(0)
        }
    }
}
