//! Vehicle catalog browsing.
//!
//! The backend serves the full denormalized listing; filtering happens
//! here, in memory, with the pure catalog filter. Reference lists (brands,
//! colors) are fetched alongside so ids in the query string can be
//! resolved to the names the listing actually carries.

use crate::app_state::AppState;
use crate::domain::{apply_filter, Brand, CarDetail, CatalogFilter, Color};
use crate::guard::CurrentSession;
use crate::handlers::shared_types::{backend_failure, ApiEnvelope};
use axum::response::{IntoResponse, Response};
use axum::{
    extract::{Query, State},
    Extension,
};

/// GET /cars
///
/// Query parameters: `brand_id`, `color_id`, `min_year`, `max_year`,
/// `min_price`, `max_price` — all optional, bounds inclusive. An inverted
/// range yields an empty list rather than being silently corrected.
#[tracing::instrument(skip(state, session))]
pub async fn list_cars(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Query(filter): Query<CatalogFilter>,
) -> Response {
    // ---
    let token = session.token.as_str();
    let backend = state.backend();

    // The three fetches are independent; issue them concurrently the way
    // the browser client did.
    let fetched = futures::try_join!(
        backend.car_details(token),
        backend.brands(token),
        backend.colors(token),
    );

    let (cars, brands, colors): (Vec<CarDetail>, Vec<Brand>, Vec<Color>) = match fetched {
        Ok(lists) => lists,
        Err(err) => return backend_failure(&state, Some(token), err).await,
    };

    let filtered: Vec<CarDetail> = apply_filter(cars, &filter, &brands, &colors)
        .into_iter()
        .map(|mut car| {
            car.ensure_cover_image();
            car
        })
        .collect();
    ApiEnvelope::ok(filtered).into_response()
}

/// GET /brands — reference list for the filter UI and admin console.
#[tracing::instrument(skip(state, session))]
pub async fn list_brands(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Response {
    // ---
    match state.backend().brands(&session.token).await {
        Ok(brands) => ApiEnvelope::ok(brands).into_response(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}

/// GET /colors — reference list for the filter UI and admin console.
#[tracing::instrument(skip(state, session))]
pub async fn list_colors(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Response {
    // ---
    match state.backend().colors(&session.token).await {
        Ok(colors) => ApiEnvelope::ok(colors).into_response(),
        Err(err) => backend_failure(&state, Some(&session.token), err).await,
    }
}
