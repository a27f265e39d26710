//! Payment submission: validate the card, simulate settlement, persist the
//! rental through the backend, and emit the invoice as a download.
//!
//! Steps run strictly sequentially (validate, settle, persist, invoice)
//! within one request; the workflow object enforces that ordering, and the
//! shared submission ledger rejects a concurrent submission for the same
//! rental. Everything the quote endpoint established is re-checked here
//! from scratch — the quote is advisory, this is the gate that counts.

use crate::app_state::AppState;
use crate::domain::{
    build_intent, CardInfo, Invoice, PaymentWorkflow, PricingError,
};
use crate::guard::CurrentSession;
use crate::handlers::rentals::{find_car, findeks_score_or_zero};
use crate::handlers::shared_types::{backend_failure, ApiEnvelope};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    // ---
    pub car_id: i64,
    pub rent_date: NaiveDate,
    pub return_date: NaiveDate,
    pub card: CardInfo,
}

/// POST /payment
///
/// On success the response body is the invoice document, served with a
/// `Content-Disposition` attachment header so the client offers it as a
/// download. The invoice exists only in this response; the gateway keeps
/// nothing.
#[tracing::instrument(skip(state, session, req))]
pub async fn submit_payment(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Json(req): Json<PaymentRequest>,
) -> Response {
    // ---
    let today = Utc::now().date_naive();

    // Validation failures never leave the device, and never enter the
    // submitting state: the form stays editable.
    if let Err(err) = req.card.validate(today) {
        return (StatusCode::BAD_REQUEST, ApiEnvelope::<()>::fail(err.to_string()))
            .into_response();
    }

    let mut workflow = PaymentWorkflow::new();
    if let Err(err) = workflow.begin_submit() {
        return (StatusCode::CONFLICT, ApiEnvelope::<()>::fail(err.to_string())).into_response();
    }

    // Claim this rental in the cross-request ledger before anything slow
    // happens; a concurrent submission for the same rental answers 409
    // instead of settling twice. The claim is released when the guard
    // drops, whichever way this handler exits.
    let _submission = match state
        .submissions()
        .begin((session.user.id, req.car_id, req.rent_date))
    {
        Ok(guard) => guard,
        Err(err) => {
            return (StatusCode::CONFLICT, ApiEnvelope::<()>::fail(err.to_string()))
                .into_response();
        }
    };

    let token = session.token.as_str();

    let car = match find_car(&state, token, req.car_id).await {
        Ok(car) => car,
        Err(response) => {
            state.metrics().record_payment_failed();
            return *response;
        }
    };

    let score = match findeks_score_or_zero(&state, token, session.user.id).await {
        Ok(score) => score,
        Err(err) => {
            state.metrics().record_payment_failed();
            return backend_failure(&state, Some(token), err).await;
        }
    };

    let intent = match build_intent(
        &car,
        session.user.id,
        req.rent_date,
        req.return_date,
        score,
        today,
    ) {
        Ok(intent) => intent,
        Err(err) => {
            workflow.fail(err.to_string());
            state.metrics().record_payment_failed();
            let status = match err {
                PricingError::NotEligible { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_REQUEST,
            };
            return (status, ApiEnvelope::<()>::fail(err.to_string())).into_response();
        }
    };

    // Simulated settlement; stands in for a real payment gateway.
    tokio::time::sleep(state.settle_delay()).await;

    if let Err(err) = state.backend().create_rental(token, &intent).await {
        workflow.fail(err.to_string());
        state.metrics().record_payment_failed();
        return backend_failure(&state, Some(token), err).await;
    }

    workflow.complete();
    state.metrics().record_rental_created();

    let invoice = Invoice::generate(&car, &intent, &session.user, &req.card);
    tracing::info!(
        user_id = session.user.id,
        car_id = intent.car_id,
        total = intent.total_price,
        invoice = %invoice.invoice_number,
        "rental paid and persisted"
    );

    let disposition = format!("attachment; filename=\"{}\"", invoice.file_name());
    (
        StatusCode::OK,
        [(header::CONTENT_DISPOSITION, disposition)],
        ApiEnvelope::ok(invoice),
    )
        .into_response()
}
