//! Rental pricing and eligibility.
//!
//! Duration is a calendar-day difference over date-only values, so the
//! result cannot drift with time-of-day or timezone. The credit-score gate
//! compares the renter's findeks score against the vehicle's configured
//! minimum; the boundary is inclusive.

use super::models::{CarDetail, RentalIntent};
use chrono::NaiveDate;

/// Why a quote or intent could not be formed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PricingError {
    // ---
    #[error("return date precedes rental start")]
    ReturnPrecedesStart,

    #[error("rental start cannot be in the past")]
    StartInPast,

    #[error("return date must be after the rental start")]
    ZeroDuration,

    #[error("findeks score {score} is below the required minimum {required}")]
    NotEligible { score: i32, required: i32 },

    #[error("total price must be positive")]
    NothingToBill,
}

/// Priced and eligibility-checked view of a proposed date range.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalQuote {
    // ---
    pub days: i64,
    pub total_price: f64,
    pub findeks_score: i32,
    pub min_findeks_score: i32,
    pub eligible: bool,
    /// False whenever `total_price <= 0` or the score gate fails;
    /// the payment step may not be entered while this is false.
    pub payment_enabled: bool,
}

/// Calendar-day difference, negative when `return_date` is earlier.
pub fn rental_days(rent_date: NaiveDate, return_date: NaiveDate) -> i64 {
    // ---
    (return_date - rent_date).num_days()
}

/// Price a date range against a vehicle and gate it on the findeks score.
///
/// A negative duration is the only hard error here; a zero-day range or a
/// failed score gate still produce a quote, just one whose payment
/// progression is disabled. That mirrors how the selection screen behaves:
/// the numbers stay visible while the pay button does not light up.
pub fn quote(
    car: &CarDetail,
    rent_date: NaiveDate,
    return_date: NaiveDate,
    findeks_score: i32,
) -> Result<RentalQuote, PricingError> {
    // ---
    let days = rental_days(rent_date, return_date);
    if days < 0 {
        return Err(PricingError::ReturnPrecedesStart);
    }

    let total_price = days as f64 * car.daily_price;
    let eligible = findeks_score >= car.min_findeks_score;

    Ok(RentalQuote {
        days,
        total_price,
        findeks_score,
        min_findeks_score: car.min_findeks_score,
        eligible,
        payment_enabled: total_price > 0.0 && eligible,
    })
}

/// Assemble the rental intent handed to the payment workflow.
///
/// Stricter than [`quote`]: the range must span at least one billed day and
/// start today or later, and the score gate must pass. The resulting intent
/// is the last artifact the pricing engine produces; everything after it
/// belongs to payment.
pub fn build_intent(
    car: &CarDetail,
    customer_id: i64,
    rent_date: NaiveDate,
    return_date: NaiveDate,
    findeks_score: i32,
    today: NaiveDate,
) -> Result<RentalIntent, PricingError> {
    // ---
    if findeks_score < car.min_findeks_score {
        return Err(PricingError::NotEligible {
            score: findeks_score,
            required: car.min_findeks_score,
        });
    }
    if rent_date < today {
        return Err(PricingError::StartInPast);
    }
    if return_date < rent_date {
        return Err(PricingError::ReturnPrecedesStart);
    }
    if return_date == rent_date {
        return Err(PricingError::ZeroDuration);
    }

    let quote = quote(car, rent_date, return_date, findeks_score)?;
    if !quote.payment_enabled {
        // Unreachable given the checks above, kept as a final guard on the
        // invariant that no zero-priced intent ever reaches payment.
        return Err(PricingError::NothingToBill);
    }

    Ok(RentalIntent {
        car_id: car.car_id,
        customer_id,
        rent_date,
        return_date,
        total_price: quote.total_price,
    })
}
