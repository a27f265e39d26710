//! Payment instrument validation, the submission state machine, and the
//! invoice snapshot generated once a rental is confirmed and paid.

use super::models::{CarDetail, RentalIntent, UserProfile};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// `MM/YY`, month 01-12.
static EXPIRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0[1-9]|1[0-2])/([0-9]{2})$").expect("expiry regex"));

/// Card details as entered in the payment form. Never logged, never stored;
/// only the masked form survives into the invoice.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInfo {
    // ---
    pub card_number: String,
    pub card_holder: String,
    /// `MM/YY`.
    pub expiry: String,
    pub cvv: String,
}

/// Client-side validation failure; stays on the device, the workflow
/// remains editable.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CardError {
    // ---
    #[error("card number must be exactly 16 digits")]
    BadNumber,

    #[error("cardholder name must not be empty")]
    EmptyHolder,

    #[error("expiry must be MM/YY")]
    BadExpiry,

    #[error("card is expired")]
    Expired,

    #[error("CVV must be exactly 3 digits")]
    BadCvv,
}

impl CardInfo {
    /// Digits of the card number with separators stripped.
    fn number_digits(&self) -> String {
        // ---
        self.card_number.chars().filter(char::is_ascii_digit).collect()
    }

    /// Validate every field against `today`.
    ///
    /// Expiry is checked against the current month: a card whose `MM/YY`
    /// lies before `today` is rejected.
    pub fn validate(&self, today: NaiveDate) -> Result<(), CardError> {
        // ---
        if self.number_digits().len() != 16 {
            return Err(CardError::BadNumber);
        }
        if self.card_holder.trim().is_empty() {
            return Err(CardError::EmptyHolder);
        }
        let captures = EXPIRY_RE.captures(self.expiry.trim()).ok_or(CardError::BadExpiry)?;
        let month: i32 = captures[1].parse().map_err(|_| CardError::BadExpiry)?;
        let year: i32 = captures[2].parse().map_err(|_| CardError::BadExpiry)?;
        // Two-digit years all live in the 2000s as far as this form cares.
        let expires = (2000 + year, month);
        let current = (today.year(), today.month() as i32);
        if expires < current {
            return Err(CardError::Expired);
        }
        let cvv = self.cvv.trim();
        if cvv.len() != 3 || !cvv.chars().all(|c| c.is_ascii_digit()) {
            return Err(CardError::BadCvv);
        }
        Ok(())
    }

    /// Redact all but the last four digits.
    pub fn masked_number(&self) -> String {
        // ---
        let digits = self.number_digits();
        let keep = digits.len().saturating_sub(4);
        let mut masked: String = "*".repeat(keep);
        masked.push_str(&digits[keep..]);
        masked
    }
}

/// States of one payment submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentState {
    // ---
    /// Form is open for input; the only state errors return to.
    Editing,
    /// A submission is in flight; further submissions are rejected.
    Submitting,
    /// Terminal. A new rental starts a new workflow from scratch.
    Completed,
}

/// Error raised on an illegal workflow transition.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorkflowError {
    // ---
    #[error("a payment submission is already in flight")]
    AlreadySubmitting,

    #[error("payment already completed; start a new rental")]
    AlreadyCompleted,
}

/// Submission state machine: `Editing -> Submitting -> {Completed | Editing}`.
///
/// One instance covers one rental intent; it exists so the ordering rules
/// (no double submission, no resume after completion) are enforced in one
/// place and testable without any HTTP involved.
#[derive(Debug)]
pub struct PaymentWorkflow {
    // ---
    state: PaymentState,
    last_error: Option<String>,
}

impl PaymentWorkflow {
    pub fn new() -> Self {
        // ---
        Self { state: PaymentState::Editing, last_error: None }
    }

    pub fn state(&self) -> PaymentState {
        // ---
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        // ---
        self.last_error.as_deref()
    }

    /// Enter `Submitting`. Rejected unless currently `Editing`.
    pub fn begin_submit(&mut self) -> Result<(), WorkflowError> {
        // ---
        match self.state {
            PaymentState::Editing => {
                self.state = PaymentState::Submitting;
                self.last_error = None;
                Ok(())
            }
            PaymentState::Submitting => Err(WorkflowError::AlreadySubmitting),
            PaymentState::Completed => Err(WorkflowError::AlreadyCompleted),
        }
    }

    /// Settlement and persistence succeeded; the workflow is finished.
    pub fn complete(&mut self) {
        // ---
        debug_assert_eq!(self.state, PaymentState::Submitting);
        self.state = PaymentState::Completed;
    }

    /// Submission failed; surface the message and return to `Editing`.
    /// Never retried automatically.
    pub fn fail(&mut self, message: impl Into<String>) {
        // ---
        debug_assert_eq!(self.state, PaymentState::Submitting);
        self.state = PaymentState::Editing;
        self.last_error = Some(message.into());
    }
}

impl Default for PaymentWorkflow {
    fn default() -> Self {
        // ---
        Self::new()
    }
}

/// What makes one proposed rental unique for submission purposes:
/// customer, vehicle and pickup date.
pub type SubmissionKey = (i64, i64, NaiveDate);

/// Process-wide registry of in-flight payment submissions.
///
/// The per-request [`PaymentWorkflow`] orders the steps of a single
/// submission; this ledger carries the no-double-submission rule across
/// requests. While one submission for a key is settling, a second one for
/// the same key is rejected instead of producing a second rental.
pub struct SubmissionLedger {
    // ---
    in_flight: Mutex<HashSet<SubmissionKey>>,
}

impl SubmissionLedger {
    pub fn new() -> Self {
        // ---
        Self { in_flight: Mutex::new(HashSet::new()) }
    }

    fn entries(&self) -> MutexGuard<'_, HashSet<SubmissionKey>> {
        // ---
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim `key` for the lifetime of the returned guard. Fails while an
    /// earlier claim on the same key is still alive.
    pub fn begin(&self, key: SubmissionKey) -> Result<SubmissionGuard<'_>, WorkflowError> {
        // ---
        if !self.entries().insert(key) {
            return Err(WorkflowError::AlreadySubmitting);
        }
        Ok(SubmissionGuard { ledger: self, key })
    }
}

impl Default for SubmissionLedger {
    fn default() -> Self {
        // ---
        Self::new()
    }
}

/// Releases the claimed key when the submission ends, however it ends.
pub struct SubmissionGuard<'a> {
    // ---
    ledger: &'a SubmissionLedger,
    key: SubmissionKey,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        // ---
        self.ledger.entries().remove(&self.key);
    }
}

/// Proof-of-transaction document generated after payment completes.
///
/// Write-once and transient: it is rendered into the download response and
/// never stored by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    // ---
    pub invoice_number: String,
    pub issued_at: DateTime<Utc>,
    pub customer_name: String,
    pub masked_card_number: String,
    pub brand_name: String,
    pub description: String,
    pub rent_date: NaiveDate,
    pub return_date: NaiveDate,
    pub days: i64,
    pub daily_price: f64,
    pub total_price: f64,
    pub currency: String,
}

impl Invoice {
    /// Snapshot vehicle and intent into an invoice. Uniqueness of the
    /// invoice number comes from the millisecond generation timestamp.
    pub fn generate(
        car: &CarDetail,
        intent: &RentalIntent,
        customer: &UserProfile,
        card: &CardInfo,
    ) -> Self {
        // ---
        let issued_at = Utc::now();
        Self {
            invoice_number: format!("INV-{}", issued_at.timestamp_millis()),
            issued_at,
            customer_name: customer.full_name(),
            masked_card_number: card.masked_number(),
            brand_name: car.brand_name.clone(),
            description: car.description.clone(),
            rent_date: intent.rent_date,
            return_date: intent.return_date,
            days: (intent.return_date - intent.rent_date).num_days(),
            daily_price: car.daily_price,
            total_price: intent.total_price,
            currency: "TL".to_string(),
        }
    }

    /// File name offered in the download response.
    pub fn file_name(&self) -> String {
        // ---
        format!("{}.json", self.invoice_number)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn card(number: &str, holder: &str, expiry: &str, cvv: &str) -> CardInfo {
        // ---
        CardInfo {
            card_number: number.into(),
            card_holder: holder.into(),
            expiry: expiry.into(),
            cvv: cvv.into(),
        }
    }

    fn today() -> NaiveDate {
        // ---
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn sixteen_digit_number_passes() {
        // ---
        let c = card("4111111111111111", "Ada Lovelace", "12/29", "123");
        assert_eq!(c.validate(today()), Ok(()));
    }

    #[test]
    fn separators_are_stripped_before_counting() {
        // ---
        let c = card("4111 1111 1111 1111", "Ada Lovelace", "12/29", "123");
        assert_eq!(c.validate(today()), Ok(()));
    }

    #[test]
    fn short_number_fails() {
        // ---
        let c = card("41111111111", "Ada Lovelace", "12/29", "123");
        assert_eq!(c.validate(today()), Err(CardError::BadNumber));
    }

    #[test]
    fn empty_holder_fails() {
        // ---
        let c = card("4111111111111111", "   ", "12/29", "123");
        assert_eq!(c.validate(today()), Err(CardError::EmptyHolder));
    }

    #[test]
    fn expiry_format_and_month_range() {
        // ---
        let bad = card("4111111111111111", "Ada", "13/29", "123");
        assert_eq!(bad.validate(today()), Err(CardError::BadExpiry));
        let bad = card("4111111111111111", "Ada", "1229", "123");
        assert_eq!(bad.validate(today()), Err(CardError::BadExpiry));
    }

    #[test]
    fn past_expiry_is_rejected() {
        // ---
        let c = card("4111111111111111", "Ada", "05/24", "123");
        assert_eq!(c.validate(today()), Err(CardError::Expired));
        // Same month is still valid.
        let c = card("4111111111111111", "Ada", "06/24", "123");
        assert_eq!(c.validate(today()), Ok(()));
    }

    #[test]
    fn cvv_must_be_three_digits() {
        // ---
        let c = card("4111111111111111", "Ada", "12/29", "12");
        assert_eq!(c.validate(today()), Err(CardError::BadCvv));
        let c = card("4111111111111111", "Ada", "12/29", "123");
        assert_eq!(c.validate(today()), Ok(()));
        let c = card("4111111111111111", "Ada", "12/29", "12a");
        assert_eq!(c.validate(today()), Err(CardError::BadCvv));
    }

    #[test]
    fn masking_keeps_last_four() {
        // ---
        let c = card("4111 1111 1111 1111", "Ada", "12/29", "123");
        assert_eq!(c.masked_number(), "************1111");
    }

    #[test]
    fn workflow_happy_path() {
        // ---
        let mut wf = PaymentWorkflow::new();
        assert_eq!(wf.state(), PaymentState::Editing);
        wf.begin_submit().unwrap();
        assert_eq!(wf.state(), PaymentState::Submitting);
        wf.complete();
        assert_eq!(wf.state(), PaymentState::Completed);
        // Terminal: nothing restarts a completed workflow.
        assert_eq!(wf.begin_submit(), Err(WorkflowError::AlreadyCompleted));
    }

    #[test]
    fn ledger_rejects_a_duplicate_in_flight_submission() {
        // ---
        let ledger = SubmissionLedger::new();
        let key = (42, 1, NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());

        let guard = ledger.begin(key).unwrap();
        assert!(matches!(ledger.begin(key), Err(WorkflowError::AlreadySubmitting)));

        // An unrelated rental is unaffected.
        let other = (42, 2, NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());
        drop(ledger.begin(other).unwrap());

        // Releasing the claim allows a fresh submission for the same key.
        drop(guard);
        assert!(ledger.begin(key).is_ok());
    }

    #[test]
    fn workflow_failure_returns_to_editing_with_message() {
        // ---
        let mut wf = PaymentWorkflow::new();
        wf.begin_submit().unwrap();
        assert_eq!(wf.begin_submit(), Err(WorkflowError::AlreadySubmitting));
        wf.fail("card declined");
        assert_eq!(wf.state(), PaymentState::Editing);
        assert_eq!(wf.last_error(), Some("card declined"));
        // A fresh attempt is allowed after a failure.
        wf.begin_submit().unwrap();
    }
}
