//! Application state management.
//!
//! This module defines the shared state structure that gets passed to all
//! Axum handlers via the `State` extractor. The `AppState` contains shared
//! resources like the credential store, the backend API client, the session
//! manager, and the metrics implementation.
//!
//! The state is designed to be cheaply cloneable (using `Arc` internally
//! where needed) so it can be passed efficiently to each request handler
//! without expensive copying of resources.

use crate::domain::{CredentialStorePtr, MetricsPtr, RentalBackendPtr, SubmissionLedger};
use crate::session::SessionManager;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state passed to all Axum handlers.
///
/// This struct serves as the Dependency Injection container for the
/// application. Handlers depend on the trait seams (`CredentialStore`,
/// `RentalBackend`, `Metrics`), never on the concrete Redis / reqwest /
/// Prometheus implementations behind them.
///
/// # Lifecycle
///
/// 1. Created once in `create_router()` during application startup
/// 2. Attached to the Axum router via `.with_state(app_state)`
/// 3. Cloned automatically by Axum for each incoming HTTP request
#[derive(Clone)]
pub(crate) struct AppState {
    /// Credential storage behind the narrow load/save/clear seam.
    ///
    /// Held directly (in addition to being owned by the session manager)
    /// so the health endpoint can probe storage connectivity.
    credential_store: CredentialStorePtr,

    /// Session lifecycle: open, activity tracking, expiry, teardown.
    sessions: Arc<SessionManager>,

    /// Client for the external rental REST API.
    backend: RentalBackendPtr,

    /// Metrics implementation for recording application events.
    ///
    /// Either Prometheus-backed (production) or no-op (testing/development).
    metrics: MetricsPtr,

    /// In-flight payment submissions, for the no-double-submission rule.
    submissions: Arc<SubmissionLedger>,

    /// Artificial settlement delay applied by the payment workflow.
    settle_delay: Duration,
}

impl AppState {
    // ---

    pub fn new(
        credential_store: CredentialStorePtr,
        sessions: Arc<SessionManager>,
        backend: RentalBackendPtr,
        metrics: MetricsPtr,
        settle_delay: Duration,
    ) -> Self {
        // ---
        AppState {
            credential_store,
            sessions,
            backend,
            metrics,
            submissions: Arc::new(SubmissionLedger::new()),
            settle_delay,
        }
    }

    /// Get a reference to the credential store.
    pub(crate) fn credential_store(&self) -> &CredentialStorePtr {
        // ---
        &self.credential_store
    }

    /// Get a reference to the session manager.
    pub(crate) fn sessions(&self) -> &SessionManager {
        // ---
        &self.sessions
    }

    /// Get a reference to the backend API client.
    pub(crate) fn backend(&self) -> &RentalBackendPtr {
        // ---
        &self.backend
    }

    /// Get a reference to the metrics implementation.
    pub(crate) fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    /// Get a reference to the in-flight submission ledger.
    pub(crate) fn submissions(&self) -> &SubmissionLedger {
        // ---
        &self.submissions
    }

    /// Get the simulated settlement delay.
    pub(crate) fn settle_delay(&self) -> Duration {
        // ---
        self.settle_delay
    }
}
