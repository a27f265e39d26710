//! Session lifecycle for authenticated users.
//!
//! A session is the stored pair of bearer token and user snapshot, bounded
//! by two independent expiry policies: an inactivity timeout rearmed by
//! every qualifying request, and an absolute ceiling counted from login.
//! Whichever elapses first ends the session. All timer state lives on the
//! [`SessionManager`] instance owned by the application root; there is no
//! ambient module state.

use crate::domain::{CredentialStorePtr, MetricsPtr, StoredCredentials, UserProfile};
use anyhow::{bail, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};

/// Snapshot of a live session, returned by a successful validity check.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    // ---
    pub token: String,
    pub user: UserProfile,
    pub started_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

/// Owns the credential store and both expiry policies.
///
/// Lifecycle is tied to the application state; handlers and the guard
/// layer reach sessions only through this object.
pub struct SessionManager {
    // ---
    store: CredentialStorePtr,
    metrics: MetricsPtr,
    inactivity_timeout: Duration,
    absolute_timeout: Duration,
}

impl SessionManager {
    pub fn new(
        store: CredentialStorePtr,
        metrics: MetricsPtr,
        inactivity_timeout: std::time::Duration,
        absolute_timeout: std::time::Duration,
    ) -> Self {
        // ---
        Self {
            store,
            metrics,
            inactivity_timeout: Duration::from_std(inactivity_timeout)
                .unwrap_or_else(|_| Duration::seconds(60)),
            absolute_timeout: Duration::from_std(absolute_timeout)
                .unwrap_or_else(|_| Duration::seconds(3600)),
        }
    }

    /// Open a session on successful login. Both timestamps start at now.
    ///
    /// Rejects tokens that fail structural decode up front; a token we
    /// could never validate later must not enter storage at all.
    pub async fn open(&self, token: &str, user: UserProfile) -> Result<()> {
        // ---
        if !token_decodes(token) {
            bail!("refusing to store a structurally malformed token");
        }
        let credentials = StoredCredentials::new(token.to_string(), user, Utc::now());
        self.store.save(token, &credentials).await?;
        tracing::debug!("session opened");
        Ok(())
    }

    /// Rearm both expiry policies by stamping the current time as the last
    /// activity. A burst of calls collapses naturally: the most recent
    /// stamp wins. Partial pairs are left alone; the next validity check
    /// purges them.
    pub async fn record_activity(&self, token: &str) -> Result<()> {
        // ---
        if let Some(mut credentials) = self.store.load(token).await? {
            if credentials.is_complete() {
                credentials.last_activity_at = Some(Utc::now());
                self.store.save(token, &credentials).await?;
            }
        }
        Ok(())
    }

    /// Query session validity.
    ///
    /// Returns the session snapshot only while the pair is complete, the
    /// token still decodes, and neither expiry policy has elapsed.
    /// **Side effect**: a check that fails for any of those reasons purges
    /// the stored pair before returning `None`, so callers must tolerate a
    /// state change as a result of mere inspection.
    pub async fn is_valid(&self, token: &str) -> Result<Option<SessionInfo>> {
        // ---
        let Some(credentials) = self.store.load(token).await? else {
            return Ok(None);
        };

        match self.check(token, &credentials, Utc::now()) {
            SessionCheck::Live(info) => Ok(Some(info)),
            SessionCheck::Dead(reason) => {
                tracing::info!(%reason, "session ended");
                self.metrics.record_session_expired();
                self.store.clear(token).await?;
                Ok(None)
            }
        }
    }

    /// Explicit teardown: logout, or a backend 401 observed mid-request.
    pub async fn invalidate(&self, token: &str) -> Result<()> {
        // ---
        self.store.clear(token).await
    }

    /// Pure verdict over stored credentials at a given instant.
    fn check(&self, token: &str, credentials: &StoredCredentials, now: DateTime<Utc>) -> SessionCheck {
        // ---
        let (Some(stored_token), Some(user)) = (&credentials.token, &credentials.user) else {
            return SessionCheck::Dead("partial credential pair");
        };
        if stored_token != token || !token_decodes(token) {
            return SessionCheck::Dead("malformed token");
        }
        let (Some(started_at), Some(last_activity_at)) =
            (credentials.started_at, credentials.last_activity_at)
        else {
            return SessionCheck::Dead("missing timestamps");
        };
        if now - last_activity_at >= self.inactivity_timeout {
            return SessionCheck::Dead("inactivity timeout");
        }
        if now - started_at >= self.absolute_timeout {
            return SessionCheck::Dead("absolute session timeout");
        }
        SessionCheck::Live(SessionInfo {
            token: token.to_string(),
            user: user.clone(),
            started_at,
            last_activity_at,
        })
    }
}

enum SessionCheck {
    // ---
    Live(SessionInfo),
    Dead(&'static str),
}

/// Structural token check: three dot-separated segments whose payload
/// decodes as base64url JSON. No signature verification happens here; the
/// backend owns the key, the gateway only detects corruption.
pub fn token_decodes(token: &str) -> bool {
    // ---
    let mut segments = token.split('.');
    let (Some(_), Some(payload), Some(_), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return false;
    };
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(payload) else {
        return false;
    };
    serde_json::from_slice::<serde_json::Value>(&bytes).is_ok()
}
