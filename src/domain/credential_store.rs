use super::models::UserProfile;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Raw credential pair as it sits in storage, keyed by session token.
///
/// Fields are individually optional on purpose: the storage medium holds the
/// token and the user snapshot as separate entries, and a crash between the
/// two writes (or manual tampering) can leave a partial pair behind. The
/// session layer treats any partial pair as no session at all and purges it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredCredentials {
    // ---
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub started_at: Option<DateTime<Utc>>,
    pub last_activity_at: Option<DateTime<Utc>>,
}

impl StoredCredentials {
    /// A freshly opened, complete pair.
    pub fn new(token: String, user: UserProfile, now: DateTime<Utc>) -> Self {
        // ---
        Self {
            token: Some(token),
            user: Some(user),
            started_at: Some(now),
            last_activity_at: Some(now),
        }
    }

    /// True only when both halves of the pair are present.
    pub fn is_complete(&self) -> bool {
        // ---
        self.token.is_some() && self.user.is_some()
    }
}

/// Abstraction over the persistent credential storage.
///
/// The rest of the core never touches the storage medium directly; swapping
/// Redis for the in-memory store (or anything else) is a construction-time
/// decision.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    // ---
    /// Load whatever is stored under `token`, partial pairs included.
    /// `None` means nothing is stored at all.
    async fn load(&self, token: &str) -> Result<Option<StoredCredentials>>;

    /// Store the full pair under `token`, overwriting any previous entry.
    async fn save(&self, token: &str, credentials: &StoredCredentials) -> Result<()>;

    /// Remove every entry stored under `token`. Must succeed on absent keys.
    async fn clear(&self, token: &str) -> Result<()>;
}

/// Type alias for any backend that implements CredentialStore.
pub type CredentialStorePtr = Arc<dyn CredentialStore>;
