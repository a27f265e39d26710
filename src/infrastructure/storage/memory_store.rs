use crate::domain::{CredentialStore, StoredCredentials};
use anyhow::Result;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process credential storage.
///
/// A plain map behind an async lock; good enough for tests and local
/// development, where losing every session on restart is a feature.
pub struct MemoryCredentialStore {
    // ---
    entries: RwLock<HashMap<String, StoredCredentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        // ---
        Self { entries: RwLock::new(HashMap::new()) }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        // ---
        Self::new()
    }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryCredentialStore {
    // ---
    async fn load(&self, token: &str) -> Result<Option<StoredCredentials>> {
        // ---
        Ok(self.entries.read().await.get(token).cloned())
    }

    async fn save(&self, token: &str, credentials: &StoredCredentials) -> Result<()> {
        // ---
        self.entries.write().await.insert(token.to_string(), credentials.clone());
        Ok(())
    }

    async fn clear(&self, token: &str) -> Result<()> {
        // ---
        self.entries.write().await.remove(token);
        Ok(())
    }
}
