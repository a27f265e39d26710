mod memory_store;
mod redis_store;

pub use memory_store::MemoryCredentialStore;
pub use redis_store::RedisCredentialStore;

use crate::domain::CredentialStorePtr;
use std::sync::Arc;

/// Creates a process-local credential store.
///
/// Sessions vanish on restart; intended for development and tests.
pub fn create_memory_store() -> anyhow::Result<CredentialStorePtr> {
    Ok(Arc::new(MemoryCredentialStore::new()))
}

/// Creates a Redis-backed credential store, the production default.
///
/// The connection is not probed here; the first operation surfaces
/// connectivity problems.
pub fn create_redis_store(url: &str) -> anyhow::Result<CredentialStorePtr> {
    let client = redis::Client::open(url)?;
    Ok(Arc::new(RedisCredentialStore::new(client)))
}
