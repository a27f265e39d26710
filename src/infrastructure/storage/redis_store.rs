//! Redis-backed credential storage.
//!
//! The token and the user snapshot are stored as separate hash fields, the
//! same way the original client kept two separate keys in local storage.
//! That makes the partial-pair case (one field present without the other)
//! representable here exactly as the session layer expects to find it.

use crate::domain::{CredentialStore, StoredCredentials, UserProfile};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use redis::AsyncCommands;

pub struct RedisCredentialStore {
    // ---
    client: redis::Client,
}

impl RedisCredentialStore {
    pub fn new(client: redis::Client) -> Self {
        // ---
        Self { client }
    }

    async fn conn(&self) -> Result<redis::aio::MultiplexedConnection> {
        // ---
        self.client
            .get_multiplexed_async_connection()
            .await
            .context("failed to connect to Redis")
    }

    fn key(token: &str) -> String {
        // ---
        format!("session:{token}")
    }
}

fn parse_timestamp(raw: Option<&String>) -> Option<DateTime<Utc>> {
    // ---
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[async_trait::async_trait]
impl CredentialStore for RedisCredentialStore {
    // ---
    async fn load(&self, token: &str) -> Result<Option<StoredCredentials>> {
        // ---
        let mut conn = self.conn().await?;
        let fields: std::collections::HashMap<String, String> = conn
            .hgetall(Self::key(token))
            .await
            .context("failed to load credentials from Redis")?;

        if fields.is_empty() {
            return Ok(None);
        }

        // Unparseable fields degrade to absent ones; the session layer
        // already treats a partial pair as no session and purges it.
        let user: Option<UserProfile> = fields
            .get("user")
            .and_then(|raw| serde_json::from_str(raw).ok());

        Ok(Some(StoredCredentials {
            token: fields.get("token").cloned(),
            user,
            started_at: parse_timestamp(fields.get("started_at")),
            last_activity_at: parse_timestamp(fields.get("last_activity_at")),
        }))
    }

    async fn save(&self, token: &str, credentials: &StoredCredentials) -> Result<()> {
        // ---
        let mut conn = self.conn().await?;
        let key = Self::key(token);

        let mut fields: Vec<(&str, String)> = Vec::with_capacity(4);
        if let Some(stored_token) = &credentials.token {
            fields.push(("token", stored_token.clone()));
        }
        if let Some(user) = &credentials.user {
            fields.push(("user", serde_json::to_string(user)?));
        }
        if let Some(started_at) = credentials.started_at {
            fields.push(("started_at", started_at.to_rfc3339()));
        }
        if let Some(last_activity_at) = credentials.last_activity_at {
            fields.push(("last_activity_at", last_activity_at.to_rfc3339()));
        }

        conn.hset_multiple::<_, _, _, ()>(&key, &fields)
            .await
            .context("failed to store credentials in Redis")?;
        Ok(())
    }

    async fn clear(&self, token: &str) -> Result<()> {
        // ---
        let mut conn = self.conn().await?;
        let _: u64 = conn
            .del(Self::key(token))
            .await
            .context("failed to clear credentials from Redis")?;
        Ok(())
    }
}
