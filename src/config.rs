// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! This module defines all startup-time configuration for the gateway.
//! Configuration is validated eagerly and failures are treated as
//! deployment errors rather than recoverable runtime conditions.

use anyhow::Result;
use std::time::Duration;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads a required environment variable.
///
/// # Behavior
/// - Fails fast if the variable is missing
/// - Produces a clear, human-readable error message
/// - Intended for startup-time configuration validation
///
/// Missing configuration is treated as a deployment error,
/// not a recoverable runtime condition.
macro_rules! required_env {
    // ---
    ($key:literal) => {
        std::env::var($key)
            .map_err(|_| anyhow::anyhow!(concat!("Missing required configuration: ", $key)))?
    };
}

/// Reads an optional environment variable and attempts to parse it.
///
/// If the variable is missing or cannot be parsed, the provided
/// default value is used. This macro is appropriate for non-critical
/// tuning parameters where fallback behavior is acceptable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

#[cfg(test)]
/// Asserts that a configuration constructor fails due to a missing
/// required environment variable.
///
/// This macro is intended for config unit tests only and enforces
/// consistent error messages across failure cases.
macro_rules! assert_missing_config {
    // ---
    ($expr:expr, $key:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string()
                .contains(concat!("Missing required configuration: ", $key)),
            "unexpected error: {err}"
        );
    }};
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated application configuration.
///
/// This is the single source of truth for startup configuration.
/// All required configuration is validated eagerly during initialization.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: backend::BackendConfig,
    pub store: store::StoreConfig,
    pub session: session::SessionConfig,
}

impl AppConfig {
    /// Loads and validates all application configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if any required configuration is missing or invalid.
    /// This function is intended to be called exactly once at startup.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            backend: backend::BackendConfig::from_env()?,
            store: store::StoreConfig::from_env()?,
            session: session::SessionConfig::from_env()?,
        })
    }
}

// ============================================================
// Backend API configuration
// ============================================================

mod backend {
    // ---
    use super::*;

    /// Configuration for the external rental REST API this gateway consumes.
    ///
    /// The base URL is required: the gateway is useless without a backend
    /// to call, so startup fails fast rather than deferring the error to
    /// the first request.
    #[derive(Debug, Clone)]
    pub struct BackendConfig {
        /// Base URL of the rental API, e.g. `http://localhost:7108/api`.
        pub base_url: String,

        /// Per-request timeout for backend calls. Defaults to 30 seconds.
        pub request_timeout: Duration,
    }

    impl BackendConfig {
        /// Builds a [`BackendConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if required configuration is missing.
        pub fn from_env() -> Result<Self> {
            // ---
            let base_url = required_env!("RENTACAR_BACKEND_URL");
            let timeout_secs = optional_env_parse!("RENTACAR_BACKEND_TIMEOUT_SEC", u64, 30);

            Ok(Self {
                base_url,
                request_timeout: Duration::from_secs(timeout_secs),
            })
        }
    }
}
pub use backend::BackendConfig;

// ============================================================
// Credential store configuration
// ============================================================

mod store {
    // ---
    use super::*;

    /// Which credential-store implementation to construct.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum StoreKind {
        /// Redis-backed storage, the production default.
        Redis,
        /// Process-local storage for development and tests.
        Memory,
    }

    /// Configuration for session credential storage.
    #[derive(Debug, Clone)]
    pub struct StoreConfig {
        pub kind: StoreKind,

        /// Redis connection string; only consulted for the Redis kind.
        pub redis_url: Option<String>,
    }

    impl StoreConfig {
        /// Builds a [`StoreConfig`] from environment variables.
        ///
        /// `RENTACAR_STORE_TYPE` selects `redis` (default) or `memory`.
        /// The Redis URL is required only when Redis is selected.
        ///
        /// # Errors
        /// Returns an error if the Redis kind is selected without a URL,
        /// or the kind is unrecognized.
        pub fn from_env() -> Result<Self> {
            // ---
            let kind = std::env::var("RENTACAR_STORE_TYPE")
                .unwrap_or_else(|_| "redis".to_string());

            match kind.as_str() {
                "memory" => Ok(Self { kind: StoreKind::Memory, redis_url: None }),
                "redis" => {
                    let url = required_env!("RENTACAR_REDIS_URL");
                    Ok(Self { kind: StoreKind::Redis, redis_url: Some(url) })
                }
                other => anyhow::bail!("Unknown RENTACAR_STORE_TYPE: {other}"),
            }
        }
    }
}
pub use store::{StoreConfig, StoreKind};

// ============================================================
// Session and payment tuning
// ============================================================

mod session {
    // ---
    use super::*;

    /// Session expiry policies and payment settlement tuning.
    ///
    /// The contract defaults are 60 seconds of inactivity and a 3600
    /// second absolute ceiling; both are overridable for testing.
    #[derive(Debug, Clone)]
    pub struct SessionConfig {
        /// Session ends after this much time without a qualifying request.
        pub inactivity_timeout: Duration,

        /// Session ends this long after login regardless of activity.
        pub absolute_timeout: Duration,

        /// Artificial settlement delay standing in for a payment gateway.
        pub settle_delay: Duration,
    }

    impl SessionConfig {
        /// Builds a [`SessionConfig`] from environment variables.
        pub fn from_env() -> Result<Self> {
            // ---
            let inactivity_secs = optional_env_parse!("RENTACAR_INACTIVITY_TIMEOUT_SEC", u64, 60);
            let absolute_secs = optional_env_parse!("RENTACAR_SESSION_TIMEOUT_SEC", u64, 3600);
            let settle_ms = optional_env_parse!("RENTACAR_SETTLE_DELAY_MS", u64, 2000);

            Ok(Self {
                inactivity_timeout: Duration::from_secs(inactivity_secs),
                absolute_timeout: Duration::from_secs(absolute_secs),
                settle_delay: Duration::from_millis(settle_ms),
            })
        }
    }
}
pub use session::SessionConfig;

// ============================================================
// Tests
// ============================================================
