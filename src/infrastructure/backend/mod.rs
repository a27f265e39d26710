mod http_backend;

pub use http_backend::HttpRentalBackend;

use crate::config::BackendConfig;
use crate::domain::RentalBackendPtr;
use std::sync::Arc;

/// Creates the reqwest-based client for the external rental API.
pub fn create_http_backend(config: &BackendConfig) -> anyhow::Result<RentalBackendPtr> {
    Ok(Arc::new(HttpRentalBackend::new(config)?))
}
