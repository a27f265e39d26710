mod backend;
pub mod metrics;
mod storage;

// Re-export the factory functions for easy access
pub use backend::create_http_backend;
pub use metrics::{create_noop_metrics, create_prom_metrics};
pub use storage::{create_memory_store, create_redis_store};
