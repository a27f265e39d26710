// src/lib.rs
use anyhow::Result;
use app_state::AppState;
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Router,
};
use std::env;
use std::sync::Arc;
use std::time::Instant;

use handlers::health_check;
use handlers::metrics_handler;
use handlers::root_handler;
use session::SessionManager;

// Public exports (visible outside this module)
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod guard;
mod handlers;
mod infrastructure;
mod session;

pub use config::*;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    create_http_backend, // ---
    create_memory_store,
    create_noop_metrics,
    create_prom_metrics,
    create_redis_store,
};

/// Build the HTTP router with storage and metrics implementations
/// determined by environment variables.
pub fn create_router() -> Result<Router> {
    // ---
    // Load all configuration from environment
    let config = AppConfig::from_env()?;

    // Determine metrics implementation from environment
    let metrics_type = env::var("RENTACAR_METRICS_TYPE").unwrap_or_else(|_| "noop".to_string());
    let metrics = if metrics_type == "prom" {
        create_prom_metrics()?
    } else {
        create_noop_metrics()?
    };

    tracing_subscriber::fmt::try_init().ok(); // Ignores if already initialized

    // Create infrastructure dependencies
    let credential_store = match &config.store.kind {
        StoreKind::Memory => create_memory_store()?,
        StoreKind::Redis => {
            let url = config
                .store
                .redis_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("Redis store selected without a URL"))?;
            create_redis_store(url)?
        }
    };
    let backend = create_http_backend(&config.backend)?;

    let sessions = Arc::new(SessionManager::new(
        credential_store.clone(),
        metrics.clone(),
        config.session.inactivity_timeout,
        config.session.absolute_timeout,
    ));

    // Build application state with all dependencies
    let app_state = AppState::new(
        credential_store,
        sessions,
        backend,
        metrics,
        config.session.settle_delay,
    );

    // Routes behind any valid session
    let protected = Router::new()
        .route("/auth/logout", post(handlers::logout))
        .route("/cars", get(handlers::list_cars))
        .route("/brands", get(handlers::list_brands))
        .route("/colors", get(handlers::list_colors))
        .route("/rentals", get(handlers::list_rentals))
        .route("/rentals/quote", post(handlers::quote_rental))
        .route("/payment", post(handlers::submit_payment))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            guard::require_authenticated,
        ));

    // Admin console, gated on the admin capability
    let admin = Router::new()
        .route("/cars", post(handlers::add_car).put(handlers::update_car))
        .route("/cars/{id}", delete(handlers::delete_car))
        .route("/brands", post(handlers::add_brand).put(handlers::update_brand))
        .route("/brands/{id}", delete(handlers::delete_brand))
        .route("/colors", post(handlers::add_color).put(handlers::update_color))
        .route("/colors/{id}", delete(handlers::delete_color))
        .route(
            "/roles",
            get(handlers::list_roles)
                .post(handlers::add_role)
                .put(handlers::update_role),
        )
        .route("/roles/{id}", delete(handlers::delete_role))
        .route("/users", get(handlers::list_users).put(handlers::update_user))
        .route("/users/{id}", delete(handlers::delete_user))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            guard::require_admin,
        ));

    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/auth/login", post(handlers::login))
        .route("/auth/register", post(handlers::register))
        .merge(protected)
        .nest("/admin", admin)
        .layer(middleware::from_fn_with_state(app_state.clone(), track_http))
        .with_state(app_state);

    Ok(router)
}

/// Record duration and labels for every request that reaches the router.
async fn track_http(State(state): State<AppState>, req: Request, next: Next) -> Response {
    // ---
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    state
        .metrics()
        .record_http_request(start, &path, method.as_str(), response.status().as_u16());
    response
}
