// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public

mod admin;
mod auth;
mod cars;
mod health;
mod metrics;
mod payment;
mod rentals;
mod root;
mod shared_types;

// Core handlers
pub use health::health_check;
pub use metrics::metrics_handler;
pub use root::root_handler;

// Shared response envelope (used by the guard layer too)
pub(crate) use shared_types::ApiEnvelope;

// Auth handlers
pub use auth::{login, logout, register};

// Catalog handlers
pub use cars::{list_brands, list_cars, list_colors};

// Rental and payment handlers
pub use payment::submit_payment;
pub use rentals::{list_rentals, quote_rental};

// Admin console CRUD handlers
pub use admin::{
    add_brand, add_car, add_color, add_role, delete_brand, delete_car, delete_color, delete_role,
    delete_user, list_roles, list_users, update_brand, update_car, update_color, update_role,
    update_user,
};
