use super::models::{
    Brand, CarDetail, CarUpsert, Color, LoginData, RegisterRequest, Rental, RentalIntent, Role,
    UserProfile,
};
use std::sync::Arc;

/// Failure modes of the external rental API, split the way handlers need
/// to react to them.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Transport-level 401: the bearer token is no longer accepted.
    /// Always triggers session teardown at the caller, whichever endpoint
    /// produced it.
    #[error("backend rejected authentication")]
    Unauthorized,

    /// `success: false` envelope: a recoverable business error whose
    /// message is surfaced to the user verbatim.
    #[error("{0}")]
    Business(String),

    /// Network or protocol failure. At-most-once semantics: never retried.
    #[error("rental service is unreachable: {0}")]
    Transport(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Abstraction over the external rental REST API.
///
/// Every call attaches the caller's bearer token where one exists; the
/// gateway consumes these endpoints, it does not define them.
#[async_trait::async_trait]
pub trait RentalBackend: Send + Sync {
    // ---
    // --- auth ---

    /// Exchange credentials for a token plus profile snapshot.
    async fn login(&self, email: &str, password: &str) -> BackendResult<LoginData>;

    /// Create a new customer account.
    async fn register(&self, request: &RegisterRequest) -> BackendResult<()>;

    // --- catalog ---

    /// Vehicle listings with brand/color names and image paths joined in.
    async fn car_details(&self, token: &str) -> BackendResult<Vec<CarDetail>>;

    async fn brands(&self, token: &str) -> BackendResult<Vec<Brand>>;

    async fn colors(&self, token: &str) -> BackendResult<Vec<Color>>;

    // --- rentals ---

    /// Current findeks score for a user. Callers degrade a failure here to
    /// score 0 so eligibility fails closed.
    async fn findeks_score(&self, token: &str, user_id: i64) -> BackendResult<i32>;

    async fn rentals(&self, token: &str) -> BackendResult<Vec<Rental>>;

    /// Persist a confirmed, paid rental intent.
    async fn create_rental(&self, token: &str, intent: &RentalIntent) -> BackendResult<()>;

    // --- admin console CRUD ---

    async fn add_car(&self, token: &str, car: &CarUpsert) -> BackendResult<()>;
    async fn update_car(&self, token: &str, car: &CarUpsert) -> BackendResult<()>;
    async fn delete_car(&self, token: &str, car_id: i64) -> BackendResult<()>;

    async fn add_brand(&self, token: &str, name: &str) -> BackendResult<()>;
    async fn update_brand(&self, token: &str, brand: &Brand) -> BackendResult<()>;
    async fn delete_brand(&self, token: &str, brand_id: i64) -> BackendResult<()>;

    async fn add_color(&self, token: &str, name: &str) -> BackendResult<()>;
    async fn update_color(&self, token: &str, color: &Color) -> BackendResult<()>;
    async fn delete_color(&self, token: &str, color_id: i64) -> BackendResult<()>;

    async fn roles(&self, token: &str) -> BackendResult<Vec<Role>>;
    async fn add_role(&self, token: &str, name: &str) -> BackendResult<()>;
    async fn update_role(&self, token: &str, role: &Role) -> BackendResult<()>;
    async fn delete_role(&self, token: &str, role_id: i64) -> BackendResult<()>;

    async fn users(&self, token: &str) -> BackendResult<Vec<UserProfile>>;
    async fn update_user(&self, token: &str, user: &UserProfile) -> BackendResult<()>;
    async fn delete_user(&self, token: &str, user_id: i64) -> BackendResult<()>;
}

/// Type alias for any client that implements RentalBackend.
pub type RentalBackendPtr = Arc<dyn RentalBackend>;
