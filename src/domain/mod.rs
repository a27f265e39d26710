mod backend;
mod catalog;
mod credential_store;
mod gate;
mod metrics;
mod models;
mod payment;
mod pricing;

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr};

// Storage and backend seams
pub use backend::{BackendError, BackendResult, RentalBackend, RentalBackendPtr};
pub use credential_store::{CredentialStore, CredentialStorePtr, StoredCredentials};

// Wire/domain models
pub use models::{
    Brand, CarDetail, CarUpsert, Color, LoginData, RegisterRequest, Rental, RentalIntent, Role,
    UserProfile, PLACEHOLDER_IMAGE_PATH,
};

// Pure core: gate, catalog filter, pricing, payment
pub use catalog::{apply_filter, CatalogFilter};
pub use gate::{decide, Capability, Decision};
pub use payment::{
    CardError, CardInfo, Invoice, PaymentState, PaymentWorkflow, SubmissionGuard,
    SubmissionLedger, WorkflowError,
};
pub use pricing::{build_intent, quote, rental_days, PricingError, RentalQuote};
