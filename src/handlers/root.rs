use axum::response::IntoResponse;

pub async fn root_handler() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"Welcome to the RentACar Gateway 🚗
Version: {version}

Available endpoints:
  - POST   /auth/login          - Exchange credentials for a session
  - POST   /auth/register       - Create a customer account
  - POST   /auth/logout         - End the current session
  - GET    /cars                - Browse the catalog (filterable)
  - GET    /brands, /colors     - Reference lists for the filters
  - GET    /rentals             - List rentals
  - POST   /rentals/quote       - Price a date range and check eligibility
  - POST   /payment             - Pay and download the invoice
  - /admin/...                  - Cars/brands/colors/roles/users CRUD (admin)
  - GET    /health              - Light health check
  - GET    /health?mode=full    - Full health check (includes the store)
  - GET    /metrics             - Prometheus metrics

Authenticated endpoints expect an Authorization: Bearer <token> header.
"#
    )
}
