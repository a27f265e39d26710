// Test helpers are intentionally partially used
#![allow(dead_code)]

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use rentacar_gateway::create_router;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;

// ============================================================================
// Fixed identities the stub backend accepts
// ============================================================================

pub const MEMBER_EMAIL: &str = "kerem@example.com";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const PASSWORD: &str = "sifre123";

// Structurally valid JWT-shaped tokens: base64url payloads are
// {"sub":"42"} and {"sub":"1"} respectively.
pub const MEMBER_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiI0MiJ9.c2ln";
pub const ADMIN_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxIn0.c2ln";

// ============================================================================
// Stub rental backend
// ============================================================================

/// How the stub answers the findeks-score endpoint.
#[derive(Clone, Copy)]
pub enum FindeksMode {
    // ---
    Score(i32),
    /// Plain 500: the gateway must degrade the score to 0, not crash.
    Unavailable,
    /// Transport-level 401: the gateway must tear the session down.
    Unauthorized,
}

#[derive(Clone)]
struct StubState {
    // ---
    findeks: FindeksMode,
    rentals: Arc<Mutex<Vec<Value>>>,
}

/// In-process stand-in for the external rental API.
///
/// Serves the envelope-shaped endpoints the gateway consumes, plus enough
/// catalog fixtures to drive the pricing and payment flows.
pub struct StubBackend {
    // ---
    pub base_url: String,
    pub rentals: Arc<Mutex<Vec<Value>>>,
}

impl StubBackend {
    pub async fn spawn(findeks: FindeksMode) -> Self {
        // ---
        let rentals = Arc::new(Mutex::new(Vec::new()));
        let state = StubState { findeks, rentals: clone_rentals(&rentals) };

        let app = Router::new()
            .route("/auth/login", post(stub_login))
            .route("/auth/register", post(stub_ok))
            .route("/cars/detail", get(stub_cars))
            .route("/brands/getall", get(stub_brands))
            .route("/colors/getall", get(stub_colors))
            .route("/users/findeks-score", get(stub_findeks))
            .route("/rentals/getall", get(stub_rentals))
            .route("/rentals/add", post(stub_add_rental))
            .route("/brands/add", post(stub_ok))
            .route("/brands/update", post(stub_ok))
            .route("/brands/delete", post(stub_ok))
            .route("/colors/add", post(stub_ok))
            .route("/colors/update", post(stub_ok))
            .route("/colors/delete", post(stub_ok))
            .route("/cars/add", post(stub_ok))
            .route("/cars/update", post(stub_ok))
            .route("/cars/delete", post(stub_ok))
            .route("/roles/getall", get(stub_roles))
            .route("/roles/add", post(stub_ok))
            .route("/roles/update", post(stub_ok))
            .route("/roles/delete", post(stub_ok))
            .route("/users/getall", get(stub_users))
            .route("/users/update", post(stub_ok))
            .route("/users/delete", post(stub_ok))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url: format!("http://{addr}"), rentals }
    }

    /// Rentals the gateway persisted through the payment workflow.
    pub fn recorded_rentals(&self) -> Vec<Value> {
        // ---
        self.rentals.lock().unwrap().clone()
    }
}

fn clone_rentals(rentals: &Arc<Mutex<Vec<Value>>>) -> Arc<Mutex<Vec<Value>>> {
    // ---
    Arc::clone(rentals)
}

async fn stub_login(Json(body): Json<Value>) -> Json<Value> {
    // ---
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let (token, user_id, first_name, is_admin) = match email {
        MEMBER_EMAIL => (MEMBER_TOKEN, 42, "Kerem", false),
        ADMIN_EMAIL => (ADMIN_TOKEN, 1, "Aylin", true),
        _ => return Json(json!({ "success": false, "message": "invalid credentials" })),
    };
    if password != PASSWORD {
        return Json(json!({ "success": false, "message": "invalid credentials" }));
    }

    Json(json!({
        "success": true,
        "data": {
            "token": token,
            "userId": user_id,
            "email": email,
            "firstName": first_name,
            "lastName": "Test",
            "isAdmin": is_admin,
            "profileImagePath": null,
            "claims": []
        }
    }))
}

async fn stub_cars() -> Json<Value> {
    // ---
    Json(json!({
        "success": true,
        "data": [
            {
                "carId": 1,
                "brandId": 1,
                "colorId": 1,
                "brandName": "BMW",
                "colorName": "Black",
                "modelYear": 2021,
                "dailyPrice": 200.0,
                "description": "320i",
                "minFindeksScore": 500,
                "imagePaths": ["/Uploads/Images/bmw.jpg"]
            },
            {
                "carId": 2,
                "brandId": 2,
                "colorId": 3,
                "brandName": "Fiat",
                "colorName": "Red",
                "modelYear": 2019,
                "dailyPrice": 150.0,
                "description": "Egea",
                "minFindeksScore": 700,
                "imagePaths": []
            }
        ]
    }))
}

async fn stub_brands() -> Json<Value> {
    // ---
    Json(json!({
        "success": true,
        "data": [
            { "brandId": 1, "brandName": "BMW" },
            { "brandId": 2, "brandName": "Fiat" }
        ]
    }))
}

async fn stub_colors() -> Json<Value> {
    // ---
    Json(json!({
        "success": true,
        "data": [
            { "colorId": 1, "colorName": "Black" },
            { "colorId": 3, "colorName": "Red" }
        ]
    }))
}

async fn stub_findeks(State(state): State<StubState>) -> axum::response::Response {
    // ---
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    match state.findeks {
        FindeksMode::Score(score) => {
            Json(json!({ "success": true, "data": score })).into_response()
        }
        FindeksMode::Unavailable => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        FindeksMode::Unauthorized => (StatusCode::UNAUTHORIZED, "expired").into_response(),
    }
}

async fn stub_rentals() -> Json<Value> {
    // ---
    Json(json!({ "success": true, "data": [] }))
}

async fn stub_add_rental(State(state): State<StubState>, Json(body): Json<Value>) -> Json<Value> {
    // ---
    state.rentals.lock().unwrap().push(body);
    Json(json!({ "success": true, "message": "rental created" }))
}

async fn stub_roles() -> Json<Value> {
    // ---
    Json(json!({ "success": true, "data": [ { "id": 1, "name": "admin" } ] }))
}

async fn stub_users() -> Json<Value> {
    // ---
    Json(json!({ "success": true, "data": [] }))
}

async fn stub_ok() -> Json<Value> {
    // ---
    Json(json!({ "success": true }))
}

// ============================================================================
// Test Setup
// ============================================================================

pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub client: Client,
}

impl TestServer {
    // ---
    /// Spawn the gateway against `stub`, with in-memory credential storage
    /// and an instant settlement delay.
    pub async fn new(stub: &StubBackend) -> Self {
        // ---
        Self::spawn_with_env(stub, 60, 3600, 0).await
    }

    /// Like [`TestServer::new`] but with explicit session timeouts, for
    /// exercising expiry without waiting out the defaults.
    pub async fn with_timeouts(stub: &StubBackend, inactivity_sec: u64, absolute_sec: u64) -> Self {
        // ---
        Self::spawn_with_env(stub, inactivity_sec, absolute_sec, 0).await
    }

    /// Like [`TestServer::new`] but with a non-zero settlement delay, so
    /// two submissions can overlap in flight.
    pub async fn with_settle_delay(stub: &StubBackend, settle_ms: u64) -> Self {
        // ---
        Self::spawn_with_env(stub, 60, 3600, settle_ms).await
    }

    async fn spawn_with_env(
        stub: &StubBackend,
        inactivity_sec: u64,
        absolute_sec: u64,
        settle_ms: u64,
    ) -> Self {
        // ---
        std::env::set_var("RENTACAR_BACKEND_URL", &stub.base_url);
        std::env::set_var("RENTACAR_STORE_TYPE", "memory");
        std::env::set_var("RENTACAR_METRICS_TYPE", "noop");
        std::env::set_var("RENTACAR_SETTLE_DELAY_MS", settle_ms.to_string());
        std::env::set_var("RENTACAR_INACTIVITY_TIMEOUT_SEC", inactivity_sec.to_string());
        std::env::set_var("RENTACAR_SESSION_TIMEOUT_SEC", absolute_sec.to_string());

        let app = create_router().expect("Should be able to create router");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start
        sleep(Duration::from_millis(100)).await;

        let client = Client::new();

        Self { addr, client }
    }

    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }

    /// Log in through the gateway and return the bearer token.
    pub async fn login(&self, email: &str) -> String {
        // ---
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": PASSWORD }))
            .send()
            .await
            .expect("login request failed");
        assert!(response.status().is_success(), "login rejected");

        let body: Value = response.json().await.expect("login response not JSON");
        assert_eq!(body["success"], json!(true));
        body["data"]["token"].as_str().expect("no token in login response").to_string()
    }
}
