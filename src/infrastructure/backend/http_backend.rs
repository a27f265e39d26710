//! reqwest client for the external rental REST API.
//!
//! Every response is expected to carry the `{success, message?, data?}`
//! envelope. `success: false` becomes a business error with its message
//! intact; a transport-level 401 becomes [`BackendError::Unauthorized`]
//! whichever endpoint produced it; everything else network-shaped becomes
//! a transport error. No call is ever retried here.

use crate::config::BackendConfig;
use crate::domain::{
    BackendError, BackendResult, Brand, CarDetail, CarUpsert, Color, LoginData, RegisterRequest,
    Rental, RentalBackend, RentalIntent, Role, UserProfile,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Wire envelope shared by every backend endpoint.
///
/// `message` and `data` are plain `Option`s: a missing field deserializes
/// to `None` without a `default` attribute, which would otherwise force a
/// `Default` bound onto every payload type.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    // ---
    success: bool,
    message: Option<String>,
    data: Option<T>,
}

pub struct HttpRentalBackend {
    // ---
    client: reqwest::Client,
    base_url: String,
}

impl HttpRentalBackend {
    pub fn new(config: &BackendConfig) -> anyhow::Result<Self> {
        // ---
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        // ---
        format!("{}{path}", self.base_url)
    }

    fn bearer(
        request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        // ---
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and unwrap the envelope down to its payload.
    async fn exchange<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> BackendResult<T> {
        // ---
        let response = request
            .send()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(BackendError::Unauthorized);
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;

        if !envelope.success {
            return Err(BackendError::Business(
                envelope.message.unwrap_or_else(|| "request failed".to_string()),
            ));
        }
        envelope
            .data
            .ok_or_else(|| BackendError::Transport("envelope carried no data".to_string()))
    }

    /// Like [`Self::exchange`] but for endpoints whose payload is irrelevant.
    async fn exchange_unit(request: reqwest::RequestBuilder) -> BackendResult<()> {
        // ---
        let response = request
            .send()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(BackendError::Unauthorized);
        }

        let envelope: Envelope<serde_json::Value> = response
            .json()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;

        if !envelope.success {
            return Err(BackendError::Business(
                envelope.message.unwrap_or_else(|| "request failed".to_string()),
            ));
        }
        Ok(())
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
    ) -> BackendResult<T> {
        // ---
        Self::exchange(Self::bearer(self.client.get(self.url(path)), Some(token))).await
    }

    async fn post_unit<B: Serialize + ?Sized>(
        &self,
        token: &str,
        path: &str,
        body: &B,
    ) -> BackendResult<()> {
        // ---
        Self::exchange_unit(Self::bearer(self.client.post(self.url(path)), Some(token)).json(body))
            .await
    }
}

#[async_trait::async_trait]
impl RentalBackend for HttpRentalBackend {
    // ---
    async fn login(&self, email: &str, password: &str) -> BackendResult<LoginData> {
        // ---
        let body = serde_json::json!({ "email": email, "password": password });
        Self::exchange(self.client.post(self.url("/auth/login")).json(&body)).await
    }

    async fn register(&self, request: &RegisterRequest) -> BackendResult<()> {
        // ---
        Self::exchange_unit(self.client.post(self.url("/auth/register")).json(request)).await
    }

    async fn car_details(&self, token: &str) -> BackendResult<Vec<CarDetail>> {
        // ---
        self.get_data(token, "/cars/detail").await
    }

    async fn brands(&self, token: &str) -> BackendResult<Vec<Brand>> {
        // ---
        self.get_data(token, "/brands/getall").await
    }

    async fn colors(&self, token: &str) -> BackendResult<Vec<Color>> {
        // ---
        self.get_data(token, "/colors/getall").await
    }

    async fn findeks_score(&self, token: &str, user_id: i64) -> BackendResult<i32> {
        // ---
        self.get_data(token, &format!("/users/findeks-score?userId={user_id}"))
            .await
    }

    async fn rentals(&self, token: &str) -> BackendResult<Vec<Rental>> {
        // ---
        self.get_data(token, "/rentals/getall").await
    }

    async fn create_rental(&self, token: &str, intent: &RentalIntent) -> BackendResult<()> {
        // ---
        self.post_unit(token, "/rentals/add", intent).await
    }

    async fn add_car(&self, token: &str, car: &CarUpsert) -> BackendResult<()> {
        // ---
        self.post_unit(token, "/cars/add", car).await
    }

    async fn update_car(&self, token: &str, car: &CarUpsert) -> BackendResult<()> {
        // ---
        self.post_unit(token, "/cars/update", car).await
    }

    async fn delete_car(&self, token: &str, car_id: i64) -> BackendResult<()> {
        // ---
        self.post_unit(token, "/cars/delete", &serde_json::json!({ "carId": car_id }))
            .await
    }

    async fn add_brand(&self, token: &str, name: &str) -> BackendResult<()> {
        // ---
        self.post_unit(token, "/brands/add", &serde_json::json!({ "brandName": name }))
            .await
    }

    async fn update_brand(&self, token: &str, brand: &Brand) -> BackendResult<()> {
        // ---
        self.post_unit(token, "/brands/update", brand).await
    }

    async fn delete_brand(&self, token: &str, brand_id: i64) -> BackendResult<()> {
        // ---
        self.post_unit(token, "/brands/delete", &serde_json::json!({ "brandId": brand_id }))
            .await
    }

    async fn add_color(&self, token: &str, name: &str) -> BackendResult<()> {
        // ---
        self.post_unit(token, "/colors/add", &serde_json::json!({ "colorName": name }))
            .await
    }

    async fn update_color(&self, token: &str, color: &Color) -> BackendResult<()> {
        // ---
        self.post_unit(token, "/colors/update", color).await
    }

    async fn delete_color(&self, token: &str, color_id: i64) -> BackendResult<()> {
        // ---
        self.post_unit(token, "/colors/delete", &serde_json::json!({ "colorId": color_id }))
            .await
    }

    async fn roles(&self, token: &str) -> BackendResult<Vec<Role>> {
        // ---
        self.get_data(token, "/roles/getall").await
    }

    async fn add_role(&self, token: &str, name: &str) -> BackendResult<()> {
        // ---
        self.post_unit(token, "/roles/add", &serde_json::json!({ "name": name }))
            .await
    }

    async fn update_role(&self, token: &str, role: &Role) -> BackendResult<()> {
        // ---
        self.post_unit(token, "/roles/update", role).await
    }

    async fn delete_role(&self, token: &str, role_id: i64) -> BackendResult<()> {
        // ---
        self.post_unit(token, "/roles/delete", &serde_json::json!({ "id": role_id }))
            .await
    }

    async fn users(&self, token: &str) -> BackendResult<Vec<UserProfile>> {
        // ---
        self.get_data(token, "/users/getall").await
    }

    async fn update_user(&self, token: &str, user: &UserProfile) -> BackendResult<()> {
        // ---
        self.post_unit(token, "/users/update", user).await
    }

    async fn delete_user(&self, token: &str, user_id: i64) -> BackendResult<()> {
        // ---
        self.post_unit(token, "/users/delete", &serde_json::json!({ "id": user_id }))
            .await
    }
}
