use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cached profile snapshot of the authenticated user.
///
/// Owned by the session; the only authority on user data is the backend,
/// this copy exists so the gate can answer role checks without a round trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    // ---
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
    #[serde(default)]
    pub profile_image_path: Option<String>,
}

impl UserProfile {
    /// Display name used on invoices.
    pub fn full_name(&self) -> String {
        // ---
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Image path substituted when a listing carries no images of its own.
pub const PLACEHOLDER_IMAGE_PATH: &str = "/Uploads/Images/default.jpg";

/// Denormalized vehicle listing as served by the backend's detail endpoint.
///
/// Brand and color names arrive joined in, so the catalog filter matches on
/// names rather than raw ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarDetail {
    // ---
    pub car_id: i64,
    pub brand_id: i64,
    pub color_id: i64,
    pub brand_name: String,
    pub color_name: String,
    /// Four-digit model year, 1900 or later.
    pub model_year: i32,
    /// Positive daily rate in TL.
    pub daily_price: f64,
    pub description: String,
    /// Minimum findeks score required to rent this vehicle.
    #[serde(default = "default_min_findeks_score")]
    pub min_findeks_score: i32,
    /// Ordered image references; empty means the placeholder is shown.
    #[serde(default)]
    pub image_paths: Vec<String>,
}

fn default_min_findeks_score() -> i32 {
    500
}

impl CarDetail {
    /// Guarantee at least one image, substituting the placeholder, so
    /// every listing served to a client renders a cover.
    pub fn ensure_cover_image(&mut self) {
        // ---
        if self.image_paths.is_empty() {
            self.image_paths.push(PLACEHOLDER_IMAGE_PATH.to_string());
        }
    }
}

/// Vehicle payload for admin create/update calls (no joined names).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarUpsert {
    // ---
    #[serde(default)]
    pub car_id: i64,
    pub brand_id: i64,
    pub color_id: i64,
    pub model_year: i32,
    pub daily_price: f64,
    pub description: String,
    #[serde(default = "default_min_findeks_score")]
    pub min_findeks_score: i32,
}

impl CarUpsert {
    /// Field-level validation mirroring what the admin console enforces
    /// before a request ever leaves the gateway.
    pub fn validate(&self) -> Result<(), String> {
        // ---
        if self.brand_id <= 0 {
            return Err("a valid brand must be selected".into());
        }
        if self.color_id <= 0 {
            return Err("a valid color must be selected".into());
        }
        if self.model_year < 1900 {
            return Err("model year must be 1900 or later".into());
        }
        if self.daily_price <= 0.0 {
            return Err("daily price must be positive".into());
        }
        if self.description.trim().is_empty() {
            return Err("description must not be empty".into());
        }
        Ok(())
    }
}

/// `{id, name}` reference entity: vehicle brand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    // ---
    pub brand_id: i64,
    pub brand_name: String,
}

/// `{id, name}` reference entity: vehicle color.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    // ---
    pub color_id: i64,
    pub color_name: String,
}

/// `{id, name}` reference entity: authorization role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    // ---
    pub id: i64,
    pub name: String,
}

/// A completed rental as listed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    // ---
    pub id: i64,
    pub car_id: i64,
    pub customer_id: i64,
    pub rent_date: NaiveDate,
    /// Absent while the vehicle is still out.
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
}

/// Ephemeral record describing a proposed rental before payment confirms it.
///
/// Never persisted by the gateway; it either becomes a backend rental through
/// the payment workflow or is dropped. Dates are calendar dates on purpose:
/// duration math must not depend on time-of-day or timezone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RentalIntent {
    // ---
    pub car_id: i64,
    pub customer_id: i64,
    pub rent_date: NaiveDate,
    pub return_date: NaiveDate,
    pub total_price: f64,
}

/// Successful login payload from the backend auth endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    // ---
    pub token: String,
    pub user_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    #[serde(default)]
    pub profile_image_path: Option<String>,
    #[serde(default)]
    pub claims: Vec<String>,
}

impl LoginData {
    /// Profile snapshot stored alongside the token for the session's lifetime.
    pub fn to_profile(&self) -> UserProfile {
        // ---
        UserProfile {
            id: self.user_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            is_admin: self.is_admin,
            profile_image_path: self.profile_image_path.clone(),
        }
    }
}

/// Registration payload proxied to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    // ---
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}
