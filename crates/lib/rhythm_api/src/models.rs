//! API request and response bodies.

use serde::{Deserialize, Serialize};

use rhythm_core::store::{DeleteResult, InsertOneResult};

/// Error body returned with every non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// `POST /jwt` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `POST /users` response: either the insert result or a notice that the
/// email is already registered.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RegisterResponse {
    Existing { message: String },
    Created(InsertOneResult),
}

impl RegisterResponse {
    pub fn existing() -> Self {
        RegisterResponse::Existing {
            message: "user already exists".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Optional `?email=` query used by owner-scoped listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

impl EmailQuery {
    /// The requested email, treating an empty value as absent.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}

/// `POST /create-payment-intent` body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentIntentRequest {
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSecretResponse {
    pub client_secret: String,
}

/// `POST /payment` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub insert_result: InsertOneResult,
    pub delete_result: DeleteResult,
}

/// `GET /health` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub version: String,
    pub store: String,
    pub store_connected: bool,
}
