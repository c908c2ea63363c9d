//! Payment request handlers.

use axum::Extension;
use axum::extract::State;

use rhythm_core::models::payment::{NewPayment, PaymentRecord};

use crate::AppState;
use crate::error::AppResult;
use crate::extract::Json;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CheckoutResponse, ClientSecretResponse, CreatePaymentIntentRequest};
use crate::services::payments;

/// `POST /create-payment-intent` - `{price, description}` → `{clientSecret}`.
pub async fn create_payment_intent_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<CreatePaymentIntentRequest>,
) -> AppResult<Json<ClientSecretResponse>> {
    Ok(Json(
        payments::create_intent(state.payments.as_ref(), &state.config.currency, &user, body)
            .await?,
    ))
}

/// `POST /payment` - record a completed payment and clear the paid cart items.
pub async fn record_payment_handler(
    State(state): State<AppState>,
    Json(body): Json<NewPayment>,
) -> AppResult<Json<CheckoutResponse>> {
    Ok(Json(payments::record_payment(&state.repo, body).await?))
}

/// `GET /payment` - payment history, newest first.
pub async fn list_payments_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PaymentRecord>>> {
    Ok(Json(payments::list_payments(&state.repo).await?))
}
