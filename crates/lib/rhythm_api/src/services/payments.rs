//! Payment initiation and payment history.

use chrono::Utc;
use tracing::{info, warn};

use rhythm_core::models::DocumentId;
use rhythm_core::models::payment::{NewPayment, PaymentRecord};
use rhythm_core::payment::{IntentRequest, PaymentProcessor, to_minor_units};
use rhythm_core::repository::Repository;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CheckoutResponse, ClientSecretResponse, CreatePaymentIntentRequest};

/// Ask the processor for a payment intent worth `price` and return its
/// client secret.
pub async fn create_intent(
    processor: &dyn PaymentProcessor,
    currency: &str,
    caller: &AuthenticatedUser,
    request: CreatePaymentIntentRequest,
) -> AppResult<ClientSecretResponse> {
    let amount = to_minor_units(request.price).ok_or_else(|| {
        AppError::Validation("price must be a positive amount of at least one cent".into())
    })?;
    let intent = processor
        .create_intent(&IntentRequest {
            amount,
            currency: currency.to_string(),
            description: request.description,
        })
        .await?;
    info!(email = caller.email(), amount, intent_id = %intent.id, "payment intent created");
    Ok(ClientSecretResponse {
        client_secret: intent.client_secret,
    })
}

/// Store the receipt, then clear the paid cart items. The two writes are
/// independent: if clearing fails the receipt stays.
pub async fn record_payment(repo: &Repository, payment: NewPayment) -> AppResult<CheckoutResponse> {
    let record = payment.into_record(Utc::now())?;
    let cart_ids = record
        .cart_item_ids
        .iter()
        .map(|id| id.parse::<DocumentId>())
        .collect::<Result<Vec<_>, _>>()?;

    let insert_result = repo.insert_payment(&record).await?;
    info!(
        id = %insert_result.inserted_id,
        email = %record.email,
        price = record.price,
        "payment recorded"
    );

    let delete_result = repo.delete_cart_items(&cart_ids).await.map_err(|e| {
        warn!(payment = %insert_result.inserted_id, "payment stored but cart not cleared: {e}");
        e
    })?;
    Ok(CheckoutResponse {
        insert_result,
        delete_result,
    })
}

pub async fn list_payments(repo: &Repository) -> AppResult<Vec<PaymentRecord>> {
    Ok(repo.list_payments().await?)
}
