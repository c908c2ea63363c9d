//! Stripe payment intents over the REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{IntentRequest, PaymentError, PaymentIntent, PaymentProcessor};

pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

#[derive(Deserialize)]
struct StripeIntent {
    id: String,
    client_secret: Option<String>,
}

/// Stripe client. Without a secret key every call fails with
/// [`PaymentError::NotConfigured`].
#[derive(Clone)]
pub struct StripeProcessor {
    client: Client,
    api_base: String,
    secret_key: Option<String>,
}

impl std::fmt::Debug for StripeProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeProcessor")
            .field("api_base", &self.api_base)
            .field("configured", &self.secret_key.is_some())
            .finish()
    }
}

impl StripeProcessor {
    pub fn new(secret_key: Option<String>, api_base: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.unwrap_or_else(|| STRIPE_API_BASE.to_string()),
            secret_key: secret_key.filter(|k| !k.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }
}

#[async_trait]
impl PaymentProcessor for StripeProcessor {
    async fn create_intent(&self, request: &IntentRequest) -> Result<PaymentIntent, PaymentError> {
        let secret_key = self
            .secret_key
            .as_deref()
            .ok_or(PaymentError::NotConfigured)?;

        let mut form = vec![
            ("amount", request.amount.to_string()),
            ("currency", request.currency.clone()),
            ("payment_method_types[]", "card".to_string()),
        ];
        if let Some(description) = &request.description {
            form.push(("description", description.clone()));
        }

        let url = format!("{}/v1/payment_intents", self.api_base.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .bearer_auth(secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| PaymentError::Provider(format!("Stripe request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(PaymentError::Provider(format!(
                "Stripe payment intent failed: {status} {body}"
            )));
        }

        let intent: StripeIntent = resp
            .json()
            .await
            .map_err(|e| PaymentError::Provider(format!("Stripe response parse error: {e}")))?;
        debug!(intent_id = %intent.id, amount = request.amount, "payment intent created");

        let client_secret = intent.client_secret.ok_or_else(|| {
            PaymentError::Provider("Stripe returned no client secret".to_string())
        })?;
        Ok(PaymentIntent {
            id: intent.id,
            client_secret,
        })
    }
}
