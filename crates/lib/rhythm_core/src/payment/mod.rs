//! Payment processor seam.
//!
//! The API only asks the processor for a payment intent and hands the
//! resulting client secret to the browser; confirmation happens client-side.

pub mod stripe;

use async_trait::async_trait;
use thiserror::Error;

pub use stripe::StripeProcessor;

/// Payment errors.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment processor not configured")]
    NotConfigured,

    #[error("Payment provider error: {0}")]
    Provider(String),
}

/// Request for a new payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRequest {
    /// Amount in the currency's minor unit (cents for USD).
    pub amount: i64,
    pub currency: String,
    pub description: Option<String>,
}

/// A created payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

/// External payment processor. Each call is attempted once.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn create_intent(&self, request: &IntentRequest) -> Result<PaymentIntent, PaymentError>;
}

/// Convert a major-unit price to minor units, truncating fractions of a cent.
///
/// The product is snapped to 1/1000 of a minor unit first so binary float
/// noise (`19.99 * 100 == 1998.9999…`) does not lose a cent. Returns `None`
/// for non-finite, non-positive or sub-cent prices.
pub fn to_minor_units(price: f64) -> Option<i64> {
    if !price.is_finite() || price <= 0.0 {
        return None;
    }
    let minor = ((price * 100.0 * 1000.0).round() / 1000.0).trunc();
    if minor < 1.0 || minor > i64::MAX as f64 {
        return None;
    }
    Some(minor as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_prices_scale_by_one_hundred() {
        assert_eq!(to_minor_units(50.0), Some(5000));
        assert_eq!(to_minor_units(1.0), Some(100));
    }

    #[test]
    fn fractions_of_a_cent_are_truncated() {
        assert_eq!(to_minor_units(19.99), Some(1999));
        assert_eq!(to_minor_units(10.005), Some(1000));
        assert_eq!(to_minor_units(0.019), Some(1));
    }

    #[test]
    fn unpayable_prices_are_rejected() {
        for price in [0.0, -5.0, 0.004, f64::NAN, f64::INFINITY] {
            assert_eq!(to_minor_units(price), None, "price {price}");
        }
    }
}
