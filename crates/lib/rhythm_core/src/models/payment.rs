//! Payment records. Append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{DocumentId, ModelError, strip_reserved};

/// Receipt of a completed payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub email: String,
    pub price: f64,
    #[serde(default)]
    pub transaction_id: String,
    pub date: DateTime<Utc>,
    /// Cart items paid for; removed from the cart after the record is stored.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cart_item_ids: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payment payload posted by the client after the processor confirmed it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub email: String,
    pub price: f64,
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cart_item_ids: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewPayment {
    /// Shape check only; `now` stamps records that arrive without a date.
    pub fn into_record(self, now: DateTime<Utc>) -> Result<PaymentRecord, ModelError> {
        if self.email.trim().is_empty() {
            return Err(ModelError::Validation("email is required".into()));
        }
        if !self.price.is_finite() {
            return Err(ModelError::Validation("price must be a number".into()));
        }
        let mut extra = self.extra;
        strip_reserved(&mut extra, &["_id"]);
        Ok(PaymentRecord {
            id: None,
            email: self.email,
            price: self.price,
            transaction_id: self.transaction_id,
            date: self.date.unwrap_or(now),
            cart_item_ids: self.cart_item_ids,
            extra,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn missing_date_is_stamped() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let new: NewPayment = serde_json::from_value(json!({
            "email": "s@x.com",
            "price": 50,
            "transactionId": "pi_123"
        }))
        .unwrap();
        let record = new.into_record(now).unwrap();
        assert_eq!(record.date, now);
        assert_eq!(record.price, 50.0);
    }

    #[test]
    fn client_date_is_kept() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let new: NewPayment = serde_json::from_value(json!({
            "email": "s@x.com",
            "price": 20.5,
            "date": "2026-02-28T09:30:00Z",
            "cartItemIds": ["a", "b"]
        }))
        .unwrap();
        let record = new.into_record(now).unwrap();
        assert_eq!(record.date, Utc.with_ymd_and_hms(2026, 2, 28, 9, 30, 0).unwrap());
        assert_eq!(record.cart_item_ids, vec!["a", "b"]);
    }
}
