//! Shopping cart items.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{DocumentId, ModelError, strip_reserved};

/// A class placed in a student's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    /// Owner of the item.
    pub email: String,
    #[serde(default)]
    pub class_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Add-to-cart payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub email: String,
    pub class_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewCartItem {
    pub fn into_item(self) -> Result<CartItem, ModelError> {
        let email = self.email.trim().to_string();
        if email.is_empty() {
            return Err(ModelError::Validation("email is required".into()));
        }
        if self.class_id.trim().is_empty() {
            return Err(ModelError::Validation("classId is required".into()));
        }
        let mut extra = self.extra;
        strip_reserved(&mut extra, &["_id"]);
        Ok(CartItem {
            id: None,
            email,
            class_id: self.class_id,
            extra,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_item_keeps_descriptive_fields() {
        let new: NewCartItem = serde_json::from_value(json!({
            "email": "s@x.com",
            "classId": "c-1",
            "name": "Violin 101",
            "price": 25
        }))
        .unwrap();
        let item = new.into_item().unwrap();
        assert_eq!(item.email, "s@x.com");
        assert_eq!(item.extra.get("price"), Some(&json!(25)));
    }

    #[test]
    fn new_item_requires_owner_and_class() {
        let no_owner: NewCartItem =
            serde_json::from_value(json!({"email": "", "classId": "c-1"})).unwrap();
        assert!(no_owner.into_item().is_err());
        let no_class: NewCartItem =
            serde_json::from_value(json!({"email": "s@x.com", "classId": " "})).unwrap();
        assert!(no_class.into_item().is_err());
    }
}
