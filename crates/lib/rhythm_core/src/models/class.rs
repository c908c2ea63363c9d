//! Class listings and their moderation state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{DocumentId, ModelError, strip_reserved};

/// Moderation state of a class. New classes start out `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassStatus {
    #[default]
    Pending,
    Approved,
    Denied,
}

impl ClassStatus {
    /// Parse the target of a moderation request; `pending` is not a valid target.
    pub fn moderated(raw: &str) -> Result<Self, ModelError> {
        match raw {
            "approved" => Ok(ClassStatus::Approved),
            "denied" => Ok(ClassStatus::Denied),
            other => Err(ModelError::InvalidStatus(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassStatus::Pending => "pending",
            ClassStatus::Approved => "approved",
            ClassStatus::Denied => "denied",
        }
    }
}

/// A bookable class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(default)]
    pub instructor_email: String,
    #[serde(default)]
    pub status: ClassStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default)]
    pub available_seats: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Authoring payload for a new class.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClass {
    pub instructor_email: String,
    #[serde(default)]
    pub available_seats: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewClass {
    /// Build the stored class. Status and feedback are moderation output and
    /// cannot be authored.
    pub fn into_class(self) -> Result<Class, ModelError> {
        let instructor_email = self.instructor_email.trim().to_string();
        if instructor_email.is_empty() {
            return Err(ModelError::Validation("instructorEmail is required".into()));
        }
        let mut extra = self.extra;
        strip_reserved(&mut extra, &["_id", "status", "feedback"]);
        Ok(Class {
            id: None,
            instructor_email,
            status: ClassStatus::Pending,
            feedback: None,
            available_seats: self.available_seats,
            extra,
        })
    }
}

/// Moderation request body.
#[derive(Debug, Clone, Deserialize)]
pub struct Moderation {
    pub status: String,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Seat adjustment request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatUpdate {
    pub available_seats: u32,
}

/// Check a generic field patch. It may touch any descriptive field but not
/// the identifier or the moderation status.
pub fn validate_patch(patch: &Map<String, Value>) -> Result<(), ModelError> {
    if patch.is_empty() {
        return Err(ModelError::Validation("patch body is empty".into()));
    }
    if patch.contains_key("_id") {
        return Err(ModelError::Validation("_id cannot be changed".into()));
    }
    if let Some(status) = patch.get("status") {
        return Err(ModelError::InvalidStatus(format!(
            "status {status} can only be set through moderation"
        )));
    }
    if let Some(seats) = patch.get("availableSeats")
        && seats.as_u64().is_none_or(|n| n > u64::from(u32::MAX))
    {
        return Err(ModelError::Validation(
            "availableSeats must be a non-negative integer".into(),
        ));
    }
    if let Some(email) = patch.get("instructorEmail")
        && email.as_str().is_none_or(|e| e.trim().is_empty())
    {
        return Err(ModelError::Validation(
            "instructorEmail must be a non-empty string".into(),
        ));
    }
    // Every stored class must still decode once the patch is merged in.
    let mut merged = Map::new();
    merged.insert("instructorEmail".into(), Value::String("patch@check".into()));
    merged.extend(patch.iter().map(|(k, v)| (k.clone(), v.clone())));
    serde_json::from_value::<Class>(Value::Object(merged))
        .map_err(|e| ModelError::Validation(format!("invalid class patch: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn moderation_accepts_only_terminal_states() {
        assert_eq!(ClassStatus::moderated("approved"), Ok(ClassStatus::Approved));
        assert_eq!(ClassStatus::moderated("denied"), Ok(ClassStatus::Denied));
        for raw in ["pending", "APPROVED", "closed", ""] {
            assert_eq!(
                ClassStatus::moderated(raw),
                Err(ModelError::InvalidStatus(raw.to_string()))
            );
        }
    }

    #[test]
    fn new_class_is_pending_whatever_the_client_says() {
        let new: NewClass = serde_json::from_value(json!({
            "instructorEmail": "t@x.com",
            "availableSeats": 12,
            "name": "Jazz Piano",
            "status": "approved",
            "feedback": "great"
        }))
        .unwrap();
        let class = new.into_class().unwrap();
        assert_eq!(class.status, ClassStatus::Pending);
        assert_eq!(class.feedback, None);
        assert_eq!(class.available_seats, 12);
        assert_eq!(class.extra.get("name"), Some(&json!("Jazz Piano")));
        assert!(!class.extra.contains_key("status"));
    }

    #[test]
    fn stored_class_round_trips_extra_fields() {
        let raw = json!({
            "_id": DocumentId::new().to_string(),
            "instructorEmail": "t@x.com",
            "status": "denied",
            "feedback": "Please add a syllabus",
            "availableSeats": 3,
            "price": 40.5
        });
        let class: Class = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(class.status, ClassStatus::Denied);
        assert_eq!(serde_json::to_value(&class).unwrap(), raw);
    }

    #[test]
    fn patch_cannot_touch_status_or_id() {
        let status = json!({"status": "approved"});
        assert!(matches!(
            validate_patch(status.as_object().unwrap()),
            Err(ModelError::InvalidStatus(_))
        ));
        let id = json!({"_id": "x"});
        assert!(matches!(
            validate_patch(id.as_object().unwrap()),
            Err(ModelError::Validation(_))
        ));
        let seats = json!({"availableSeats": -1});
        assert!(validate_patch(seats.as_object().unwrap()).is_err());
        let ok = json!({"name": "Renamed", "availableSeats": 4});
        assert_eq!(validate_patch(ok.as_object().unwrap()), Ok(()));
    }

    #[test]
    fn patch_must_keep_typed_fields_decodable() {
        for bad in [
            json!({"instructorEmail": null}),
            json!({"instructorEmail": ""}),
            json!({"instructorEmail": 42}),
            json!({"feedback": 7}),
            json!({"feedback": ["a"]}),
        ] {
            assert!(
                matches!(
                    validate_patch(bad.as_object().unwrap()),
                    Err(ModelError::Validation(_))
                ),
                "{bad} should be rejected"
            );
        }
        let ok = json!({"instructorEmail": "t2@x.com", "feedback": null, "price": "free"});
        assert_eq!(validate_patch(ok.as_object().unwrap()), Ok(()));
    }
}
