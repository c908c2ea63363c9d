//! User accounts and roles.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::{DocumentId, ModelError, strip_reserved};

/// Permission tier attached to a user.
///
/// `Unassigned` is the state of a freshly registered account and is stored
/// as an absent `role` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Unassigned,
    Student,
    Instructor,
    Admin,
}

impl Role {
    /// Parse the target of a role-update request. Only `admin` and
    /// `instructor` can be granted.
    pub fn assignable(raw: &str) -> Result<Self, ModelError> {
        match raw {
            "admin" => Ok(Role::Admin),
            "instructor" => Ok(Role::Instructor),
            other => Err(ModelError::InvalidRole(other.to_string())),
        }
    }

    /// Wire form, `None` for `Unassigned`.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Role::Unassigned => None,
            Role::Student => Some("student"),
            Role::Instructor => Some("instructor"),
            Role::Admin => Some("admin"),
        }
    }

    pub fn is_unassigned(&self) -> bool {
        matches!(self, Role::Unassigned)
    }

    // Unknown stored values grant nothing.
    fn from_stored(raw: &str) -> Self {
        match raw {
            "student" => Role::Student,
            "instructor" => Role::Instructor,
            "admin" => Role::Admin,
            _ => Role::Unassigned,
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_str() {
            Some(role) => serializer.serialize_str(role),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Role::from_stored).unwrap_or_default())
    }
}

/// The three "is this user a ...?" questions clients ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleCheck {
    Admin,
    Instructor,
    Student,
}

impl RoleCheck {
    /// Response key, e.g. `{"admin": true}`.
    pub fn key(&self) -> &'static str {
        match self {
            RoleCheck::Admin => "admin",
            RoleCheck::Instructor => "instructor",
            RoleCheck::Student => "student",
        }
    }

    /// Users without a role count as students.
    pub fn matches(&self, role: Role) -> bool {
        match self {
            RoleCheck::Admin => role == Role::Admin,
            RoleCheck::Instructor => role == Role::Instructor,
            RoleCheck::Student => matches!(role, Role::Student | Role::Unassigned),
        }
    }
}

/// Registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Role::is_unassigned")]
    pub role: Role,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Registration payload. Any `role` or `_id` the client sends is dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewUser {
    pub fn into_user(self) -> Result<User, ModelError> {
        let email = self.email.trim().to_string();
        if email.is_empty() {
            return Err(ModelError::Validation("email is required".into()));
        }
        let mut extra = self.extra;
        strip_reserved(&mut extra, &["_id", "role"]);
        Ok(User {
            id: None,
            email,
            role: Role::Unassigned,
            extra,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_admin_and_instructor_are_assignable() {
        assert_eq!(Role::assignable("admin"), Ok(Role::Admin));
        assert_eq!(Role::assignable("instructor"), Ok(Role::Instructor));
        for raw in ["student", "superuser", "Admin", ""] {
            assert_eq!(
                Role::assignable(raw),
                Err(ModelError::InvalidRole(raw.to_string()))
            );
        }
    }

    #[test]
    fn unassigned_role_is_absent_on_the_wire() {
        let user = User {
            id: None,
            email: "a@x.com".into(),
            role: Role::Unassigned,
            extra: Map::new(),
        };
        assert_eq!(serde_json::to_value(&user).unwrap(), json!({"email": "a@x.com"}));

        let back: User = serde_json::from_value(json!({"email": "a@x.com", "role": null})).unwrap();
        assert_eq!(back.role, Role::Unassigned);
    }

    #[test]
    fn unknown_stored_role_grants_nothing() {
        let user: User =
            serde_json::from_value(json!({"email": "a@x.com", "role": "superuser"})).unwrap();
        assert_eq!(user.role, Role::Unassigned);
        assert!(!RoleCheck::Admin.matches(user.role));
    }

    #[test]
    fn student_check_covers_unassigned() {
        assert!(RoleCheck::Student.matches(Role::Student));
        assert!(RoleCheck::Student.matches(Role::Unassigned));
        assert!(!RoleCheck::Student.matches(Role::Admin));
        assert!(!RoleCheck::Instructor.matches(Role::Unassigned));
        assert!(RoleCheck::Instructor.matches(Role::Instructor));
    }

    #[test]
    fn registration_drops_client_role() {
        let new: NewUser = serde_json::from_value(json!({
            "email": "a@x.com",
            "name": "Ada",
            "role": "admin",
            "_id": "whatever"
        }))
        .unwrap();
        let user = new.into_user().unwrap();
        assert_eq!(user.role, Role::Unassigned);
        assert_eq!(user.id, None);
        assert_eq!(user.extra.get("name"), Some(&json!("Ada")));
        assert!(!user.extra.contains_key("role"));
    }

    #[test]
    fn registration_requires_email() {
        let new: NewUser = serde_json::from_value(json!({"email": "  "})).unwrap();
        assert!(matches!(new.into_user(), Err(ModelError::Validation(_))));
    }
}
