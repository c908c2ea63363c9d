//! Repository facade: typed access to every collection over one shared
//! [`DocumentStore`].

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::models::DocumentId;
use crate::models::cart::CartItem;
use crate::models::class::{Class, ClassStatus};
use crate::models::instructor::Instructor;
use crate::models::payment::PaymentRecord;
use crate::models::user::{Role, User};
use crate::store::{
    Collection, DeleteResult, Document, DocumentStore, Filter, InsertOneResult, StoreError,
    UpdateResult,
};

/// Cheap to clone; all clones share the same store handle.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("backend", &self.store.backend())
            .finish()
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(doc) => Ok(doc),
        other => Err(StoreError::Serialization(serde::ser::Error::custom(format!(
            "expected a JSON object, got {other}"
        )))),
    }
}

fn decode<T: DeserializeOwned>(doc: Document) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

fn decode_all<T: DeserializeOwned>(docs: Vec<Document>) -> Result<Vec<T>, StoreError> {
    docs.into_iter().map(decode).collect()
}

fn set(field: &str, value: impl Into<Value>) -> Document {
    let mut doc = Document::new();
    doc.insert(field.to_string(), value.into());
    doc
}

impl Repository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        decode_all(self.store.find(Collection::Users, &Filter::all()).await?)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.store
            .find_one(Collection::Users, &Filter::eq("email", email))
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn insert_user(&self, user: &User) -> Result<InsertOneResult, StoreError> {
        self.store.insert_one(Collection::Users, encode(user)?).await
    }

    pub async fn set_user_role(
        &self,
        id: &DocumentId,
        role: Role,
    ) -> Result<UpdateResult, StoreError> {
        debug!(%id, role = ?role, "updating user role");
        self.store
            .update_one(Collection::Users, &Filter::by_id(id), set("role", encode_role(role)))
            .await
    }

    pub async fn delete_user(&self, id: &DocumentId) -> Result<DeleteResult, StoreError> {
        self.store
            .delete_one(Collection::Users, &Filter::by_id(id))
            .await
    }

    // -----------------------------------------------------------------------
    // Classes
    // -----------------------------------------------------------------------

    pub async fn list_classes(&self) -> Result<Vec<Class>, StoreError> {
        decode_all(self.store.find(Collection::Classes, &Filter::all()).await?)
    }

    pub async fn list_classes_by_instructor(&self, email: &str) -> Result<Vec<Class>, StoreError> {
        decode_all(
            self.store
                .find(Collection::Classes, &Filter::eq("instructorEmail", email))
                .await?,
        )
    }

    pub async fn get_class(&self, id: &DocumentId) -> Result<Option<Class>, StoreError> {
        self.store
            .find_one(Collection::Classes, &Filter::by_id(id))
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn insert_class(&self, class: &Class) -> Result<InsertOneResult, StoreError> {
        self.store
            .insert_one(Collection::Classes, encode(class)?)
            .await
    }

    /// Generic field patch. Callers validate the patch first.
    pub async fn patch_class(
        &self,
        id: &DocumentId,
        patch: Document,
    ) -> Result<UpdateResult, StoreError> {
        self.store
            .update_one(Collection::Classes, &Filter::by_id(id), patch)
            .await
    }

    pub async fn moderate_class(
        &self,
        id: &DocumentId,
        status: ClassStatus,
        feedback: Option<String>,
    ) -> Result<UpdateResult, StoreError> {
        let mut patch = set("status", status.as_str());
        if let Some(feedback) = feedback {
            patch.insert("feedback".into(), Value::String(feedback));
        }
        self.store
            .update_one(Collection::Classes, &Filter::by_id(id), patch)
            .await
    }

    pub async fn set_available_seats(
        &self,
        id: &DocumentId,
        seats: u32,
    ) -> Result<UpdateResult, StoreError> {
        self.store
            .update_one(
                Collection::Classes,
                &Filter::by_id(id),
                set("availableSeats", seats),
            )
            .await
    }

    pub async fn delete_class(&self, id: &DocumentId) -> Result<DeleteResult, StoreError> {
        self.store
            .delete_one(Collection::Classes, &Filter::by_id(id))
            .await
    }

    // -----------------------------------------------------------------------
    // Instructors
    // -----------------------------------------------------------------------

    pub async fn list_instructors(&self) -> Result<Vec<Instructor>, StoreError> {
        decode_all(
            self.store
                .find(Collection::Instructors, &Filter::all())
                .await?,
        )
    }

    // -----------------------------------------------------------------------
    // Carts
    // -----------------------------------------------------------------------

    pub async fn list_cart_items(&self, email: &str) -> Result<Vec<CartItem>, StoreError> {
        decode_all(
            self.store
                .find(Collection::Carts, &Filter::eq("email", email))
                .await?,
        )
    }

    pub async fn insert_cart_item(&self, item: &CartItem) -> Result<InsertOneResult, StoreError> {
        self.store.insert_one(Collection::Carts, encode(item)?).await
    }

    pub async fn delete_cart_item(&self, id: &DocumentId) -> Result<DeleteResult, StoreError> {
        self.store
            .delete_one(Collection::Carts, &Filter::by_id(id))
            .await
    }

    /// Delete several cart items one by one. Not atomic: a failure leaves
    /// the earlier deletions in place.
    pub async fn delete_cart_items(&self, ids: &[DocumentId]) -> Result<DeleteResult, StoreError> {
        let mut deleted = 0;
        for id in ids {
            deleted += self.delete_cart_item(id).await?.deleted_count;
        }
        Ok(DeleteResult::new(deleted))
    }

    // -----------------------------------------------------------------------
    // Payments
    // -----------------------------------------------------------------------

    pub async fn insert_payment(
        &self,
        record: &PaymentRecord,
    ) -> Result<InsertOneResult, StoreError> {
        self.store
            .insert_one(Collection::Payments, encode(record)?)
            .await
    }

    /// Payment history, newest first.
    pub async fn list_payments(&self) -> Result<Vec<PaymentRecord>, StoreError> {
        let mut records: Vec<PaymentRecord> =
            decode_all(self.store.find(Collection::Payments, &Filter::all()).await?)?;
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }
}

fn encode_role(role: Role) -> Value {
    role.as_str().map_or(Value::Null, |r| Value::String(r.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::class::NewClass;
    use crate::models::user::NewUser;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn repo() -> Repository {
        Repository::new(Arc::new(MemoryStore::new()))
    }

    fn user(email: &str) -> User {
        serde_json::from_value::<NewUser>(json!({"email": email}))
            .unwrap()
            .into_user()
            .unwrap()
    }

    #[tokio::test]
    async fn role_update_is_visible_on_next_read() {
        let repo = repo();
        let id = repo.insert_user(&user("a@x.com")).await.unwrap().inserted_id;

        let before = repo.find_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(before.role, Role::Unassigned);
        assert_eq!(before.id, Some(id));

        let result = repo.set_user_role(&id, Role::Admin).await.unwrap();
        assert_eq!(result.matched_count, 1);
        let after = repo.find_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(after.role, Role::Admin);
    }

    #[tokio::test]
    async fn classes_filter_by_instructor() {
        let repo = repo();
        for (email, name) in [("t1@x.com", "Guitar"), ("t2@x.com", "Drums"), ("t1@x.com", "Bass")] {
            let class = serde_json::from_value::<NewClass>(json!({
                "instructorEmail": email,
                "name": name
            }))
            .unwrap()
            .into_class()
            .unwrap();
            repo.insert_class(&class).await.unwrap();
        }
        let mine = repo.list_classes_by_instructor("t1@x.com").await.unwrap();
        let names: Vec<_> = mine.iter().map(|c| c.extra["name"].clone()).collect();
        assert_eq!(names, vec![json!("Guitar"), json!("Bass")]);
        assert_eq!(repo.list_classes().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn moderation_sets_status_and_feedback() {
        let repo = repo();
        let class = serde_json::from_value::<NewClass>(json!({"instructorEmail": "t@x.com"}))
            .unwrap()
            .into_class()
            .unwrap();
        let id = repo.insert_class(&class).await.unwrap().inserted_id;

        repo.moderate_class(&id, ClassStatus::Denied, Some("Needs a syllabus".into()))
            .await
            .unwrap();
        let stored = repo.get_class(&id).await.unwrap().unwrap();
        assert_eq!(stored.status, ClassStatus::Denied);
        assert_eq!(stored.feedback.as_deref(), Some("Needs a syllabus"));
    }

    #[tokio::test]
    async fn delete_cart_items_counts_only_hits() {
        let repo = repo();
        let item = CartItem {
            id: None,
            email: "s@x.com".into(),
            class_id: "c-1".into(),
            extra: Default::default(),
        };
        let a = repo.insert_cart_item(&item).await.unwrap().inserted_id;
        let b = repo.insert_cart_item(&item).await.unwrap().inserted_id;
        let result = repo
            .delete_cart_items(&[a, b, DocumentId::new()])
            .await
            .unwrap();
        assert_eq!(result.deleted_count, 2);
        assert!(repo.list_cart_items("s@x.com").await.unwrap().is_empty());
    }
}
