//! In-process document store.
//!
//! Used by tests and by the server when no database URL is configured.
//! Data lives as long as the process.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use super::{
    Collection, DeleteResult, Document, DocumentStore, Filter, InsertOneResult, StoreError,
    UpdateResult,
};
use crate::models::DocumentId;

/// Documents per collection, kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<Collection, Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    async fn insert_one(
        &self,
        collection: Collection,
        mut doc: Document,
    ) -> Result<InsertOneResult, StoreError> {
        let mut docs = self.collections.entry(collection).or_default();
        // Same rule as the unique index on users.email in the Postgres schema.
        if collection == Collection::Users
            && let Some(email) = doc.get("email")
            && docs.iter().any(|d| d.get("email") == Some(email))
        {
            return Err(StoreError::Conflict(format!("users.email {email} exists")));
        }
        let id = DocumentId::new();
        doc.insert("_id".into(), Value::String(id.to_string()));
        docs.push(doc);
        Ok(InsertOneResult::new(id))
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> Result<UpdateResult, StoreError> {
        let Some(mut docs) = self.collections.get_mut(&collection) else {
            return Ok(UpdateResult::new(0, 0));
        };
        let Some(doc) = docs.iter_mut().find(|d| filter.matches(d)) else {
            return Ok(UpdateResult::new(0, 0));
        };
        let mut modified = false;
        for (key, value) in set {
            if doc.get(&key) != Some(&value) {
                doc.insert(key, value);
                modified = true;
            }
        }
        Ok(UpdateResult::new(1, u64::from(modified)))
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<DeleteResult, StoreError> {
        let Some(mut docs) = self.collections.get_mut(&collection) else {
            return Ok(DeleteResult::new(0));
        };
        match docs.iter().position(|d| filter.matches(d)) {
            Some(index) => {
                docs.remove(index);
                Ok(DeleteResult::new(1))
            }
            None => Ok(DeleteResult::new(0)),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_fresh_id() {
        let store = MemoryStore::new();
        let result = store
            .insert_one(Collection::Users, doc(json!({"_id": "spoofed", "email": "a@x.com"})))
            .await
            .unwrap();
        let found = store
            .find_one(Collection::Users, &Filter::by_id(&result.inserted_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found["email"], "a@x.com");
        assert_ne!(found["_id"], "spoofed");
    }

    #[tokio::test]
    async fn user_emails_are_unique() {
        let store = MemoryStore::new();
        store
            .insert_one(Collection::Users, doc(json!({"email": "a@x.com"})))
            .await
            .unwrap();
        let err = store
            .insert_one(Collection::Users, doc(json!({"email": "a@x.com"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Other collections may repeat an email.
        for _ in 0..2 {
            store
                .insert_one(Collection::Carts, doc(json!({"email": "a@x.com"})))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn find_keeps_insertion_order_and_collections_apart() {
        let store = MemoryStore::new();
        for n in 0..3 {
            store
                .insert_one(Collection::Carts, doc(json!({"email": "s@x.com", "n": n})))
                .await
                .unwrap();
        }
        store
            .insert_one(Collection::Classes, doc(json!({"email": "s@x.com"})))
            .await
            .unwrap();

        let carts = store
            .find(Collection::Carts, &Filter::eq("email", "s@x.com"))
            .await
            .unwrap();
        let order: Vec<_> = carts.iter().map(|d| d["n"].clone()).collect();
        assert_eq!(order, vec![json!(0), json!(1), json!(2)]);
        assert!(
            store
                .find(Collection::Payments, &Filter::all())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn update_reports_matched_and_modified() {
        let store = MemoryStore::new();
        let id = store
            .insert_one(Collection::Users, doc(json!({"email": "a@x.com"})))
            .await
            .unwrap()
            .inserted_id;
        let filter = Filter::by_id(&id);

        let first = store
            .update_one(Collection::Users, &filter, doc(json!({"role": "admin"})))
            .await
            .unwrap();
        assert_eq!(first, UpdateResult::new(1, 1));

        let again = store
            .update_one(Collection::Users, &filter, doc(json!({"role": "admin"})))
            .await
            .unwrap();
        assert_eq!(again, UpdateResult::new(1, 0));

        let miss = store
            .update_one(
                Collection::Users,
                &Filter::by_id(&DocumentId::new()),
                doc(json!({"role": "admin"})),
            )
            .await
            .unwrap();
        assert_eq!(miss, UpdateResult::new(0, 0));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        let id = store
            .insert_one(Collection::Carts, doc(json!({"email": "s@x.com"})))
            .await
            .unwrap()
            .inserted_id;
        let filter = Filter::by_id(&id);
        let first = store.delete_one(Collection::Carts, &filter).await.unwrap();
        let second = store.delete_one(Collection::Carts, &filter).await.unwrap();
        assert_eq!(first.deleted_count, 1);
        assert_eq!(second.deleted_count, 0);
    }
}
