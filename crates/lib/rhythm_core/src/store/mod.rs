//! Document store seam.
//!
//! The API only needs a keyed document store: find, insert, update and delete
//! by an equality filter over top-level fields. Two backends implement it:
//! [`memory::MemoryStore`] and [`postgres::PgDocumentStore`] (JSONB).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::DocumentId;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// A stored document: a JSON object carrying its identifier under `_id`.
pub type Document = Map<String, Value>;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Malformed document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e
            && db.is_unique_violation()
        {
            return StoreError::Conflict(db.message().to_string());
        }
        StoreError::Database(e)
    }
}

/// Named collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Classes,
    Instructors,
    Carts,
    Payments,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Classes => "classes",
            Collection::Instructors => "instructors",
            Collection::Carts => "carts",
            Collection::Payments => "payments",
        }
    }
}

/// Equality filter over top-level document fields. An empty filter matches
/// every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Document);

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self::all().and(field, value)
    }

    pub fn by_id(id: &DocumentId) -> Self {
        Self::eq("_id", id.to_string())
    }

    pub fn and(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.0.iter().all(|(k, v)| doc.get(k) == Some(v))
    }

    pub fn as_document(&self) -> &Document {
        &self.0
    }
}

/// Outcome of an insert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: DocumentId,
}

impl InsertOneResult {
    pub fn new(inserted_id: DocumentId) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// Outcome of an update. `modified_count` stays 0 when the matched document
/// already held the new values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateResult {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
        }
    }
}

/// Outcome of a delete. A miss is `deleted_count == 0`, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Keyed document store shared by every request handler.
///
/// Single-document operations act on the first match in insertion order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All matching documents, oldest first.
    async fn find(&self, collection: Collection, filter: &Filter)
    -> Result<Vec<Document>, StoreError>;

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }

    /// Store `doc` under a freshly allocated `_id` (any client value is replaced).
    async fn insert_one(
        &self,
        collection: Collection,
        doc: Document,
    ) -> Result<InsertOneResult, StoreError>;

    /// Shallow-merge `set` into the first matching document.
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> Result<UpdateResult, StoreError>;

    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<DeleteResult, StoreError>;

    /// Connectivity check.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Backend name for logs.
    fn backend(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_filter_matches_everything() {
        let doc = json!({"email": "a@x.com"}).as_object().cloned().unwrap();
        assert!(Filter::all().matches(&doc));
        assert!(Filter::all().matches(&Document::new()));
    }

    #[test]
    fn filter_requires_every_field() {
        let doc = json!({"email": "a@x.com", "role": "admin"})
            .as_object()
            .cloned()
            .unwrap();
        assert!(Filter::eq("email", "a@x.com").matches(&doc));
        assert!(Filter::eq("email", "a@x.com").and("role", "admin").matches(&doc));
        assert!(!Filter::eq("email", "a@x.com").and("role", "student").matches(&doc));
        assert!(!Filter::eq("name", "Ada").matches(&doc));
    }

    #[test]
    fn results_serialize_in_camel_case() {
        let json = serde_json::to_value(UpdateResult::new(1, 0)).unwrap();
        assert_eq!(
            json,
            json!({"acknowledged": true, "matchedCount": 1, "modifiedCount": 0})
        );
        let json = serde_json::to_value(DeleteResult::new(0)).unwrap();
        assert_eq!(json, json!({"acknowledged": true, "deletedCount": 0}));
    }
}
