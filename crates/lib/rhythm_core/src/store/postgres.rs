//! PostgreSQL-backed document store.
//!
//! All collections share the `documents` table; bodies are `jsonb` and
//! filters are evaluated with containment (`body @> filter`). The schema
//! lives in `rhythm_core/migrations/` and is embedded at compile time.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use tracing::info;

use super::{
    Collection, DeleteResult, Document, DocumentStore, Filter, InsertOneResult, StoreError,
    UpdateResult,
};
use crate::models::DocumentId;

/// Document store over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `url` and bring the `documents` schema up to date.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        info!(max_connections, "connecting to PostgreSQL");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(url)
            .await?;
        Self::migrate(&pool).await?;
        Ok(Self::new(pool))
    }

    /// Run the embedded migrations.
    pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
        info!("running document store migrations");
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(sqlx::Error::from)?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_scalar::<_, Json<Document>>(
            "SELECT body FROM documents \
             WHERE collection = $1 AND body @> $2 \
             ORDER BY created_at, id",
        )
        .bind(collection.as_str())
        .bind(Json(filter.as_document().clone()))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn insert_one(
        &self,
        collection: Collection,
        mut doc: Document,
    ) -> Result<InsertOneResult, StoreError> {
        let id = DocumentId::new();
        doc.insert("_id".into(), Value::String(id.to_string()));
        sqlx::query("INSERT INTO documents (id, collection, body) VALUES ($1, $2, $3)")
            .bind(id.as_uuid())
            .bind(collection.as_str())
            .bind(Json(doc))
            .execute(&self.pool)
            .await?;
        Ok(InsertOneResult::new(id))
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> Result<UpdateResult, StoreError> {
        let (matched, modified) = sqlx::query_as::<_, (i64, i64)>(
            "WITH target AS ( \
                 SELECT id, body FROM documents \
                 WHERE collection = $1 AND body @> $2 \
                 ORDER BY created_at, id \
                 LIMIT 1 \
                 FOR UPDATE \
             ), updated AS ( \
                 UPDATE documents d SET body = d.body || $3 \
                 FROM target WHERE d.id = target.id \
                 RETURNING target.body <> d.body AS modified \
             ) \
             SELECT COUNT(*), COUNT(*) FILTER (WHERE modified) FROM updated",
        )
        .bind(collection.as_str())
        .bind(Json(filter.as_document().clone()))
        .bind(Json(set))
        .fetch_one(&self.pool)
        .await?;
        Ok(UpdateResult::new(
            u64::try_from(matched).unwrap_or_default(),
            u64::try_from(modified).unwrap_or_default(),
        ))
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<DeleteResult, StoreError> {
        let result = sqlx::query(
            "DELETE FROM documents WHERE id = ( \
                 SELECT id FROM documents \
                 WHERE collection = $1 AND body @> $2 \
                 ORDER BY created_at, id \
                 LIMIT 1 \
             )",
        )
        .bind(collection.as_str())
        .bind(Json(filter.as_document().clone()))
        .execute(&self.pool)
        .await?;
        Ok(DeleteResult::new(result.rows_affected()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
