use crate::document_store::{DocumentStore, Fields};
use crate::errors::{AppError, ResultExt};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

/// Postgres-backed [`DocumentStore`]: one JSONB row per document, scoped to
/// a named collection in the shared `documents` table.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    collection: String,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool, collection: impl Into<String>) -> Self {
        Self {
            pool,
            collection: collection.into(),
        }
    }
}

/// Postgres OFFSET/LIMIT take BIGINT.
fn to_bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(
        &self,
        id: &str,
        created_at: DateTime<Utc>,
        document: Value,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, created_at, body)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&self.collection)
        .bind(id)
        .bind(created_at)
        .bind(&document)
        .execute(&self.pool)
        .await
        .with_context(|| format!("inserting {}/{}", self.collection, id))?;

        Ok(())
    }

    async fn find_one(&self, id: &str) -> Result<Option<Value>, AppError> {
        sqlx::query_scalar::<_, Value>(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(&self.collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("fetching {}/{}", self.collection, id))
    }

    async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<Value>, AppError> {
        sqlx::query_scalar::<_, Value>(
            r#"
            SELECT body FROM documents
            WHERE collection = $1
            ORDER BY created_at DESC, seq DESC
            OFFSET $2
            LIMIT $3
            "#,
        )
        .bind(&self.collection)
        .bind(to_bigint(skip))
        .bind(to_bigint(limit))
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("listing {}", self.collection))
    }

    async fn set_fields(&self, id: &str, fields: Fields) -> Result<Option<Value>, AppError> {
        // Single-statement merge keeps the update atomic per document.
        sqlx::query_scalar::<_, Value>(
            r#"
            UPDATE documents
            SET body = body || $3
            WHERE collection = $1 AND id = $2
            RETURNING body
            "#,
        )
        .bind(&self.collection)
        .bind(id)
        .bind(Value::Object(fields))
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("updating {}/{}", self.collection, id))
    }

    async fn delete_one(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(&self.collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("deleting {}/{}", self.collection, id))?;

        Ok(result.rows_affected() > 0)
    }
}
