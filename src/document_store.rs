//! Generic key-document persistence used by the lead manager.
//!
//! Documents are JSON objects keyed by a string id inside one collection.
//! Every operation touches a single document, so single-document atomicity
//! is the only consistency guarantee offered.

use crate::errors::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Field set applied by [`DocumentStore::set_fields`].
pub type Fields = Map<String, Value>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores a new document under `id`.
    async fn insert(
        &self,
        id: &str,
        created_at: DateTime<Utc>,
        document: Value,
    ) -> Result<(), AppError>;

    /// Fetches the document stored under `id`.
    async fn find_one(&self, id: &str) -> Result<Option<Value>, AppError>;

    /// Returns a page of documents, newest `created_at` first. Documents
    /// sharing a timestamp come back in reverse insertion order.
    async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<Value>, AppError>;

    /// Shallow-merges `fields` into the document under `id` and returns the
    /// merged document, or `None` when no such document exists.
    async fn set_fields(&self, id: &str, fields: Fields) -> Result<Option<Value>, AppError>;

    /// Removes the document under `id`; `false` when nothing was there.
    async fn delete_one(&self, id: &str) -> Result<bool, AppError>;
}

#[derive(Debug)]
struct StoredDocument {
    seq: u64,
    created_at: DateTime<Utc>,
    body: Value,
}

#[derive(Debug, Default)]
struct MemoryCollection {
    next_seq: u64,
    documents: HashMap<String, StoredDocument>,
}

/// Process-local store for tests and single-node demos.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<MemoryCollection>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.documents.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(
        &self,
        id: &str,
        created_at: DateTime<Utc>,
        document: Value,
    ) -> Result<(), AppError> {
        let mut collection = self.inner.write().await;
        if collection.documents.contains_key(id) {
            return Err(AppError::InternalError(format!(
                "duplicate document id {}",
                id
            )));
        }

        let seq = collection.next_seq;
        collection.next_seq += 1;
        collection.documents.insert(
            id.to_string(),
            StoredDocument {
                seq,
                created_at,
                body: document,
            },
        );
        Ok(())
    }

    async fn find_one(&self, id: &str) -> Result<Option<Value>, AppError> {
        let collection = self.inner.read().await;
        Ok(collection.documents.get(id).map(|doc| doc.body.clone()))
    }

    async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<Value>, AppError> {
        let collection = self.inner.read().await;
        let mut docs: Vec<&StoredDocument> = collection.documents.values().collect();
        docs.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.seq.cmp(&a.seq))
        });

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(docs
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|doc| doc.body.clone())
            .collect())
    }

    async fn set_fields(&self, id: &str, fields: Fields) -> Result<Option<Value>, AppError> {
        let mut collection = self.inner.write().await;
        let Some(doc) = collection.documents.get_mut(id) else {
            return Ok(None);
        };

        let Value::Object(body) = &mut doc.body else {
            return Err(AppError::InternalError(format!(
                "document {} is not an object",
                id
            )));
        };
        body.extend(fields);

        Ok(Some(doc.body.clone()))
    }

    async fn delete_one(&self, id: &str) -> Result<bool, AppError> {
        let mut collection = self.inner.write().await;
        Ok(collection.documents.remove(id).is_some())
    }
}
