//! Lead Resource Manager: validation, persistence and the notification hook.

use crate::document_store::{DocumentStore, Fields};
use crate::errors::{AppError, ResultExt};
use crate::models::{Lead, LeadCreate, LeadUpdate, ListQuery};
use crate::notifier::Notifier;
use crate::validation::validate_lead;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

/// CRUD over leads against an injected document store.
#[derive(Clone)]
pub struct LeadService {
    store: Arc<dyn DocumentStore>,
    notifier: Notifier,
}

fn to_document(lead: &Lead) -> Result<Value, AppError> {
    serde_json::to_value(lead)
        .map_err(|e| AppError::InternalError(format!("Failed to encode lead {}: {}", lead.id, e)))
}

fn from_document(document: Value) -> Result<Lead, AppError> {
    serde_json::from_value(document)
        .map_err(|e| AppError::InternalError(format!("Stored lead is malformed: {}", e)))
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Lead with ID {} not found", id))
}

impl LeadService {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    /// Validates and stores a submission, then fires the notification emails.
    ///
    /// The emails go out on a detached task; their outcome never changes the
    /// result of this call.
    pub async fn create(&self, input: LeadCreate) -> Result<Lead, AppError> {
        validate_lead(&input)?;

        let lead = Lead::from_submission(input, Utc::now());
        self.store
            .insert(&lead.id, lead.created_at, to_document(&lead)?)
            .await
            .context("creating lead")?;

        tracing::info!("New lead created: {} - {}", lead.id, lead.school_name);

        self.notifier.notify_lead_created(&lead);

        Ok(lead)
    }

    /// Newest leads first.
    pub async fn list(&self, query: ListQuery) -> Result<Vec<Lead>, AppError> {
        let documents = self
            .store
            .find_page(query.skip(), query.limit())
            .await
            .context("listing leads")?;

        documents.into_iter().map(from_document).collect()
    }

    pub async fn get(&self, id: &str) -> Result<Lead, AppError> {
        let document = self
            .store
            .find_one(id)
            .await
            .with_context(|| format!("fetching lead {}", id))?
            .ok_or_else(|| not_found(id))?;

        from_document(document)
    }

    /// Applies a sparse status/notes patch and bumps `updatedAt`.
    ///
    /// Existence is checked before the patch, so an unknown id is NotFound
    /// even when the patch is empty.
    pub async fn update(&self, id: &str, patch: LeadUpdate) -> Result<Lead, AppError> {
        let existing = self
            .store
            .find_one(id)
            .await
            .with_context(|| format!("fetching lead {}", id))?;
        if existing.is_none() {
            return Err(not_found(id));
        }

        if patch.is_empty() {
            return Err(AppError::BadRequest("No update data provided".to_string()));
        }

        let mut fields = Fields::new();
        if let Some(status) = patch.status {
            fields.insert("status".to_string(), json!(status));
        }
        if let Some(notes) = patch.notes {
            fields.insert("notes".to_string(), json!(notes));
        }
        fields.insert("updatedAt".to_string(), json!(Utc::now()));

        let updated = self
            .store
            .set_fields(id, fields)
            .await
            .with_context(|| format!("updating lead {}", id))?
            // Deleted between the lookup and the write.
            .ok_or_else(|| not_found(id))?;

        tracing::info!("Lead updated: {}", id);
        from_document(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let deleted = self
            .store
            .delete_one(id)
            .await
            .with_context(|| format!("deleting lead {}", id))?;
        if !deleted {
            return Err(not_found(id));
        }

        tracing::info!("Lead deleted: {}", id);
        Ok(())
    }
}
