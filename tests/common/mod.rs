//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use lead_capture_api::config::Config;
use lead_capture_api::document_store::{DocumentStore, Fields, MemoryDocumentStore};
use lead_capture_api::email_client::{EmailMessage, EmailTransport, Mailer};
use lead_capture_api::errors::AppError;
use lead_capture_api::handlers::AppState;
use lead_capture_api::leads::LeadService;
use lead_capture_api::notifier::Notifier;
use lead_capture_api::routes::build_router;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@arctrack.com";

pub fn test_config() -> Config {
    Config {
        database_url: "postgresql://test".to_string(),
        leads_collection: "leads".to_string(),
        port: 8001,
        admin_email: ADMIN_EMAIL.to_string(),
        email_from: "ArcTrack <onboarding@resend.dev>".to_string(),
        email_api_key: None,
        email_api_base_url: "https://api.resend.com".to_string(),
        brand_name: "ArcTrack".to_string(),
        cors_origins: Vec::new(),
        rate_limit_per_second: 10,
        rate_limit_burst: 20,
    }
}

/// Transport that forwards every message to a channel.
pub struct RecordingTransport {
    sent: mpsc::UnboundedSender<EmailMessage>,
}

#[async_trait]
impl EmailTransport for RecordingTransport {
    async fn send(&self, _from: &str, message: &EmailMessage) -> Result<(), AppError> {
        let _ = self.sent.send(message.clone());
        Ok(())
    }
}

/// Transport that records the attempt and then fails.
pub struct FailingTransport {
    attempts: mpsc::UnboundedSender<EmailMessage>,
}

#[async_trait]
impl EmailTransport for FailingTransport {
    async fn send(&self, _from: &str, message: &EmailMessage) -> Result<(), AppError> {
        let _ = self.attempts.send(message.clone());
        Err(AppError::ExternalApiError("SMTP connection refused".to_string()))
    }
}

/// Detail carried by every `FailingStore` error; must never reach a client.
pub const STORE_FAILURE_DETAIL: &str = "connection reset by peer at 10.0.0.5:5432";

/// Store whose every operation fails as if the database went away.
pub struct FailingStore;

fn store_down<T>() -> Result<T, AppError> {
    Err(AppError::DatabaseError(sqlx::Error::Protocol(
        STORE_FAILURE_DETAIL.to_string(),
    )))
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn insert(&self, _id: &str, _created_at: DateTime<Utc>, _doc: Value) -> Result<(), AppError> {
        store_down()
    }

    async fn find_one(&self, _id: &str) -> Result<Option<Value>, AppError> {
        store_down()
    }

    async fn find_page(&self, _skip: u64, _limit: u64) -> Result<Vec<Value>, AppError> {
        store_down()
    }

    async fn set_fields(&self, _id: &str, _fields: Fields) -> Result<Option<Value>, AppError> {
        store_down()
    }

    async fn delete_one(&self, _id: &str) -> Result<bool, AppError> {
        store_down()
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryDocumentStore>,
    pub emails: mpsc::UnboundedReceiver<EmailMessage>,
}

fn assemble_with_store(
    store: Arc<MemoryDocumentStore>,
    shared: Arc<dyn DocumentStore>,
    transport: Arc<dyn EmailTransport>,
    emails: mpsc::UnboundedReceiver<EmailMessage>,
) -> TestApp {
    let config = test_config();
    let mailer = Mailer::new(transport, config.email_from.clone());
    let notifier = Notifier::new(mailer, config.admin_email.clone(), config.brand_name.clone());
    let state = Arc::new(AppState {
        config,
        leads: LeadService::new(shared, notifier),
    });

    TestApp {
        router: build_router(state),
        store,
        emails,
    }
}

fn assemble(transport: Arc<dyn EmailTransport>, emails: mpsc::UnboundedReceiver<EmailMessage>) -> TestApp {
    let store = Arc::new(MemoryDocumentStore::new());
    let shared: Arc<dyn DocumentStore> = store.clone();
    assemble_with_store(store, shared, transport, emails)
}

pub fn app() -> TestApp {
    let (tx, rx) = mpsc::unbounded_channel();
    assemble(Arc::new(RecordingTransport { sent: tx }), rx)
}

pub fn app_with_failing_email() -> TestApp {
    let (tx, rx) = mpsc::unbounded_channel();
    assemble(Arc::new(FailingTransport { attempts: tx }), rx)
}

/// App whose lead routes sit on a `FailingStore`; `store` stays empty and unused.
pub fn app_with_failing_store() -> TestApp {
    let (tx, rx) = mpsc::unbounded_channel();
    assemble_with_store(
        Arc::new(MemoryDocumentStore::new()),
        Arc::new(FailingStore),
        Arc::new(RecordingTransport { sent: tx }),
        rx,
    )
}

impl TestApp {
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        // Non-JSON bodies come back as a string so assertions fail instead of panicking.
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    /// True when no email reaches the transport within `wait`.
    pub async fn no_email_within(&mut self, wait: Duration) -> bool {
        tokio::time::timeout(wait, self.emails.recv()).await.is_err()
    }

    /// Waits for the next email the notifier hands to the transport.
    pub async fn next_email(&mut self) -> EmailMessage {
        tokio::time::timeout(Duration::from_secs(2), self.emails.recv())
            .await
            .expect("timed out waiting for email")
            .expect("email channel closed")
    }
}

pub fn sample_lead() -> Value {
    serde_json::json!({
        "schoolName": "St. Mary's High School",
        "studentStrength": "801-1200",
        "city": "Mumbai",
        "contactName": "Rajesh Kumar",
        "email": "rajesh@stmarys.edu",
        "phone": "9876543210"
    })
}
