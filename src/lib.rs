//! Lead Capture API Library
//!
//! Accepts school interest-form submissions, stores them in a document
//! store, and notifies an admin and the submitter by email.
//!
//! # Modules
//!
//! - `api`: HTTP-facing components.
//! - `core`: Lead rules, models and errors.
//! - `integrations`: Storage and email backends.
//! - `config`: Configuration management.
//! - `db`: Database connection and schema bootstrap.
//! - `db_storage`: Postgres document store.
//! - `document_store`: Store trait and in-memory implementation.
//! - `email_client`: Email transports and the `Mailer`.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `leads`: Lead Resource Manager.
//! - `models`: Lead data models.
//! - `notifier`: Notification templates and best-effort dispatch.
//! - `openapi`: OpenAPI document.
//! - `routes`: Router assembly.
//! - `validation`: Submission field rules.

pub mod api;
pub mod core;
pub mod integrations;

pub mod config;
pub mod db;
pub mod db_storage;
pub mod document_store;
pub mod email_client;
pub mod errors;
pub mod handlers;
pub mod leads;
pub mod models;
pub mod notifier;
pub mod openapi;
pub mod routes;
pub mod validation;
