use crate::config::Config;
use crate::errors::AppError;
use crate::leads::LeadService;
use crate::models::{Lead, LeadCreate, LeadUpdate, ListQuery};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Lead Resource Manager bound to the configured store and notifier.
    pub leads: LeadService,
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "meta",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// API banner.
#[utoipa::path(
    get,
    path = "/api",
    tag = "meta",
    responses((status = 200, description = "Service banner"))
)]
pub async fn root(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "message": format!("{} Lead Capture API", state.config.brand_name),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// POST /api/leads
///
/// Validates and stores a form submission. Notification emails are sent in
/// the background and never affect the response.
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "leads",
    request_body = LeadCreate,
    responses(
        (status = 201, description = "Lead created", body = Lead),
        (status = 400, description = "Malformed JSON"),
        (status = 422, description = "Validation failed"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LeadCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Lead>), AppError> {
    let Json(payload) = payload?;
    tracing::info!("POST /leads - school: {}", payload.school_name);

    let lead = state.leads.create(payload).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

/// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "leads",
    params(ListQuery),
    responses(
        (status = 200, description = "Leads, newest first", body = [Lead]),
        (status = 400, description = "Invalid skip/limit")
    )
)]
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Lead>>, AppError> {
    let Query(params) = params?;
    tracing::debug!("GET /leads - skip: {}, limit: {}", params.skip(), params.limit());

    let leads = state.leads.list(params).await?;
    Ok(Json(leads))
}

/// GET /api/leads/{id}
#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    tag = "leads",
    params(("id" = String, Path, description = "Lead id")),
    responses(
        (status = 200, description = "The lead", body = Lead),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Lead>, AppError> {
    tracing::debug!("GET /leads/{}", id);

    let lead = state.leads.get(&id).await?;
    Ok(Json(lead))
}

/// PATCH /api/leads/{id}
#[utoipa::path(
    patch,
    path = "/api/leads/{id}",
    tag = "leads",
    params(("id" = String, Path, description = "Lead id")),
    request_body = LeadUpdate,
    responses(
        (status = 200, description = "Updated lead", body = Lead),
        (status = 400, description = "Empty or malformed patch"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn update_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<LeadUpdate>, JsonRejection>,
) -> Result<Json<Lead>, AppError> {
    tracing::info!("PATCH /leads/{}", id);

    // An absent or unparsable body still has to report NotFound first; after
    // that any body that is not a status/notes object is a bad patch.
    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(rejection) => {
            state.leads.get(&id).await?;
            return Err(AppError::BadRequest(rejection.body_text()));
        }
    };

    let lead = state.leads.update(&id, patch).await?;
    Ok(Json(lead))
}

/// DELETE /api/leads/{id}
#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = "leads",
    params(("id" = String, Path, description = "Lead id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn delete_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    tracing::info!("DELETE /leads/{}", id);

    state.leads.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
