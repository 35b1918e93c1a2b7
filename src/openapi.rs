use crate::handlers;
use crate::models::{Lead, LeadCreate, LeadUpdate};
use utoipa::OpenApi;

/// OpenAPI document for the lead endpoints, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::root,
        handlers::create_lead,
        handlers::list_leads,
        handlers::get_lead,
        handlers::update_lead,
        handlers::delete_lead
    ),
    components(schemas(Lead, LeadCreate, LeadUpdate)),
    tags(
        (name = "leads", description = "School interest-form submissions"),
        (name = "meta", description = "Service status")
    )
)]
pub struct ApiDoc;
