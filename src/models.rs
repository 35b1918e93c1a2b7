use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Source recorded when the submitter does not name one.
pub const DEFAULT_SOURCE: &str = "Website Form";

/// Status every lead starts in.
pub const DEFAULT_STATUS: &str = "New";

/// Page size used when `limit` is omitted.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Upper bound applied to any requested `limit`.
pub const MAX_PAGE_SIZE: u64 = 1000;

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

// ============ Stored Models ============

/// A school's interest-form submission as persisted.
///
/// `id` and `created_at` are assigned once on creation; `updated_at` moves on
/// every successful patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "123e4567-e89b-12d3-a456-426614174000",
    "schoolName": "St. Mary's High School",
    "studentStrength": "801-1200",
    "city": "Mumbai",
    "contactName": "Rajesh Kumar",
    "email": "rajesh@stmarys.edu",
    "phone": "9876543210",
    "source": "Website Form",
    "status": "New",
    "createdAt": "2024-01-15T10:30:00Z",
    "updatedAt": "2024-01-15T10:30:00Z"
}))]
pub struct Lead {
    /// Generated unique identifier.
    pub id: String,
    pub school_name: String,
    /// Bucketed enrolment, e.g. "801-1200".
    pub student_strength: String,
    pub city: String,
    pub contact_name: String,
    pub email: String,
    /// Ten digit phone number.
    pub phone: String,
    pub source: String,
    /// Workflow status, "New" until an admin changes it.
    pub status: String,
    /// Admin notes, absent until first set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Builds a fresh lead from an already validated submission.
    pub fn from_submission(input: LeadCreate, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            school_name: input.school_name,
            student_strength: input.student_strength,
            city: input.city,
            contact_name: input.contact_name,
            email: input.email,
            phone: input.phone,
            source: input.source,
            status: DEFAULT_STATUS.to_string(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// ============ Request Models ============

/// POST /api/leads body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadCreate {
    /// 2 to 255 characters.
    pub school_name: String,
    pub student_strength: String,
    pub city: String,
    /// 2 to 255 characters.
    pub contact_name: String,
    pub email: String,
    /// Exactly 10 digits.
    pub phone: String,
    #[serde(default = "default_source")]
    pub source: String,
}

/// PATCH /api/leads/{id} body. Unknown keys are ignored; explicit nulls count
/// as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LeadUpdate {
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl LeadUpdate {
    /// True when no recognised field carries a value.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.notes.is_none()
    }
}

/// GET /api/leads query string.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Records to skip, default 0.
    pub skip: Option<u64>,
    /// Page size, default 100, capped at 1000.
    pub limit: Option<u64>,
}

impl ListQuery {
    pub fn skip(&self) -> u64 {
        self.skip.unwrap_or(0)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE)
    }
}
