//! OpenAPI schema definitions for the response envelope.
//!
//! [`Envelope`](super::respond::Envelope) is generic over its payload; these
//! concrete shapes give each documented response a named schema.

use std::collections::BTreeMap;

use utoipa::ToSchema;

use crate::domain::Employee;

use super::teapot::Lyrics;

/// OpenAPI schema for [`ErrorBody`](super::respond::ErrorBody).
#[derive(ToSchema)]
#[schema(as = ErrorBody)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorBodySchema {
    /// Human-readable message.
    #[schema(example = "data validation error")]
    error: String,
    /// Per-field messages, present for validation failures.
    #[schema(example = json!({"name": "name cannot be blank"}))]
    fields: Option<BTreeMap<String, String>>,
}

/// Failure envelope.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorEnvelope {
    /// Always `false`.
    #[schema(example = false)]
    success: bool,
    /// Unix seconds.
    #[schema(example = 1_716_595_200)]
    timestamp: i64,
    /// Failure description.
    errors: ErrorBodySchema,
}

/// Success envelope without a payload.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct StatusEnvelope {
    /// Always `true`.
    #[schema(example = true)]
    success: bool,
    /// Unix seconds.
    #[schema(example = 1_716_595_200)]
    timestamp: i64,
}

/// Success envelope carrying employees.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EmployeeListEnvelope {
    /// Always `true`.
    #[schema(example = true)]
    success: bool,
    /// Unix seconds.
    #[schema(example = 1_716_595_200)]
    timestamp: i64,
    /// Matching employees.
    data: Vec<Employee>,
}

/// Success envelope carrying the teapot verse.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct LyricsEnvelope {
    /// Always `true`.
    #[schema(example = true)]
    success: bool,
    /// Unix seconds.
    #[schema(example = 1_716_595_200)]
    timestamp: i64,
    /// One verse.
    data: Vec<Lyrics>,
}
