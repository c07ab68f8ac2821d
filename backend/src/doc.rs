//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every employee endpoint, the teapot, the health
//! probes, and the envelope schemas defined in
//! [`crate::inbound::http::schemas`]. Swagger UI serves it in debug builds.

use utoipa::OpenApi;

use crate::domain::{Employee, EmployeeId, NewEmployee, UpdateEmployee};
use crate::inbound::http::schemas::{
    EmployeeListEnvelope, ErrorBodySchema, ErrorEnvelope, LyricsEnvelope, StatusEnvelope,
};
use crate::inbound::http::teapot::Lyrics;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee service API",
        description = "CRUD over employees with soft delete and paging."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::employees::create_employee,
        crate::inbound::http::employees::query_employees,
        crate::inbound::http::employees::query_employee_by_id,
        crate::inbound::http::employees::update_employee,
        crate::inbound::http::employees::delete_employee,
        crate::inbound::http::employees::undelete_employee,
        crate::inbound::http::teapot::teapot,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Employee,
        EmployeeId,
        NewEmployee,
        UpdateEmployee,
        Lyrics,
        EmployeeListEnvelope,
        LyricsEnvelope,
        StatusEnvelope,
        ErrorEnvelope,
        ErrorBodySchema
    )),
    tags(
        (name = "employees", description = "Employee records"),
        (name = "teapot", description = "Short and stout"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
