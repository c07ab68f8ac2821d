//! Employee API handlers.
//!
//! ```text
//! POST   /v1/employee                {"name": "Ada", "position": "Engineer"}
//! GET    /v1/employee?page=1&per_page=20&sort=id&direction=asc
//! GET    /v1/employee/{id}
//! PATCH  /v1/employee/{id}           {"position": "Staff Engineer"}
//! DELETE /v1/employee/{id}
//! PATCH  /v1/employee/undelete/{id}
//! ```

use actix_web::http::StatusCode;
use pagination::Pagination;

use crate::domain::{NewEmployee, UpdateEmployee};

use super::context::RequestContext;
use super::dispatcher::HandlerResult;
use super::request::ApiRequest;
use super::respond::{respond, respond_empty};
use super::schemas::{EmployeeListEnvelope, ErrorEnvelope, StatusEnvelope};
use super::state::HttpState;

/// Create an employee.
#[utoipa::path(
    post,
    path = "/v1/employee",
    request_body = NewEmployee,
    responses(
        (status = 200, description = "Created employee", body = EmployeeListEnvelope),
        (status = 400, description = "Malformed body or blank name", body = ErrorEnvelope),
        (status = 409, description = "Duplicate employee", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["employees"],
    operation_id = "createEmployee"
)]
pub async fn create_employee(state: HttpState, ctx: RequestContext, req: ApiRequest) -> HandlerResult {
    let new: NewEmployee = req.decode()?;
    let employee = state.employees.create(new, ctx.received_at()).await?;
    Ok(respond(&ctx, [employee], StatusCode::OK))
}

/// List active employees one page at a time.
#[utoipa::path(
    get,
    path = "/v1/employee",
    params(
        ("page" = Option<u32>, Query, description = "One-based page number; defaults to the first page"),
        ("per_page" = Option<u32>, Query, description = "Page size, 1 to 100; defaults to 20"),
        ("sort" = Option<String>, Query, description = "created_on (default), updated_on or id"),
        ("direction" = Option<String>, Query, description = "asc or desc (default)")
    ),
    responses(
        (status = 200, description = "Page of employees, possibly empty", body = EmployeeListEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["employees"],
    operation_id = "listEmployees"
)]
pub async fn query_employees(state: HttpState, ctx: RequestContext, req: ApiRequest) -> HandlerResult {
    let pagination = Pagination::from_query(req.query_string());
    let employees = state.employees_query.query(pagination).await?;
    Ok(respond(&ctx, employees, StatusCode::OK))
}

/// Fetch one active employee.
#[utoipa::path(
    get,
    path = "/v1/employee/{id}",
    params(("id" = String, Path, description = "Employee identifier")),
    responses(
        (status = 200, description = "The employee", body = EmployeeListEnvelope),
        (status = 400, description = "Identifier is not a positive integer", body = ErrorEnvelope),
        (status = 404, description = "No active employee has this identifier", body = ErrorEnvelope)
    ),
    tags = ["employees"],
    operation_id = "getEmployee"
)]
pub async fn query_employee_by_id(
    state: HttpState,
    ctx: RequestContext,
    req: ApiRequest,
) -> HandlerResult {
    let employee = state.employees_query.query_by_id(req.param("id")).await?;
    Ok(respond(&ctx, [employee], StatusCode::OK))
}

/// Change the fields present in the body.
#[utoipa::path(
    patch,
    path = "/v1/employee/{id}",
    params(("id" = String, Path, description = "Employee identifier")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Updated, or nothing to update", body = StatusEnvelope),
        (status = 400, description = "Malformed body or identifier", body = ErrorEnvelope),
        (status = 404, description = "No active employee has this identifier", body = ErrorEnvelope)
    ),
    tags = ["employees"],
    operation_id = "updateEmployee"
)]
pub async fn update_employee(state: HttpState, ctx: RequestContext, req: ApiRequest) -> HandlerResult {
    let patch: UpdateEmployee = req.decode()?;
    state
        .employees
        .update(req.param("id"), patch, ctx.received_at())
        .await?;
    Ok(respond_empty(&ctx, StatusCode::OK))
}

/// Soft-delete an employee.
#[utoipa::path(
    delete,
    path = "/v1/employee/{id}",
    params(("id" = String, Path, description = "Employee identifier")),
    responses(
        (status = 200, description = "Deleted", body = StatusEnvelope),
        (status = 400, description = "Identifier is not a positive integer", body = ErrorEnvelope),
        (status = 404, description = "No active employee has this identifier", body = ErrorEnvelope)
    ),
    tags = ["employees"],
    operation_id = "deleteEmployee"
)]
pub async fn delete_employee(state: HttpState, ctx: RequestContext, req: ApiRequest) -> HandlerResult {
    state
        .employees
        .delete(req.param("id"), ctx.received_at())
        .await?;
    Ok(respond_empty(&ctx, StatusCode::OK))
}

/// Restore a soft-deleted employee. Restoring an active or unknown id is not
/// an error.
#[utoipa::path(
    patch,
    path = "/v1/employee/undelete/{id}",
    params(("id" = String, Path, description = "Employee identifier")),
    responses(
        (status = 200, description = "Restored", body = StatusEnvelope),
        (status = 400, description = "Identifier is not a positive integer", body = ErrorEnvelope)
    ),
    tags = ["employees"],
    operation_id = "undeleteEmployee"
)]
pub async fn undelete_employee(
    state: HttpState,
    ctx: RequestContext,
    req: ApiRequest,
) -> HandlerResult {
    state
        .employees
        .undelete(req.param("id"), ctx.received_at())
        .await?;
    Ok(respond_empty(&ctx, StatusCode::OK))
}

#[cfg(test)]
#[path = "employees_tests.rs"]
mod tests;
