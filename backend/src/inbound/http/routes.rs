//! Version 1 route table.

use std::future::Future;
use std::sync::Arc;

use actix_web::http::Method;

use super::context::RequestContext;
use super::dispatcher::{Dispatcher, Handler, HandlerResult, Middleware};
use super::employees::{
    create_employee, delete_employee, query_employee_by_id, query_employees, undelete_employee,
    update_employee,
};
use super::middleware::{Cors, preflight};
use super::request::ApiRequest;
use super::state::HttpState;
use super::teapot::teapot;

/// Collection path.
pub const EMPLOYEES_PATH: &str = "/v1/employee";
/// Single-employee path.
pub const EMPLOYEE_PATH: &str = "/v1/employee/{id}";
/// Restore path.
pub const UNDELETE_PATH: &str = "/v1/employee/undelete/{id}";
/// Easter egg.
pub const TEAPOT_PATH: &str = "/v1/teapot";

/// Bind a handler that needs the shared state to that state.
fn with_state<F, Fut>(state: &HttpState, handler: F) -> impl Handler
where
    F: Fn(HttpState, RequestContext, ApiRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + 'static,
{
    let state = state.clone();
    move |ctx: RequestContext, req: ApiRequest| handler(state.clone(), ctx, req)
}

/// Register every v1 route.
///
/// With a CORS origin, employee routes carry the [`Cors`] middleware and each
/// of their paths answers `OPTIONS` pre-flight requests.
pub fn register_v1(dispatcher: &mut Dispatcher, state: &HttpState, cors_origin: Option<&str>) {
    let cors: Vec<Arc<dyn Middleware>> = cors_origin
        .map(|origin| Arc::new(Cors::new(origin)) as Arc<dyn Middleware>)
        .into_iter()
        .collect();

    if !cors.is_empty() {
        for path in [EMPLOYEES_PATH, EMPLOYEE_PATH, UNDELETE_PATH] {
            dispatcher.handle(Method::OPTIONS, path, preflight, &cors);
        }
    }

    dispatcher.handle(
        Method::POST,
        EMPLOYEES_PATH,
        with_state(state, create_employee),
        &cors,
    );
    dispatcher.handle(
        Method::GET,
        EMPLOYEES_PATH,
        with_state(state, query_employees),
        &cors,
    );
    dispatcher.handle(
        Method::PATCH,
        UNDELETE_PATH,
        with_state(state, undelete_employee),
        &cors,
    );
    dispatcher.handle(
        Method::GET,
        EMPLOYEE_PATH,
        with_state(state, query_employee_by_id),
        &cors,
    );
    dispatcher.handle(
        Method::PATCH,
        EMPLOYEE_PATH,
        with_state(state, update_employee),
        &cors,
    );
    dispatcher.handle(
        Method::DELETE,
        EMPLOYEE_PATH,
        with_state(state, delete_employee),
        &cors,
    );

    dispatcher.handle(Method::GET, TEAPOT_PATH, teapot, &[]);
}
