//! HTTP inbound adapter exposing the employee REST endpoints.
//!
//! Employee routes run through the [`dispatcher::Dispatcher`]; health probes
//! are plain actix services.

pub mod context;
pub mod dispatcher;
pub mod employees;
pub mod error;
pub mod health;
pub mod middleware;
pub mod request;
pub mod respond;
pub mod routes;
pub mod schemas;
pub mod state;
pub mod teapot;
#[cfg(test)]
pub mod test_utils;

pub use context::{RequestContext, TraceId};
pub use dispatcher::{Dispatcher, HandlerResult, ShutdownListener, ShutdownSignal};
pub use request::ApiRequest;
