//! Server construction, wiring and shutdown.

mod config;

pub use config::ServerConfig;

use std::fmt;
use std::sync::Arc;

use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::KeepAlive;
use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

#[cfg(debug_assertions)]
use employee_service::ApiDoc;
use employee_service::domain::ports::{EmployeeRepository, ReadinessProbe};
use employee_service::domain::{EmployeeService, InputValidator};
use employee_service::inbound::http::health::{HealthState, live, ready};
use employee_service::inbound::http::routes::register_v1;
use employee_service::inbound::http::state::HttpState;
use employee_service::inbound::http::{Dispatcher, ShutdownListener, ShutdownSignal};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Everything the HTTP server needs, built from one repository.
pub struct Wiring {
    pub dispatcher: Dispatcher,
    pub health_state: web::Data<HealthState>,
    pub listener: ShutdownListener,
}

/// Wire the service, dispatcher and health state over `repository`.
pub fn wire<R>(repository: Arc<R>, config: &ServerConfig) -> Wiring
where
    R: EmployeeRepository + 'static,
{
    wire_with_clock(repository, config, Arc::new(DefaultClock))
}

fn wire_with_clock<R>(repository: Arc<R>, config: &ServerConfig, clock: Arc<dyn Clock>) -> Wiring
where
    R: EmployeeRepository + 'static,
{
    let service = Arc::new(EmployeeService::new(repository, InputValidator::new()));
    let state = HttpState::new(service.clone(), service.clone());
    let probe: Arc<dyn ReadinessProbe> = service;

    let (signal, listener) = ShutdownSignal::channel();
    let mut dispatcher = Dispatcher::new(clock, signal);
    register_v1(&mut dispatcher, &state, config.cors_origin());

    Wiring {
        dispatcher,
        health_state: web::Data::new(HealthState::new(probe)),
        listener,
    }
}

fn build_app(
    health_state: web::Data<HealthState>,
    dispatcher: Dispatcher,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.configure(move |cfg| dispatcher.configure(cfg))
}

/// Construct an Actix HTTP server for the given dispatcher.
///
/// Signal handling is left to the caller; see [`wait_for_shutdown`].
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    dispatcher: Dispatcher,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || build_app(server_health_state.clone(), dispatcher.clone()))
        .client_request_timeout(config.read_timeout)
        .keep_alive(KeepAlive::Timeout(config.idle_timeout))
        .shutdown_timeout(config.shutdown_timeout.as_secs())
        .disable_signals()
        .bind(config.bind_addr.clone())?
        .run();

    health_state.mark_ready();
    Ok(server)
}

/// Why the service is stopping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownCause {
    Interrupt,
    Terminate,
    Fatal(String),
}

impl fmt::Display for ShutdownCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => f.write_str("SIGINT"),
            Self::Terminate => f.write_str("SIGTERM"),
            Self::Fatal(reason) => write!(f, "fatal error: {reason}"),
        }
    }
}

/// Wait for SIGINT, SIGTERM or a fatal request error.
pub async fn wait_for_shutdown(listener: &mut ShutdownListener) -> ShutdownCause {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(err) = result {
                warn!(error = %err, "failed to listen for SIGINT");
            }
            ShutdownCause::Interrupt
        }
        () = terminate() => ShutdownCause::Terminate,
        Some(reason) = listener.requested() => ShutdownCause::Fatal(reason),
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(err) => {
            warn!(error = %err, "failed to listen for SIGTERM");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

/// Fail liveness, then drain in-flight requests and stop.
pub async fn shut_down(health_state: &HealthState, handle: ServerHandle, cause: &ShutdownCause) {
    info!(%cause, "shutting down");
    health_state.mark_unhealthy();
    handle.stop(true).await;
    info!("server stopped");
}

#[cfg(test)]
mod tests;
