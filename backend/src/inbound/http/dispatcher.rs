//! Route table and middleware-composed request dispatch.
//!
//! Handlers are registered with [`Dispatcher::handle`] and installed into an
//! actix application with [`Dispatcher::configure`]. Each request gets a fresh
//! [`RequestContext`] and runs through, outermost first:
//!
//! ```text
//! Logger -> Errors -> Panics -> route middleware... -> handler
//! ```
//!
//! A handler error that survives the whole chain is fatal: the response
//! already rendered for it is sent and the [`ShutdownSignal`] fires.

use std::future::Future;
use std::sync::Arc;

use actix_web::http::Method;
use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::web::{self, Bytes, ServiceConfig};
use actix_web::{HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;
use mockable::Clock;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::domain::Error;

use super::context::{RequestContext, TRACE_ID_HEADER, TRACEPARENT_HEADER, TraceId};
use super::middleware::{Errors, Logger, Panics};
use super::request::ApiRequest;
use super::respond::respond_error;

/// What a handler or middleware resolves to.
pub type HandlerResult = Result<HttpResponse, Error>;

/// Future returned by [`Handler::call`].
pub type HandlerFuture = LocalBoxFuture<'static, HandlerResult>;

/// Shared, type-erased handler.
pub type BoxedHandler = Arc<dyn Handler>;

/// Request handler at the core of a route.
///
/// Implemented for every `Fn(RequestContext, ApiRequest) -> impl Future`
/// closure, so plain closures and async functions register directly.
pub trait Handler: Send + Sync + 'static {
    /// Serve one request.
    fn call(&self, ctx: RequestContext, req: ApiRequest) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(RequestContext, ApiRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + 'static,
{
    fn call(&self, ctx: RequestContext, req: ApiRequest) -> HandlerFuture {
        Box::pin(self(ctx, req))
    }
}

/// Decorator producing a new handler around `next`.
pub trait Middleware: Send + Sync + 'static {
    /// Wrap `next`.
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

/// Wrap `handler` so that `middleware[0]` runs first.
pub fn wrap_middleware(middleware: &[Arc<dyn Middleware>], handler: BoxedHandler) -> BoxedHandler {
    middleware
        .iter()
        .rev()
        .fold(handler, |next, layer| layer.wrap(next))
}

/// Sending half of the fatal-error channel.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: mpsc::Sender<String>,
}

/// Receiving half of the fatal-error channel.
#[derive(Debug)]
pub struct ShutdownListener {
    rx: mpsc::Receiver<String>,
}

impl ShutdownSignal {
    /// Create a connected signal and listener.
    pub fn channel() -> (Self, ShutdownListener) {
        let (tx, rx) = mpsc::channel(1);
        (Self { tx }, ShutdownListener { rx })
    }

    /// Ask the service to stop. Repeated requests while one is pending are
    /// dropped.
    pub fn trigger(&self, reason: impl Into<String>) {
        if self.tx.try_send(reason.into()).is_err() {
            debug!("shutdown already requested");
        }
    }
}

impl ShutdownListener {
    /// Wait for the first shutdown request. Returns `None` once every
    /// signal has been dropped.
    pub async fn requested(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Non-blocking check for a pending request.
    pub fn try_requested(&mut self) -> Option<String> {
        self.rx.try_recv().ok()
    }
}

#[derive(Clone)]
struct Route {
    method: Method,
    path: String,
    handler: BoxedHandler,
}

/// Route table plus the state every request needs.
#[derive(Clone)]
pub struct Dispatcher {
    routes: Vec<Route>,
    app_middleware: Vec<Arc<dyn Middleware>>,
    clock: Arc<dyn Clock>,
    shutdown: ShutdownSignal,
}

impl Dispatcher {
    /// Dispatcher applying the standard Logger, Errors and Panics chain.
    pub fn new(clock: Arc<dyn Clock>, shutdown: ShutdownSignal) -> Self {
        Self::with_middleware(
            clock,
            shutdown,
            vec![Arc::new(Logger), Arc::new(Errors), Arc::new(Panics)],
        )
    }

    /// Dispatcher with a custom application-wide chain.
    pub fn with_middleware(
        clock: Arc<dyn Clock>,
        shutdown: ShutdownSignal,
        app_middleware: Vec<Arc<dyn Middleware>>,
    ) -> Self {
        Self {
            routes: Vec::new(),
            app_middleware,
            clock,
            shutdown,
        }
    }

    /// Register `handler` for `method` on `path`, wrapped in
    /// `route_middleware` inside the application chain.
    ///
    /// `path` uses actix patterns, e.g. `/v1/employee/{id}`.
    ///
    /// # Examples
    /// ```
    /// use actix_web::http::{Method, StatusCode};
    /// use employee_service::inbound::http::dispatcher::{Dispatcher, ShutdownSignal};
    /// use employee_service::inbound::http::respond::respond_empty;
    /// use mockable::DefaultClock;
    /// use std::sync::Arc;
    ///
    /// let (signal, _listener) = ShutdownSignal::channel();
    /// let mut dispatcher = Dispatcher::new(Arc::new(DefaultClock), signal);
    /// dispatcher.handle(Method::GET, "/ping", |ctx, _req| async move {
    ///     Ok(respond_empty(&ctx, StatusCode::OK))
    /// }, &[]);
    /// ```
    pub fn handle<H: Handler>(
        &mut self,
        method: Method,
        path: &str,
        handler: H,
        route_middleware: &[Arc<dyn Middleware>],
    ) {
        let handler = wrap_middleware(route_middleware, Arc::new(handler));
        let handler = wrap_middleware(&self.app_middleware, handler);
        self.routes.push(Route {
            method,
            path: path.to_owned(),
            handler,
        });
    }

    /// Install every route into an actix application.
    ///
    /// Routes sharing a path become one resource. Unknown paths and
    /// unsupported methods answer with enveloped 404 and 405 responses that
    /// still pass through the application chain.
    pub fn configure(&self, cfg: &mut ServiceConfig) {
        let mut resources: Vec<(&str, Vec<&Route>)> = Vec::new();
        for route in &self.routes {
            match resources.iter_mut().find(|(path, _)| *path == route.path) {
                Some((_, routes)) => routes.push(route),
                None => resources.push((&route.path, vec![route])),
            }
        }

        for (path, routes) in resources {
            let mut resource = web::resource(path);
            for route in routes {
                let endpoint = self.endpoint(Arc::clone(&route.handler));
                resource = resource.route(web::method(route.method.clone()).to(
                    move |req: HttpRequest, body: Bytes| {
                        let endpoint = endpoint.clone();
                        async move { endpoint.serve(req, body).await }
                    },
                ));
            }
            let fallback = self.fallback(StatusCode::METHOD_NOT_ALLOWED, "method not allowed");
            resource = resource.default_service(web::to(move |req: HttpRequest, body: Bytes| {
                let fallback = fallback.clone();
                async move { fallback.serve(req, body).await }
            }));
            cfg.service(resource);
        }

        let not_found = self.fallback(StatusCode::NOT_FOUND, "route not found");
        cfg.default_service(web::to(move |req: HttpRequest, body: Bytes| {
            let not_found = not_found.clone();
            async move { not_found.serve(req, body).await }
        }));
    }

    fn endpoint(&self, handler: BoxedHandler) -> Endpoint {
        Endpoint {
            handler,
            clock: Arc::clone(&self.clock),
            shutdown: self.shutdown.clone(),
        }
    }

    fn fallback(&self, status: StatusCode, message: &'static str) -> Endpoint {
        let handler: BoxedHandler = Arc::new(move |ctx: RequestContext, _req: ApiRequest| async move {
            Ok(respond_error(&ctx, &Error::invalid_request(message), status))
        });
        self.endpoint(wrap_middleware(&self.app_middleware, handler))
    }
}

#[derive(Clone)]
struct Endpoint {
    handler: BoxedHandler,
    clock: Arc<dyn Clock>,
    shutdown: ShutdownSignal,
}

impl Endpoint {
    async fn serve(&self, req: HttpRequest, body: Bytes) -> HttpResponse {
        let trace_id = req
            .headers()
            .get(TRACEPARENT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(TraceId::from_traceparent)
            .unwrap_or(TraceId::PLACEHOLDER);
        let ctx = RequestContext::new(trace_id, Arc::clone(&self.clock));

        let mut response = match self.handler.call(ctx.clone(), ApiRequest::new(req, body)).await {
            Ok(response) => response,
            Err(err) => {
                error!(%trace_id, error = %err, "fatal error reached the dispatcher, shutting down");
                self.shutdown.trigger(err.to_string());
                ctx.take_response().unwrap_or_else(|| {
                    respond_error(
                        &ctx,
                        &Error::internal(err.message()),
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                })
            }
        };

        if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        response
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
