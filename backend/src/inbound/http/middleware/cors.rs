//! Cross-origin support for routes that opt in.

use std::sync::Arc;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, HeaderValue, ORIGIN, VARY,
};

use crate::inbound::http::context::RequestContext;
use crate::inbound::http::dispatcher::{BoxedHandler, HandlerResult, Middleware};
use crate::inbound::http::request::ApiRequest;

/// Methods advertised to pre-flight requests.
pub const CORS_ALLOW_METHODS: &str = "POST, PATCH, GET, OPTIONS, PUT, DELETE";

/// Request headers advertised to pre-flight requests.
pub const CORS_ALLOW_HEADERS: &str =
    "Accept, Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, Authorization";

/// Seconds browsers may cache a pre-flight answer.
pub const CORS_MAX_AGE: &str = "86400";

/// Adds CORS headers to responses for requests from the configured origin.
///
/// An origin of `*` allows every caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cors {
    origin: String,
}

impl Cors {
    /// Allow `origin`.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }

    /// Configured origin.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn allows(&self, origin: &str) -> bool {
        self.origin == "*" || self.origin == origin
    }

    fn decorate(&self, response: &mut HttpResponse, request_origin: &str) {
        let allowed = if self.origin == "*" {
            "*"
        } else {
            request_origin
        };
        let Ok(allowed) = HeaderValue::from_str(allowed) else {
            return;
        };
        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allowed);
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(CORS_ALLOW_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_ALLOW_HEADERS),
        );
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(CORS_MAX_AGE));
        headers.insert(VARY, HeaderValue::from_static("Origin"));
    }
}

impl Middleware for Cors {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let cors = self.clone();
        Arc::new(move |ctx: RequestContext, req: ApiRequest| {
            let next = Arc::clone(&next);
            let cors = cors.clone();
            async move {
                let origin = req
                    .header(ORIGIN.as_str())
                    .filter(|origin| cors.allows(origin))
                    .map(str::to_owned);
                let mut result = next.call(ctx, req).await;
                if let (Ok(response), Some(origin)) = (&mut result, origin) {
                    cors.decorate(response, &origin);
                }
                result
            }
        })
    }
}

/// No-op handler answering pre-flight `OPTIONS` requests with 200.
///
/// # Errors
/// Never fails.
pub async fn preflight(ctx: RequestContext, _req: ApiRequest) -> HandlerResult {
    ctx.set_status_code(StatusCode::OK);
    Ok(HttpResponse::Ok().finish())
}
