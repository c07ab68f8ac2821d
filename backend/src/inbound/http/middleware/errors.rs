//! Translation of handler errors into enveloped responses.

use std::sync::Arc;

use tracing::{error, warn};

use crate::domain::ErrorCode;
use crate::inbound::http::context::RequestContext;
use crate::inbound::http::dispatcher::{BoxedHandler, Middleware};
use crate::inbound::http::error::status_for;
use crate::inbound::http::request::ApiRequest;
use crate::inbound::http::respond::respond_error;

/// Turns every error from the inner chain into an error envelope and marks
/// the context as failed.
///
/// Shutdown errors are rendered into the context and then returned again so
/// the dispatcher can stop the service after answering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Errors;

impl Middleware for Errors {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(move |ctx: RequestContext, req: ApiRequest| {
            let next = Arc::clone(&next);
            async move {
                let err = match next.call(ctx.clone(), req).await {
                    Ok(response) => return Ok(response),
                    Err(err) => err,
                };

                let status = status_for(err.code());
                if err.code().is_client_error() {
                    warn!(
                        status = status.as_u16(),
                        code = ?err.code(),
                        message = err.message(),
                        "CLIENT ERROR"
                    );
                } else {
                    error!(
                        status = status.as_u16(),
                        code = ?err.code(),
                        message = err.message(),
                        diagnostic = err.diagnostic().unwrap_or_default(),
                        "SERVER ERROR"
                    );
                }

                ctx.mark_error();
                let response = respond_error(&ctx, &err, status);
                if err.code() == ErrorCode::Shutdown {
                    ctx.stash_response(response);
                    return Err(err);
                }
                Ok(response)
            }
        })
    }
}
