//! Request start/completion logging.

use std::sync::Arc;

use tracing::{Instrument, info, info_span};

use crate::inbound::http::context::RequestContext;
use crate::inbound::http::dispatcher::{BoxedHandler, Middleware};
use crate::inbound::http::request::ApiRequest;

/// Logs "request started" and "request completed" inside a span carrying the
/// trace id, so every line the request emits can be correlated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger;

impl Middleware for Logger {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(move |ctx: RequestContext, req: ApiRequest| {
            let next = Arc::clone(&next);
            let span = info_span!(
                "request",
                trace_id = %ctx.trace_id(),
                method = %req.method(),
                path = %req.path(),
            );
            async move {
                let (remote_addr, client) = {
                    let info = req.http().connection_info();
                    (
                        info.peer_addr().unwrap_or("-").to_owned(),
                        info.realip_remote_addr().unwrap_or("-").to_owned(),
                    )
                };
                info!(
                    %remote_addr,
                    %client,
                    user_agent = req.header("user-agent").unwrap_or("-"),
                    "request started"
                );

                let result = next.call(ctx.clone(), req).await;

                let status = ctx
                    .status_code()
                    .or_else(|| result.as_ref().ok().map(actix_web::HttpResponse::status));
                info!(
                    status = status.map_or(0, |code| code.as_u16()),
                    duration_s = ctx.elapsed().as_secs_f64(),
                    "request completed"
                );
                result
            }
            .instrument(span)
        })
    }
}
