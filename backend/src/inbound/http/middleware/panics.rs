//! Panic recovery for the handler chain.
//!
//! [`install_panic_hook`] records a backtrace and location on the panicking
//! thread before unwinding starts; [`Panics`] picks it up after
//! `catch_unwind` on the same thread. Without the hook the diagnostic falls
//! back to a trace of the recovery site.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Once};

use futures_util::FutureExt;

use crate::domain::Error;
use crate::inbound::http::context::RequestContext;
use crate::inbound::http::dispatcher::{BoxedHandler, Middleware};
use crate::inbound::http::request::ApiRequest;

thread_local! {
    static PANIC_TRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// Chain a hook onto the process panic hook that keeps the backtrace of the
/// panic site for [`Panics`]. Safe to call more than once.
pub fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map_or_else(|| "unknown location".to_owned(), ToString::to_string);
            let trace = format!("panicked at {location}\n{}", Backtrace::force_capture());
            PANIC_TRACE.with(|slot| *slot.borrow_mut() = Some(trace));
            previous(info);
        }));
    });
}

fn take_panic_trace() -> String {
    PANIC_TRACE
        .with(|slot| slot.borrow_mut().take())
        .unwrap_or_else(|| format!("recovery site\n{}", Backtrace::force_capture()))
}

/// Converts a panic inside the inner chain into an internal error.
///
/// The client-facing message is `API PANIC [<message>]`; the backtrace only
/// travels in the error's diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct Panics;

impl Middleware for Panics {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(move |ctx: RequestContext, req: ApiRequest| {
            let next = Arc::clone(&next);
            async move {
                let inner_ctx = ctx.clone();
                let outcome = AssertUnwindSafe(async move { next.call(inner_ctx, req).await })
                    .catch_unwind()
                    .await;
                outcome.unwrap_or_else(|payload| {
                    ctx.mark_panic();
                    let message = format!("API PANIC [{}]", panic_message(payload.as_ref()));
                    let trace = take_panic_trace();
                    Err(Error::internal(message.clone())
                        .with_diagnostic(format!("{message} TRACE:\n{trace}")))
                })
            }
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
