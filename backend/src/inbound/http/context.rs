//! Per-request state threaded through the middleware chain.
//!
//! A [`RequestContext`] is created by the dispatcher for every request and
//! handed to each middleware and the handler. Clones share the same state,
//! so a status recorded by the handler is visible to the logger once the
//! inner chain returns.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use chrono::{DateTime, Utc};
use mockable::Clock;

/// Response header echoing the request's trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// W3C trace-context request header.
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// 128-bit trace identifier rendered as 32 lowercase hex digits.
///
/// # Examples
/// ```
/// use employee_service::inbound::http::context::TraceId;
///
/// let header = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";
/// let trace_id = TraceId::from_traceparent(header).expect("well formed");
/// assert_eq!(trace_id.to_string(), "4bf92f3577b34da6a3ce929d0e0e4736");
/// assert!(TraceId::from_traceparent("garbage").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TraceId(u128);

impl TraceId {
    /// All-zero identifier used when the caller sent no usable trace context.
    pub const PLACEHOLDER: Self = Self(0);

    /// Parse the trace id out of a `traceparent` header value.
    ///
    /// Returns `None` unless the header has the
    /// `version-traceid-parentid-flags` shape with a non-zero trace id.
    pub fn from_traceparent(header: &str) -> Option<Self> {
        let mut parts = header.trim().split('-');
        let version = parts.next()?;
        let trace_id = parts.next()?;
        let parent_id = parts.next()?;
        let flags = parts.next()?;

        let well_formed = is_hex(version, 2)
            && version != "ff"
            && is_hex(trace_id, 32)
            && is_hex(parent_id, 16)
            && is_hex(flags, 2);
        if !well_formed {
            return None;
        }
        // Version 00 has exactly four fields.
        if version == "00" && parts.next().is_some() {
            return None;
        }

        let raw = u128::from_str_radix(trace_id, 16).ok()?;
        (raw != 0).then_some(Self(raw))
    }

    /// Whether this is the placeholder id.
    pub const fn is_placeholder(self) -> bool {
        self.0 == 0
    }
}

fn is_hex(value: &str, len: usize) -> bool {
    value.len() == len
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

struct ContextState {
    trace_id: TraceId,
    started_at: Instant,
    received_at: DateTime<Utc>,
    clock: Arc<dyn Clock>,
    status: Cell<Option<StatusCode>>,
    is_error: Cell<bool>,
    is_panic: Cell<bool>,
    rendered: RefCell<Option<HttpResponse>>,
}

/// Handle to the state of one in-flight request.
///
/// Cloning is cheap and every clone observes the same slots. The handle is
/// `!Send` and stays on the worker that accepted the request.
#[derive(Clone)]
pub struct RequestContext {
    inner: Rc<ContextState>,
}

impl RequestContext {
    /// Start a context for a request received now according to `clock`.
    pub fn new(trace_id: TraceId, clock: Arc<dyn Clock>) -> Self {
        let received_at = clock.utc();
        Self {
            inner: Rc::new(ContextState {
                trace_id,
                started_at: Instant::now(),
                received_at,
                clock,
                status: Cell::new(None),
                is_error: Cell::new(false),
                is_panic: Cell::new(false),
                rendered: RefCell::new(None),
            }),
        }
    }

    /// Trace identifier for log correlation.
    pub fn trace_id(&self) -> TraceId {
        self.inner.trace_id
    }

    /// Wall-clock time at which the request arrived. Handlers pass this to
    /// the domain as "now".
    pub fn received_at(&self) -> DateTime<Utc> {
        self.inner.received_at
    }

    /// Current wall-clock time from the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.inner.clock.utc()
    }

    /// Time spent on the request so far.
    pub fn elapsed(&self) -> Duration {
        self.inner.started_at.elapsed()
    }

    /// Status code recorded by whoever rendered the response.
    pub fn status_code(&self) -> Option<StatusCode> {
        self.inner.status.get()
    }

    /// Record the status code of the response being sent.
    pub fn set_status_code(&self, status: StatusCode) {
        self.inner.status.set(Some(status));
    }

    /// Whether the error middleware translated a failure for this request.
    pub fn is_error(&self) -> bool {
        self.inner.is_error.get()
    }

    /// Flag the request as failed.
    pub fn mark_error(&self) {
        self.inner.is_error.set(true);
    }

    /// Whether a panic was recovered while serving this request.
    pub fn is_panic(&self) -> bool {
        self.inner.is_panic.get()
    }

    /// Flag the request as having panicked.
    pub fn mark_panic(&self) {
        self.inner.is_panic.set(true);
    }

    /// Keep a rendered response for the dispatcher to send when the chain
    /// ends in a fatal error.
    pub fn stash_response(&self, response: HttpResponse) {
        self.inner.rendered.replace(Some(response));
    }

    /// Take the stashed response, if any.
    pub fn take_response(&self) -> Option<HttpResponse> {
        self.inner.rendered.take()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("trace_id", &self.inner.trace_id)
            .field("received_at", &self.inner.received_at)
            .field("status", &self.inner.status.get())
            .field("is_error", &self.inner.is_error.get())
            .field("is_panic", &self.inner.is_panic.get())
            .finish_non_exhaustive()
    }
}
