//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::HttpResponse;
use actix_web::body::{MessageBody, to_bytes};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::Value;

use super::context::{RequestContext, TraceId};

/// Unix seconds of [`fixture_instant`].
pub const FIXTURE_TIMESTAMP: i64 = 1_716_595_200;

/// 2024-05-25T00:00:00Z.
pub fn fixture_instant() -> DateTime<Utc> {
    Utc.timestamp_opt(FIXTURE_TIMESTAMP, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Clock frozen at [`fixture_instant`].
pub fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_instant(),
    })
}

/// Context for a request without trace headers, received at the fixture
/// instant.
pub fn fixture_context() -> RequestContext {
    RequestContext::new(TraceId::PLACEHOLDER, fixture_clock())
}

/// Read a response body as JSON.
pub async fn json_body<B: MessageBody>(response: HttpResponse<B>) -> Value {
    let bytes = to_bytes(response.into_body())
        .await
        .map_err(|_| "body read failed")
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("response body is JSON")
}
