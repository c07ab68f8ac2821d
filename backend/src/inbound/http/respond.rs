//! Uniform JSON response envelope.
//!
//! ```text
//! {"success": true, "timestamp": 1716595200, "data": [...]}
//! {"success": false, "timestamp": 1716595200, "errors": {"error": "...", "fields": {...}}}
//! ```

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::domain::{Error, FieldErrors};

use super::context::RequestContext;

/// Envelope wrapping every dispatcher response body.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// `false` only when `errors` is present.
    pub success: bool,
    /// Unix seconds at which the response was rendered.
    pub timestamp: i64,
    /// Payload of a successful call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ErrorBody>,
}

/// Client-facing description of a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// Per-field messages for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl From<&Error> for ErrorBody {
    fn from(error: &Error) -> Self {
        Self {
            error: error.message().to_owned(),
            fields: error.fields().cloned(),
        }
    }
}

/// Render `data` with `status` and record the status in `ctx`.
pub fn respond<T: Serialize>(ctx: &RequestContext, data: T, status: StatusCode) -> HttpResponse {
    render(
        ctx,
        status,
        &Envelope {
            success: true,
            timestamp: ctx.now().timestamp(),
            data: Some(data),
            errors: None,
        },
    )
}

/// Render a success envelope without data.
pub fn respond_empty(ctx: &RequestContext, status: StatusCode) -> HttpResponse {
    render(
        ctx,
        status,
        &Envelope::<()> {
            success: true,
            timestamp: ctx.now().timestamp(),
            data: None,
            errors: None,
        },
    )
}

/// Render `error` as a failure envelope. Diagnostics are never included.
pub fn respond_error(ctx: &RequestContext, error: &Error, status: StatusCode) -> HttpResponse {
    render(
        ctx,
        status,
        &Envelope::<()> {
            success: false,
            timestamp: ctx.now().timestamp(),
            data: None,
            errors: Some(ErrorBody::from(error)),
        },
    )
}

fn render<T: Serialize>(ctx: &RequestContext, status: StatusCode, envelope: &Envelope<T>) -> HttpResponse {
    ctx.set_status_code(status);
    HttpResponse::build(status).json(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{fixture_context, json_body as body_of};
    use rstest::{fixture, rstest};
    use serde_json::json;
    use std::collections::BTreeMap;

    #[fixture]
    fn ctx() -> RequestContext {
        fixture_context()
    }

    #[rstest]
    #[actix_web::test]
    async fn success_carries_data(ctx: RequestContext) {
        let response = respond(&ctx, ["a", "b"], StatusCode::OK);

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(ctx.status_code(), Some(StatusCode::OK));
        assert_eq!(
            body_of(response).await,
            json!({"success": true, "timestamp": 1_716_595_200, "data": ["a", "b"]})
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn empty_success_omits_data(ctx: RequestContext) {
        let body = body_of(respond_empty(&ctx, StatusCode::OK)).await;
        assert_eq!(body, json!({"success": true, "timestamp": 1_716_595_200}));
    }

    #[rstest]
    #[actix_web::test]
    async fn failure_lists_fields_but_not_diagnostics(ctx: RequestContext) {
        let fields = BTreeMap::from([("name".to_owned(), "name cannot be blank".to_owned())]);
        let error = Error::validation(fields).with_diagnostic("internal detail");

        let response = respond_error(&ctx, &error, StatusCode::BAD_REQUEST);

        assert_eq!(ctx.status_code(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(
            body_of(response).await,
            json!({
                "success": false,
                "timestamp": 1_716_595_200,
                "errors": {
                    "error": "data validation error",
                    "fields": {"name": "name cannot be blank"}
                }
            })
        );
    }
}
