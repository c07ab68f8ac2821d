//! Tests for route registration and dispatch.

use actix_web::http::Method;
use actix_web::test::{TestRequest, call_service, init_service};
use actix_web::App;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::inbound::http::respond::{respond, respond_empty};
use crate::inbound::http::test_utils::{FIXTURE_TIMESTAMP, fixture_clock, json_body};

const TRACEPARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

fn dispatcher() -> (Dispatcher, ShutdownListener) {
    let (signal, listener) = ShutdownSignal::channel();
    let mut dispatcher = Dispatcher::new(fixture_clock(), signal);
    dispatcher.handle(
        Method::GET,
        "/v1/things/{id}",
        |ctx: RequestContext, req: ApiRequest| async move {
            let id = req.param("id").to_owned();
            Ok(respond(&ctx, [id], StatusCode::OK))
        },
        &[],
    );
    dispatcher.handle(
        Method::DELETE,
        "/v1/things/{id}",
        |ctx: RequestContext, _req: ApiRequest| async move {
            Ok(respond_empty(&ctx, StatusCode::OK))
        },
        &[],
    );
    dispatcher.handle(
        Method::POST,
        "/v1/fatal",
        |_ctx: RequestContext, _req: ApiRequest| async move {
            Err::<HttpResponse, _>(Error::shutdown("integrity check failed"))
        },
        &[],
    );
    (dispatcher, listener)
}

fn trace_header(response: &actix_web::dev::ServiceResponse) -> Option<String> {
    response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

#[rstest]
#[actix_web::test]
async fn routes_share_a_path_across_methods() {
    let (dispatcher, _listener) = dispatcher();
    let app = init_service(App::new().configure(|cfg| dispatcher.configure(cfg))).await;

    let get = call_service(&app, TestRequest::get().uri("/v1/things/7").to_request()).await;
    assert_eq!(get.status(), StatusCode::OK);
    assert_eq!(trace_header(&get).as_deref(), Some("0".repeat(32).as_str()));
    assert_eq!(
        json_body(get.into_parts().1).await,
        json!({"success": true, "timestamp": FIXTURE_TIMESTAMP, "data": ["7"]})
    );

    let delete = call_service(&app, TestRequest::delete().uri("/v1/things/7").to_request()).await;
    assert_eq!(delete.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn traceparent_sets_the_trace_id() {
    let (dispatcher, _listener) = dispatcher();
    let app = init_service(App::new().configure(|cfg| dispatcher.configure(cfg))).await;

    let response = call_service(
        &app,
        TestRequest::get()
            .uri("/v1/things/1")
            .insert_header((TRACEPARENT_HEADER, TRACEPARENT))
            .to_request(),
    )
    .await;

    assert_eq!(
        trace_header(&response).as_deref(),
        Some("4bf92f3577b34da6a3ce929d0e0e4736")
    );
}

#[rstest]
#[case(TestRequest::get().uri("/v1/nowhere"), StatusCode::NOT_FOUND, "route not found")]
#[case(TestRequest::put().uri("/v1/things/1"), StatusCode::METHOD_NOT_ALLOWED, "method not allowed")]
#[actix_web::test]
async fn unmatched_requests_get_enveloped_errors(
    #[case] request: TestRequest,
    #[case] status: StatusCode,
    #[case] message: &str,
) {
    let (dispatcher, _listener) = dispatcher();
    let app = init_service(App::new().configure(|cfg| dispatcher.configure(cfg))).await;

    let response = call_service(&app, request.to_request()).await;

    assert_eq!(response.status(), status);
    assert!(trace_header(&response).is_some());
    let body = json_body(response.into_parts().1).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"]["error"], message);
}

#[rstest]
#[actix_web::test]
async fn fatal_errors_answer_then_request_shutdown() {
    let (dispatcher, mut listener) = dispatcher();
    let app = init_service(App::new().configure(|cfg| dispatcher.configure(cfg))).await;

    let response = call_service(&app, TestRequest::post().uri("/v1/fatal").to_request()).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response.into_parts().1).await;
    assert_eq!(body["errors"]["error"], "integrity check failed");
    assert_eq!(
        listener.try_requested().as_deref(),
        Some("integrity check failed")
    );
}

#[rstest]
#[actix_web::test]
async fn healthy_requests_do_not_request_shutdown() {
    let (dispatcher, mut listener) = dispatcher();
    let app = init_service(App::new().configure(|cfg| dispatcher.configure(cfg))).await;

    call_service(&app, TestRequest::get().uri("/v1/things/1").to_request()).await;
    call_service(&app, TestRequest::get().uri("/v1/missing").to_request()).await;

    assert!(listener.try_requested().is_none());
}

#[rstest]
fn repeated_shutdown_requests_are_coalesced() {
    let (signal, mut listener) = ShutdownSignal::channel();

    signal.trigger("first");
    signal.trigger("second");

    assert_eq!(listener.try_requested().as_deref(), Some("first"));
    assert!(listener.try_requested().is_none());
}
