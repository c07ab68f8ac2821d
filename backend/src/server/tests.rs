//! Tests for server wiring, readiness signalling and shutdown causes.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
use actix_web::test::{TestRequest, call_service, init_service, read_body_json};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use employee_service::domain::ports::FixtureEmployeeRepository;
use employee_service::inbound::http::ShutdownSignal;

use super::{ServerConfig, ShutdownCause, build_app, create_server, wait_for_shutdown, wire};

#[fixture]
fn config() -> ServerConfig {
    ServerConfig::new(("127.0.0.1".into(), 0))
}

#[rstest]
#[actix_rt::test]
async fn wired_app_serves_probes_and_routes(config: ServerConfig) {
    let wiring = wire(Arc::new(FixtureEmployeeRepository::new()), &config);
    wiring.health_state.mark_ready();
    let app = init_service(build_app(wiring.health_state.clone(), wiring.dispatcher)).await;

    let live = call_service(&app, TestRequest::get().uri("/health/live").to_request()).await;
    assert_eq!(live.status(), StatusCode::OK);

    let ready = call_service(&app, TestRequest::get().uri("/health/ready").to_request()).await;
    assert_eq!(ready.status(), StatusCode::OK);

    let created = call_service(
        &app,
        TestRequest::post()
            .uri("/v1/employee")
            .set_json(json!({"name": "Ada", "position": "engineer"}))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::OK);
    let body: Value = read_body_json(created).await;
    assert_eq!(body["data"][0]["name"], "Ada");

    let teapot = call_service(&app, TestRequest::get().uri("/v1/teapot").to_request()).await;
    assert_eq!(teapot.status(), StatusCode::IM_A_TEAPOT);
}

#[rstest]
#[actix_rt::test]
async fn configured_cors_origin_reaches_routes(config: ServerConfig) {
    let config = config.with_cors_origin(Some("https://app.example.com".into()));
    let wiring = wire(Arc::new(FixtureEmployeeRepository::new()), &config);
    let app = init_service(build_app(wiring.health_state, wiring.dispatcher)).await;

    let response = call_service(
        &app,
        TestRequest::get()
            .uri("/v1/employee")
            .insert_header((ORIGIN, "https://app.example.com"))
            .to_request(),
    )
    .await;

    assert_eq!(
        response
            .headers()
            .get(ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("https://app.example.com")
    );
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(config: ServerConfig) {
    let wiring = wire(Arc::new(FixtureEmployeeRepository::new()), &config);
    assert!(!wiring.health_state.is_ready(), "state should start unready");

    let _server = create_server(wiring.health_state.clone(), wiring.dispatcher, &config)
        .expect("server should bind an ephemeral port");

    assert!(
        wiring.health_state.is_ready(),
        "server creation should mark readiness"
    );
}

#[rstest]
#[actix_rt::test]
async fn fatal_request_error_stops_the_service() {
    let (signal, mut listener) = ShutdownSignal::channel();
    signal.trigger("integrity check failed");

    let cause = wait_for_shutdown(&mut listener).await;

    assert_eq!(cause, ShutdownCause::Fatal("integrity check failed".into()));
}

#[rstest]
#[case(ShutdownCause::Interrupt, "SIGINT")]
#[case(ShutdownCause::Terminate, "SIGTERM")]
#[case(ShutdownCause::Fatal("boom".into()), "fatal error: boom")]
fn shutdown_causes_render(#[case] cause: ShutdownCause, #[case] expected: &str) {
    assert_eq!(cause.to_string(), expected);
}
