//! Integration tests for the web API.
//!
//! These tests drive the router directly with `tower::ServiceExt::oneshot`,
//! no listening socket required.

#![cfg(feature = "web")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use rs_gearbox::services::{
    build_router, serve_connection, SharedGearbox, TelemetryResponse, WebServerConfig,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn create_test_app() -> (axum::Router, Arc<SharedGearbox>) {
    let gearbox = Arc::new(SharedGearbox::new());
    let config = WebServerConfig::default();
    let router = build_router(Arc::clone(&gearbox), &config);
    (router, gearbox)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn reset_returns_exact_wire_shape() {
    let (app, _gearbox) = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/reset").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(response.headers().get(header::CONNECTION).unwrap(), "close");

    let body = body_string(response).await;
    assert_eq!(body, r#"{"speed":0.0000,"gear":1}"#);
}

#[tokio::test]
async fn step_with_accelerate_advances_by_fixed_dt() {
    let (app, _gearbox) = create_test_app();

    // 25.0 * 0.06 = 1.5 km/h per request-paced step
    let response = app
        .oneshot(
            Request::builder()
                .uri("/step?accelerate=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert_eq!(body, r#"{"speed":1.5000,"gear":1}"#);
}

#[tokio::test]
async fn step_without_params_coasts_at_zero() {
    let (app, _gearbox) = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/step").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert_eq!(body, r#"{"speed":0.0000,"gear":1}"#);
}

#[tokio::test]
async fn step_accepts_all_truthy_spellings() {
    for value in ["1", "t", "T", "y", "Y", "true", "yes"] {
        let (app, gearbox) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/step?accelerate={value}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            gearbox.state().speed > 0.0,
            "accelerate={value} should be truthy"
        );
    }
}

#[tokio::test]
async fn step_treats_other_values_as_false() {
    for value in ["0", "false", "no", ""] {
        let (app, gearbox) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/step?accelerate={value}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            gearbox.state().speed,
            0.0,
            "accelerate={value} should be falsy"
        );
    }
}

#[tokio::test]
async fn brake_counteracts_accelerate() {
    let (app, gearbox) = create_test_app();

    // Build up some speed first.
    for _ in 0..5 {
        gearbox.step(true, false, 0.06);
    }
    let before = gearbox.state().speed;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/step?accelerate=0&brake=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(gearbox.state().speed < before);
}

#[tokio::test]
async fn repeated_steps_shift_up_through_gears() {
    let (app, gearbox) = create_test_app();

    // 1.5 km/h per step: the 29 km/h shift point falls at step 20.
    let mut last = TelemetryResponse { speed: 0.0, gear: 1 };
    for _ in 0..20 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/step?accelerate=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        last = serde_json::from_str(&body_string(response).await).unwrap();
    }

    assert!(last.speed >= 29.0);
    assert_eq!(last.gear, 2);
    assert_eq!(gearbox.state().gear, 2);
}

#[tokio::test]
async fn reset_clears_accumulated_state() {
    let (app, gearbox) = create_test_app();

    for _ in 0..50 {
        gearbox.step(true, false, 0.06);
    }
    assert!(gearbox.state().speed > 0.0);

    let response = app
        .oneshot(Request::builder().uri("/reset").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = body_string(response).await;
    assert_eq!(body, r#"{"speed":0.0000,"gear":1}"#);
    assert_eq!(gearbox.state().speed, 0.0);
}

#[tokio::test]
async fn unknown_route_is_404_with_empty_body() {
    let (app, _gearbox) = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/bogus").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.is_empty());
}

#[tokio::test]
async fn wrong_method_is_404_with_empty_body() {
    let (app, _gearbox) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/step?accelerate=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.is_empty());
}

#[tokio::test]
async fn missing_index_file_is_404() {
    let gearbox = Arc::new(SharedGearbox::new());
    let mut config = WebServerConfig::default();
    config.index_path = "does/not/exist.html".to_owned();
    let app = build_router(gearbox, &config);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.is_empty());
}

// ============================================================================
// Connection-level behavior (below the router)
// ============================================================================

/// Run one raw exchange against `serve_connection` and return the response
/// bytes as a string.
async fn raw_exchange(request: &[u8]) -> String {
    let (mut client, server) = tokio::io::duplex(4096);
    let (app, _gearbox) = create_test_app();
    let task = tokio::spawn(serve_connection(server, app));

    client.write_all(request).await.unwrap();
    client.shutdown().await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();
    task.await.unwrap().unwrap();

    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn malformed_request_line_gets_raw_500() {
    let response = raw_exchange(b"\x01garbage not a request line\r\n\r\n").await;
    assert!(
        response.starts_with("HTTP/1.1 500"),
        "expected 500 status line, got: {response}"
    );
    assert!(response.contains("Content-Length: 0"));
    assert!(response.contains("Connection: close"));
    assert!(response.ends_with("\r\n\r\n"), "body must be empty");
}

#[tokio::test]
async fn truncated_request_line_gets_raw_500() {
    // Partial garbage, then EOF before any line terminator.
    let response = raw_exchange(b"GARBAGE").await;
    assert!(
        response.starts_with("HTTP/1.1 500"),
        "expected 500 status line, got: {response}"
    );
}

#[tokio::test]
async fn silent_connection_is_dropped_without_response() {
    let response = raw_exchange(b"").await;
    assert!(response.is_empty());
}

#[tokio::test]
async fn well_formed_request_is_routed_normally() {
    let response =
        raw_exchange(b"GET /reset HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n").await;
    assert!(
        response.starts_with("HTTP/1.1 200"),
        "expected 200 status line, got: {response}"
    );
    assert!(response.ends_with(r#"{"speed":0.0000,"gear":1}"#));
}

#[tokio::test]
async fn well_formed_unknown_route_is_404_not_500() {
    let response =
        raw_exchange(b"GET /bogus HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n").await;
    assert!(
        response.starts_with("HTTP/1.1 404"),
        "expected 404 status line, got: {response}"
    );
}

#[tokio::test]
async fn index_serves_file_from_disk() {
    let dir = std::env::temp_dir().join("rs-gearbox-web-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("index.html");
    std::fs::write(&path, "<html><body>gearbox</body></html>").unwrap();

    let gearbox = Arc::new(SharedGearbox::new());
    let mut config = WebServerConfig::default();
    config.index_path = path.to_string_lossy().into_owned();
    let app = build_router(gearbox, &config);

    for uri in ["/", "/index.html"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        assert!(body_string(response).await.contains("gearbox"));
    }
}
