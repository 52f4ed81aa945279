// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CORS and response header tests.

use axum::body::Body;
use axum::http::{header, Request};
use denticompare::config::Config;
use tower::ServiceExt;

mod common;
use common::create_test_app_with;

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri("/api/compare")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_configured_origin_allowed_with_credentials() {
    let (app, _) = create_test_app_with(Config::default());

    let response = app.oneshot(preflight("http://localhost:3000")).await.unwrap();
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_unlisted_origin_not_allowed() {
    let (app, _) = create_test_app_with(Config::default());

    let response = app.oneshot(preflight("https://evil.example")).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_wildcard_mirrors_request_origin() {
    let config = Config {
        cors_origins: vec!["*".to_string()],
        ..Config::default()
    };
    let (app, _) = create_test_app_with(config);

    let response = app.oneshot(preflight("https://clinic-app.example")).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "https://clinic-app.example"
    );
}

#[tokio::test]
async fn test_security_headers_on_api_responses() {
    let (app, _) = create_test_app_with(Config::default());

    let response = app.oneshot(common::get("/api/health")).await.unwrap();
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
}
