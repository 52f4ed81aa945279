// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Delegated login tests against a fake identity provider.

use axum::http::{header, Request, StatusCode};
use axum::body::Body;
use chrono::{Duration, TimeZone, Utc};
use denticompare::config::Config;
use denticompare::db::Db;
use denticompare::error::AppError;
use denticompare::models::User;
use denticompare::services::{IdentityClient, IdentityService};
use denticompare::time_utils::parse_stored_timestamp;
use serde_json::json;
use tower::ServiceExt;
use wiremock::{
    matchers::{header as header_is, method, path},
    Mock, MockServer, ResponseTemplate,
};

mod common;
use common::{create_test_app_with, json_body, post_json, set_cookie};

const PROVIDER_PATH: &str = "/auth/v1/env/oauth/session-data";

fn identity_service(server: &MockServer, timeout: std::time::Duration) -> (IdentityService, Db) {
    let db = Db::in_memory();
    let client = IdentityClient::new(format!("{}{}", server.uri(), PROVIDER_PATH), timeout).unwrap();
    (IdentityService::new(client, db.clone()), db)
}

async fn provider_returns(server: &MockServer, session_id: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(PROVIDER_PATH))
        .and(header_is("X-Session-ID", session_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_new_user_created_with_seven_day_session() {
    let server = MockServer::start().await;
    provider_returns(
        &server,
        "ext-123",
        json!({ "email": "maria@example.com", "name": "María", "picture": "https://img/p.png" }),
    )
    .await;
    let (service, db) = identity_service(&server, std::time::Duration::from_secs(2));

    let now = Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap();
    let login = service.exchange_at("ext-123", now).await.unwrap();

    assert!(login.user.user_id.starts_with("user_"));
    assert_eq!(login.user.email, "maria@example.com");
    assert_eq!(login.user.picture.as_deref(), Some("https://img/p.png"));
    assert!(login.user.password_hash.is_none());
    assert!(login.session_token.starts_with("session_"));
    assert_eq!(login.session_token.len(), "session_".len() + 32);

    let stored = db.get_session(&login.session_token).await.unwrap().unwrap();
    assert_eq!(stored.user_id, login.user.user_id);
    assert_eq!(
        parse_stored_timestamp(&stored.expires_at).unwrap(),
        now + Duration::days(7)
    );
}

#[tokio::test]
async fn test_existing_user_profile_refreshed() {
    let server = MockServer::start().await;
    provider_returns(
        &server,
        "ext-456",
        json!({ "email": "pw@example.com", "name": "New Name", "picture": "https://img/new.png" }),
    )
    .await;
    let (service, db) = identity_service(&server, std::time::Duration::from_secs(2));

    db.upsert_user(&User {
        user_id: "user_aaaaaaaaaaaa".to_string(),
        email: "pw@example.com".to_string(),
        name: "Old Name".to_string(),
        picture: None,
        password_hash: Some("$argon2id$kept".to_string()),
        created_at: "2026-01-01T00:00:00Z".to_string(),
    })
    .await
    .unwrap();

    let login = service.exchange("ext-456").await.unwrap();
    assert_eq!(login.user.user_id, "user_aaaaaaaaaaaa");

    let stored = db.get_user("user_aaaaaaaaaaaa").await.unwrap().unwrap();
    assert_eq!(stored.name, "New Name");
    assert_eq!(stored.picture.as_deref(), Some("https://img/new.png"));
    assert_eq!(stored.password_hash.as_deref(), Some("$argon2id$kept"));
}

#[tokio::test]
async fn test_provider_session_token_is_used() {
    let server = MockServer::start().await;
    provider_returns(
        &server,
        "ext-789",
        json!({ "email": "t@example.com", "name": "T", "session_token": "provider-token-1" }),
    )
    .await;
    let (service, db) = identity_service(&server, std::time::Duration::from_secs(2));

    let login = service.exchange("ext-789").await.unwrap();
    assert_eq!(login.session_token, "provider-token-1");
    assert!(db.get_session("provider-token-1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_provider_rejection_is_external_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROVIDER_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad session"))
        .mount(&server)
        .await;
    let (service, _) = identity_service(&server, std::time::Duration::from_secs(2));

    let err = service.exchange("ext-bad").await.unwrap_err();
    assert!(matches!(err, AppError::ExternalAuth(_)));
}

#[tokio::test]
async fn test_unreadable_provider_body_is_external_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROVIDER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    let (service, _) = identity_service(&server, std::time::Duration::from_secs(2));

    assert!(matches!(
        service.exchange("ext-html").await,
        Err(AppError::ExternalAuth(_))
    ));
}

#[tokio::test]
async fn test_provider_timeout_is_external_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROVIDER_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "email": "slow@example.com", "name": "Slow" }))
                .set_delay(std::time::Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    let (service, db) = identity_service(&server, std::time::Duration::from_millis(200));

    assert!(matches!(
        service.exchange("ext-slow").await,
        Err(AppError::ExternalAuth(_))
    ));
    assert!(db.find_user_by_email("slow@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_empty_session_id_rejected_without_calling_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let (service, _) = identity_service(&server, std::time::Duration::from_secs(2));

    for id in ["", "   "] {
        assert!(matches!(
            service.exchange(id).await,
            Err(AppError::BadRequest(_))
        ));
    }
}

#[tokio::test]
async fn test_session_route_sets_cookie_and_authenticates() {
    let server = MockServer::start().await;
    provider_returns(
        &server,
        "ext-route",
        json!({ "email": "route@example.com", "name": "Route" }),
    )
    .await;

    let config = Config {
        identity_provider_url: format!("{}{}", server.uri(), PROVIDER_PATH),
        ..Config::default()
    };
    let (app, _) = create_test_app_with(config);

    let response = app
        .clone()
        .oneshot(post_json("/api/auth/session", json!({ "session_id": "ext-route" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response).expect("credential cookie");
    let body = json_body(response).await;
    let token = body["token"].as_str().unwrap().to_string();
    assert!(cookie.starts_with(&format!("session_token={}", token)));
    assert_eq!(body["email"], "route@example.com");

    let me = Request::builder()
        .uri("/api/auth/me")
        .header(header::COOKIE, format!("session_token={}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(me).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["email"], "route@example.com");
}

#[tokio::test]
async fn test_session_route_provider_failure_is_401() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = Config {
        identity_provider_url: format!("{}{}", server.uri(), PROVIDER_PATH),
        ..Config::default()
    };
    let (app, _) = create_test_app_with(config);

    let response = app
        .oneshot(post_json("/api/auth/session", json!({ "session_id": "ext-x" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "external_auth_failed" })
    );
}
