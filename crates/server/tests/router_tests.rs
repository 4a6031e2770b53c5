//! The assembled router: middleware order, auth guard and JSON wiring.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use common::{test_state, TEST_PASSWORD};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use server::create_app_router;
use tower::ServiceExt;

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    }
    else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, request_id, body)
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_is_public_and_tagged() {
    let app = create_app_router(test_state().await);

    let (status, request_id, body) = send(&app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(request_id.is_some());
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_protected_routes_need_a_token() {
    let app = create_app_router(test_state().await);

    let (status, request_id, _) = send(&app, get("/api/v1/users/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(request_id.is_some(), "rejections still carry a request id");

    let (status, ..) = send(&app, get("/api/v1/organisations", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = create_app_router(test_state().await);

    let (status, _, user) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            json!({
                "email": "anna@example.com",
                "password": TEST_PASSWORD,
                "first_name": "Anna",
                "last_name": "Smith",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["full_name"], "Anna Smith");

    let (status, _, login) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({ "email": "anna@example.com", "password": TEST_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = login["access_token"].as_str().unwrap().to_string();

    let (status, _, me) = send(&app, get("/api/v1/users/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "anna@example.com");

    let (status, _, organisation) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/organisations",
            Some(&token),
            json!({ "name": "Call Centre" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(organisation["can_manage"], true);

    let (status, _, statuses) = send(&app, get("/api/v1/breaks/statuses/replacements", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(statuses.as_array().unwrap().iter().any(|s| s["code"] == "online"));
}

#[tokio::test]
async fn test_malformed_json_is_a_client_error() {
    let app = create_app_router(test_state().await);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, ..) = send(&app, request).await;
    assert!(status.is_client_error());
}
