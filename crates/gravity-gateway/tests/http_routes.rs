//! End-to-end tests through the axum router (gate + transport + dispatcher).

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use gravity_gateway::app_state::AppState;
use gravity_gateway::config::{AccessSection, GatewayConfig};
use gravity_gateway::router::build_router;

fn app_with(access: AccessSection) -> (AppState, Router) {
    let cfg = GatewayConfig {
        access,
        ..GatewayConfig::default()
    };
    let state = AppState::new(cfg).unwrap();
    (state.clone(), build_router(state))
}

fn app() -> Router {
    app_with(AccessSection::default()).1
}

fn restricted() -> AccessSection {
    AccessSection {
        allowed_hosts: vec!["api.example.com".into()],
        allowed_origins: vec!["https://app.example.com".into()],
    }
}

async fn body_json(res: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::HOST, "api.example.com")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::HOST, "api.example.com")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn healthz_over_http() {
    let res = app().oneshot(get("/healthz")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let v = body_json(res).await;
    assert_eq!(v["success"], true);
    assert_eq!(v["data"]["status"], "healthy");
    assert_eq!(v["data"]["version"], "1.0.0");
    assert_eq!(v["data"]["environment"], "development");
    assert!(v.get("error").is_none());
}

#[tokio::test]
async fn ask_over_http() {
    let res = app()
        .oneshot(post_json("/rag/ask", r#"{"query":"What is X?"}"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let v = body_json(res).await;
    assert_eq!(v["data"]["query"], "What is X?");
    assert_eq!(v["data"]["model"], "gemini-pro");
    assert!(!v["data"]["sources"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_path_returns_404_body() {
    let res = app().oneshot(post_json("/unknown/path", "{}")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let v = body_json(res).await;
    assert_eq!(v["success"], false);
    assert_eq!(v["error"], "NOT_FOUND");
    assert_eq!(v["status_code"], 404);
}

#[tokio::test]
async fn wrong_method_on_ops_path_is_not_found() {
    let res = app().oneshot(post_json("/readyz", "{}")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(res).await["error"], "NOT_FOUND");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let res = app().oneshot(post_json("/rag/embed", "{\"text\":")).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let v = body_json(res).await;
    assert_eq!(v["error"], "BAD_REQUEST");
    assert_eq!(v["status_code"], 400);
}

#[tokio::test]
async fn oversized_body_is_bad_request() {
    let mut cfg = GatewayConfig::default();
    cfg.server.max_body_bytes = 1024;
    let router = build_router(AppState::new(cfg).unwrap());

    let big = format!(r#"{{"text":"{}"}}"#, "a".repeat(4096));
    let res = router.oneshot(post_json("/rag/embed", &big)).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn forbidden_host_rejected_before_routing() {
    let (state, router) = app_with(restricted());
    let req = Request::builder()
        .uri("/healthz")
        .header(header::HOST, "evil.com")
        .body(Body::empty())
        .unwrap();
    let res = router.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["error"], "FORBIDDEN_HOST");

    assert_eq!(state.metrics().policy_rejections.get(&[("code", "FORBIDDEN_HOST")]), 1);
    assert_eq!(state.metrics().requests.get(&[("route", "health"), ("code", "OK")]), 0);
}

#[tokio::test]
async fn cross_origin_denied_by_default() {
    let req = Request::builder()
        .method("POST")
        .uri("/rag/ask")
        .header(header::HOST, "api.example.com")
        .header(header::ORIGIN, "https://app.example.com")
        .body(Body::from(r#"{"query":"q"}"#))
        .unwrap();
    let res = app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(res).await["error"], "FORBIDDEN_ORIGIN");
}

#[tokio::test]
async fn allowed_origin_is_echoed() {
    let (_, router) = app_with(restricted());
    let req = Request::builder()
        .method("POST")
        .uri("/rag/ask")
        .header(header::HOST, "api.example.com")
        .header(header::ORIGIN, "https://app.example.com")
        .body(Body::from(r#"{"query":"q"}"#))
        .unwrap();
    let res = router.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://app.example.com"
    );
    assert!(res.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());
}

#[tokio::test]
async fn disallowed_method_rejected() {
    let req = Request::builder()
        .method("DELETE")
        .uri("/rag/ask")
        .header(header::HOST, "api.example.com")
        .body(Body::empty())
        .unwrap();
    let res = app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(res).await["error"], "METHOD_NOT_ALLOWED");
}

#[tokio::test]
async fn inbound_request_id_is_reused() {
    let req = Request::builder()
        .uri("/healthz")
        .header(header::HOST, "api.example.com")
        .header("x-request-id", "req-abc-123")
        .body(Body::empty())
        .unwrap();
    let res = app().oneshot(req).await.unwrap();
    assert_eq!(res.headers().get("x-request-id").unwrap(), "req-abc-123");
}

#[tokio::test]
async fn rejected_requests_still_get_request_id() {
    let (_, router) = app_with(restricted());
    let req = Request::builder()
        .uri("/healthz")
        .header(header::HOST, "evil.com")
        .body(Body::empty())
        .unwrap();
    let res = router.oneshot(req).await.unwrap();
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn readiness_and_metrics() {
    let (state, router) = app_with(AccessSection::default());

    let res = router.clone().oneshot(get("/healthz")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = router.clone().oneshot(get("/readyz")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = router.clone().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("gravity_requests_total"));
    assert!(text.contains("route=\"health\""));

    state.metrics().set_draining();
    let res = router.oneshot(get("/readyz")).await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn non_utf8_origin_is_still_cross_origin() {
    let req = Request::builder()
        .method("POST")
        .uri("/rag/ask")
        .header(header::HOST, "api.example.com")
        .header(header::ORIGIN, HeaderValue::from_bytes(b"https://ev\xffil.com").unwrap())
        .body(Body::from(r#"{"query":"q"}"#))
        .unwrap();
    let res = app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(res).await["error"], "FORBIDDEN_ORIGIN");
}

#[tokio::test]
async fn non_utf8_host_is_rejected() {
    let (_, router) = app_with(restricted());
    let req = Request::builder()
        .uri("/healthz")
        .header(header::HOST, HeaderValue::from_bytes(b"api.example.com\xff").unwrap())
        .body(Body::empty())
        .unwrap();
    let res = router.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["error"], "FORBIDDEN_HOST");
}
