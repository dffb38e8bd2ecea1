#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use gravity_core::error::ClientCode;
use gravity_core::protocol::RequestEnvelope;
use gravity_gateway::config::AccessSection;
use gravity_gateway::policy::{AccessPolicy, PolicyDecision};

fn policy(hosts: &[&str], origins: &[&str]) -> AccessPolicy {
    AccessPolicy::new(&AccessSection {
        allowed_hosts: hosts.iter().map(|s| s.to_string()).collect(),
        allowed_origins: origins.iter().map(|s| s.to_string()).collect(),
    })
    .unwrap()
}

fn rejected_with(d: PolicyDecision) -> ClientCode {
    match d {
        PolicyDecision::Reject { code, .. } => code,
        PolicyDecision::Allow => panic!("expected rejection"),
    }
}

#[test]
fn unlisted_host_rejected_without_wildcard() {
    let p = policy(&["api.example.com", "*.internal.example.com"], &[]);
    for host in ["evil.com", "example.com", "api.example.com.evil.com", ""] {
        let req = RequestEnvelope::new("GET", "/healthz").with_header("Host", host);
        assert_eq!(rejected_with(p.evaluate(&req)), ClientCode::ForbiddenHost, "{host}");
    }

    let no_host = RequestEnvelope::new("GET", "/healthz");
    assert_eq!(rejected_with(p.evaluate(&no_host)), ClientCode::ForbiddenHost);
}

#[test]
fn listed_hosts_pass() {
    let p = policy(&["api.example.com", "*.internal.example.com"], &[]);
    for host in ["api.example.com", "API.EXAMPLE.COM:443", "svc.internal.example.com"] {
        let req = RequestEnvelope::new("POST", "/rag/ask").with_header("host", host);
        assert!(p.evaluate(&req).is_allow(), "{host}");
    }
}

#[test]
fn wildcard_host_accepts_anything() {
    let p = policy(&["*"], &[]);
    let req = RequestEnvelope::new("GET", "/healthz").with_header("host", "whatever.invalid");
    assert_eq!(p.evaluate(&req), PolicyDecision::Allow);
}

#[test]
fn cross_origin_denied_when_no_origins_configured() {
    let p = policy(&["*"], &[]);
    for origin in ["https://app.example.com", "null", "http://localhost:3000"] {
        let req = RequestEnvelope::new("POST", "/rag/ask")
            .with_header("host", "api.example.com")
            .with_header("Origin", origin);
        assert_eq!(rejected_with(p.evaluate(&req)), ClientCode::ForbiddenOrigin, "{origin}");
    }
}

#[test]
fn same_origin_never_rejected_by_origin_check() {
    for origins in [&[][..], &["https://app.example.com"][..]] {
        let p = policy(&["*"], origins);
        let req = RequestEnvelope::new("GET", "/healthz").with_header("host", "api.example.com");
        assert!(p.evaluate(&req).is_allow());
    }
}

#[test]
fn origin_match_is_exact() {
    let p = policy(&["*"], &["https://app.example.com"]);
    let ok = RequestEnvelope::new("POST", "/rag/embed")
        .with_header("host", "api.example.com")
        .with_header("origin", "https://app.example.com");
    assert!(p.evaluate(&ok).is_allow());

    for origin in ["http://app.example.com", "https://app.example.com:8443", "https://APP.example.com"] {
        let req = RequestEnvelope::new("POST", "/rag/embed")
            .with_header("host", "api.example.com")
            .with_header("origin", origin);
        assert_eq!(rejected_with(p.evaluate(&req)), ClientCode::ForbiddenOrigin, "{origin}");
    }
}

#[test]
fn only_get_and_post_allowed() {
    let p = policy(&["*"], &[]);
    for method in ["PUT", "DELETE", "PATCH", "OPTIONS", "HEAD"] {
        let req = RequestEnvelope::new(method, "/rag/ask").with_header("host", "a");
        assert_eq!(rejected_with(p.evaluate(&req)), ClientCode::MethodNotAllowed, "{method}");
    }
}

#[test]
fn host_checked_before_origin_and_method() {
    let p = policy(&["api.example.com"], &[]);
    let req = RequestEnvelope::new("DELETE", "/x")
        .with_header("host", "evil.com")
        .with_header("origin", "https://evil.com");
    assert_eq!(rejected_with(p.evaluate(&req)), ClientCode::ForbiddenHost);

    let req = RequestEnvelope::new("DELETE", "/x")
        .with_header("host", "api.example.com")
        .with_header("origin", "https://evil.com");
    assert_eq!(rejected_with(p.evaluate(&req)), ClientCode::ForbiddenOrigin);
}

#[test]
fn check_maps_to_typed_errors() {
    let p = policy(&["api.example.com"], &[]);
    let req = RequestEnvelope::new("GET", "/healthz").with_header("host", "evil.com");
    let err = p.check(&req).unwrap_err();
    assert_eq!(err.client_code().as_str(), "FORBIDDEN_HOST");
    assert_eq!(err.client_code().http_status(), 400);
}
