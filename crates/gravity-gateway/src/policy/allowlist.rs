//! Allowlist compilation and matching utilities.
//!
//! Host patterns: `*` (any host), `*.example.com` (any subdomain, not the
//! apex), or an exact host name. Matching is case-insensitive and ignores
//! the port.

use gravity_core::error::{GravityError, Result};

/// Compiled host rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRule {
    Any,
    Exact(String),
    /// Stored with the leading dot, e.g. `.example.com`.
    Subdomain(String),
}

pub fn compile_host_patterns(raw: &[String]) -> Result<Vec<HostRule>> {
    let mut out = Vec::with_capacity(raw.len());
    for s in raw {
        let p = s.trim().to_ascii_lowercase();
        let rule = if p == "*" {
            HostRule::Any
        } else if let Some(rest) = p.strip_prefix("*.") {
            if rest.is_empty() || rest.contains('*') {
                return Err(GravityError::BadRequest(format!(
                    "invalid allowed_hosts entry: {s} (expected *.domain)"
                )));
            }
            HostRule::Subdomain(format!(".{rest}"))
        } else {
            if p.is_empty() || p.contains('*') {
                return Err(GravityError::BadRequest(format!(
                    "invalid allowed_hosts entry: {s:?} (wildcard only as * or leading *.)"
                )));
            }
            HostRule::Exact(p)
        };
        out.push(rule);
    }
    Ok(out)
}

/// Lowercase and drop the port. Bracketed IPv6 literals keep their brackets.
pub fn normalize_host(raw: &str) -> String {
    let raw = raw.trim();
    let host = if raw.starts_with('[') {
        match raw.find(']') {
            Some(end) => &raw[..=end],
            None => raw,
        }
    } else {
        raw.split(':').next().unwrap_or_default()
    };
    host.to_ascii_lowercase()
}

pub fn is_host_allowed(rules: &[HostRule], host: &str) -> bool {
    let host = normalize_host(host);
    rules.iter().any(|r| match r {
        HostRule::Any => true,
        HostRule::Exact(h) => *h == host,
        HostRule::Subdomain(suffix) => host.ends_with(suffix.as_str()),
    })
}
