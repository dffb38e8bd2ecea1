use std::collections::HashSet;

use gravity_core::error::{ClientCode, GravityError, Result};
use gravity_core::protocol::RequestEnvelope;

use crate::config::AccessSection;

use super::allowlist::{compile_host_patterns, is_host_allowed, HostRule};

/// Fixed method allowlist.
pub const ALLOWED_METHODS: [&str; 2] = ["GET", "POST"];

/// Decision from policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    Reject { code: ClientCode, reason: String },
}

impl PolicyDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, PolicyDecision::Allow)
    }

    pub fn into_result(self) -> Result<()> {
        match self {
            PolicyDecision::Allow => Ok(()),
            PolicyDecision::Reject { code, reason } => Err(match code {
                ClientCode::ForbiddenHost => GravityError::ForbiddenHost(reason),
                ClientCode::ForbiddenOrigin => GravityError::ForbiddenOrigin(reason),
                ClientCode::MethodNotAllowed => GravityError::MethodNotAllowed(reason),
                other => GravityError::Internal(format!("unexpected policy code {}", other.as_str())),
            }),
        }
    }
}

/// Compiled access policy.
/// Construct once at startup, then share via Arc.
#[derive(Debug)]
pub struct AccessPolicy {
    hosts: Vec<HostRule>,
    origins: HashSet<String>,
}

impl AccessPolicy {
    pub fn new(access: &AccessSection) -> Result<Self> {
        Ok(Self {
            hosts: compile_host_patterns(&access.allowed_hosts)?,
            origins: access.allowed_origins.iter().cloned().collect(),
        })
    }

    /// Host, then origin, then method. First failure wins. Pure.
    pub fn evaluate(&self, req: &RequestEnvelope) -> PolicyDecision {
        let host = req.host().unwrap_or_default();
        if !is_host_allowed(&self.hosts, host) {
            return PolicyDecision::Reject {
                code: ClientCode::ForbiddenHost,
                reason: host.to_string(),
            };
        }

        // Same-origin requests carry no Origin header and skip this check.
        if let Some(origin) = req.origin() {
            if !self.origins.contains(origin) {
                return PolicyDecision::Reject {
                    code: ClientCode::ForbiddenOrigin,
                    reason: origin.to_string(),
                };
            }
        }

        if !ALLOWED_METHODS.contains(&req.method()) {
            return PolicyDecision::Reject {
                code: ClientCode::MethodNotAllowed,
                reason: req.method().to_string(),
            };
        }

        PolicyDecision::Allow
    }

    /// [`evaluate`](Self::evaluate) as a typed error.
    pub fn check(&self, req: &RequestEnvelope) -> Result<()> {
        self.evaluate(req).into_result()
    }
}
