use serde::Deserialize;
use gravity_core::error::{GravityError, Result};

use crate::policy::allowlist::compile_host_patterns;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub access: AccessSection,

    #[serde(default)]
    pub upstream: UpstreamSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            server: ServerSection::default(),
            access: AccessSection::default(),
            upstream: UpstreamSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.environment.trim().is_empty() {
            return Err(GravityError::BadRequest("environment must not be empty".into()));
        }

        self.server.validate()?;
        self.access.validate()?;
        self.upstream.validate()?;

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Explicit format wins; otherwise JSON in production, pretty elsewhere.
    pub fn log_format(&self) -> LogFormat {
        match self.logging.format {
            Some(f) => f,
            None if self.is_production() => LogFormat::Json,
            None => LogFormat::Pretty,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Overlay process-environment style overrides.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ENVIRONMENT") {
            self.environment = v.trim().to_string();
        }
        if let Some(v) = lookup("HOST") {
            self.server.host = v.trim().to_string();
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = parse_env("PORT", &v)?;
        }
        if let Some(v) = lookup("MAX_BODY_BYTES") {
            self.server.max_body_bytes = parse_env("MAX_BODY_BYTES", &v)?;
        }
        if let Some(v) = lookup("ALLOWED_HOSTS") {
            self.access.allowed_hosts = split_list(&v);
        }
        if let Some(v) = lookup("ALLOWED_ORIGINS") {
            self.access.allowed_origins = split_list(&v);
        }
        if let Some(v) = lookup("UPSTREAM_TIMEOUT_MS") {
            self.upstream.timeout_ms = parse_env("UPSTREAM_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = lookup("LOG_FORMAT") {
            self.logging.format = Some(match v.trim() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                other => {
                    return Err(GravityError::BadRequest(format!(
                        "LOG_FORMAT must be json or pretty, got {other}"
                    )))
                }
            });
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| GravityError::BadRequest(format!("{key} has invalid value: {raw}")))
}

/// Comma-separated list; blank entries dropped.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(GravityError::BadRequest("server.port must be non-zero".into()));
        }
        if !(1024..=16 * 1024 * 1024).contains(&self.max_body_bytes) {
            return Err(GravityError::BadRequest(
                "server.max_body_bytes must be between 1024 and 16777216".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessSection {
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,

    /// Exact origins; empty denies every cross-origin request.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for AccessSection {
    fn default() -> Self {
        Self {
            allowed_hosts: default_allowed_hosts(),
            allowed_origins: Vec::new(),
        }
    }
}

impl AccessSection {
    pub fn validate(&self) -> Result<()> {
        compile_host_patterns(&self.allowed_hosts)?;
        for o in &self.allowed_origins {
            if o.trim().is_empty() || o.ends_with('/') {
                return Err(GravityError::BadRequest(format!(
                    "invalid allowed origin: {o:?} (expected scheme://host[:port])"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamSection {
    #[serde(default = "default_upstream_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            timeout_ms: default_upstream_timeout_ms(),
        }
    }
}

impl UpstreamSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=60000).contains(&self.timeout_ms) {
            return Err(GravityError::BadRequest(
                "upstream.timeout_ms must be between 100 and 60000".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    #[serde(default)]
    pub format: Option<LogFormat>,
}

fn default_environment() -> String {
    "development".into()
}
fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8000
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}
fn default_allowed_hosts() -> Vec<String> {
    vec!["*".into()]
}
fn default_upstream_timeout_ms() -> u64 {
    5000
}
