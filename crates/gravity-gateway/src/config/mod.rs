//! Gateway config loader (strict parsing).
//!
//! Layers, lowest first: defaults, optional YAML file named by
//! `GRAVITY_CONFIG`, process environment. Loaded once at startup.

pub mod schema;

use std::fs;

use gravity_core::error::{GravityError, Result};

pub use schema::{
    AccessSection, GatewayConfig, LogFormat, LoggingSection, ServerSection, UpstreamSection,
};

/// Env var naming an optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "GRAVITY_CONFIG";

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let cfg = read_yaml_file(path)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg = parse_yaml(s)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load from the real process environment.
pub fn load_from_env() -> Result<GatewayConfig> {
    load_with(|key| std::env::var(key).ok())
}

/// Load with an injected environment lookup.
pub fn load_with<F>(lookup: F) -> Result<GatewayConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = match lookup(CONFIG_PATH_ENV) {
        Some(path) => read_yaml_file(&path)?,
        None => GatewayConfig::default(),
    };

    cfg.apply_env(&lookup)?;
    cfg.validate()?;
    Ok(cfg)
}

fn read_yaml_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| GravityError::Internal(format!("read config {path} failed: {e}")))?;
    parse_yaml(&s)
}

fn parse_yaml(s: &str) -> Result<GatewayConfig> {
    serde_yaml::from_str(s).map_err(|e| GravityError::BadRequest(format!("invalid yaml: {e}")))
}
