//! Service config loader.
//!
//! Defaults, then an optional strict YAML file (`ADDRPRISM_CONFIG`), then the
//! `LISTEN_*` / `SSL_*` environment variables.

pub mod schema;

use std::fs;

use addrprism_core::error::{AddrPrismError, Result};

pub use schema::{AppConfig, ENGINE_ENV, EngineKind, EngineSection, GatewaySection, TlsSection};

/// Environment variable naming the optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "ADDRPRISM_CONFIG";

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| AddrPrismError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    let cfg: AppConfig = serde_yaml::from_str(s)
        .map_err(|e| AddrPrismError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load config from the process environment.
pub fn load() -> Result<AppConfig> {
    load_with(|k| std::env::var(k).ok())
}

/// Load config using `lookup` in place of the process environment.
pub fn load_with<F>(lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = match lookup(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        Some(path) => {
            tracing::info!(%path, "loading config file");
            load_from_file(&path)?
        }
        None => AppConfig::default(),
    };
    cfg.apply_env(lookup)?;
    cfg.validate()?;
    Ok(cfg)
}
