use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use addrprism_core::error::{AddrPrismError, Result};
use addrprism_core::protocol::request::DecodeMode;

/// Selects the engine without a config file (`basic` or `libpostal`).
pub const ENGINE_ENV: &str = "ADDRPRISM_ENGINE";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub engine: EngineSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
            engine: EngineSection::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(AddrPrismError::UnsupportedVersion);
        }

        self.gateway.validate()?;

        Ok(())
    }

    /// Overlay process environment on top of file/default values.
    ///
    /// Empty variables count as unset, so `LISTEN_PORT=` keeps the configured port.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |k: &str| lookup(k).filter(|v| !v.is_empty());

        if let Some(host) = var("LISTEN_HOST") {
            self.gateway.listen_host = host;
        }
        if let Some(port) = var("LISTEN_PORT") {
            self.gateway.listen_port = port.parse().map_err(|e| {
                AddrPrismError::Config(format!("LISTEN_PORT must be a port number ({port}): {e}"))
            })?;
        }

        let cert = var("SSL_CERT_FILE");
        let key = var("SSL_KEY_FILE");
        if cert.is_some() || key.is_some() {
            let tls = self.gateway.tls.get_or_insert_with(TlsSection::default);
            if let Some(cert) = cert {
                tls.cert_file = cert;
            }
            if let Some(key) = key {
                tls.key_file = key;
            }
        }

        if let Some(name) = var(ENGINE_ENV) {
            self.engine.kind = Some(EngineKind::from_name(&name).ok_or_else(|| {
                AddrPrismError::Config(format!("{ENGINE_ENV} must be basic or libpostal ({name})"))
            })?);
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen_host")]
    pub listen_host: String,

    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    #[serde(default)]
    pub tls: Option<TlsSection>,

    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,

    #[serde(default)]
    pub decode_mode: DecodeMode,

    /// Unset means request bodies are read without a size limit.
    #[serde(default)]
    pub max_body_bytes: Option<usize>,

    /// Unset means engine calls are not bounded.
    #[serde(default)]
    pub max_concurrent_normalize: Option<usize>,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen_host: default_listen_host(),
            listen_port: default_listen_port(),
            tls: None,
            shutdown_grace_ms: default_shutdown_grace_ms(),
            decode_mode: DecodeMode::default(),
            max_body_bytes: None,
            max_concurrent_normalize: None,
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if self.listen_host.trim().is_empty() {
            return Err(AddrPrismError::Config(
                "gateway.listen_host must not be empty".into(),
            ));
        }
        if !(1000..=120000).contains(&self.shutdown_grace_ms) {
            return Err(AddrPrismError::Config(
                "gateway.shutdown_grace_ms must be between 1000 and 120000".into(),
            ));
        }
        if self.max_body_bytes == Some(0) {
            return Err(AddrPrismError::Config(
                "gateway.max_body_bytes must be greater than 0".into(),
            ));
        }
        if self.max_concurrent_normalize == Some(0) {
            return Err(AddrPrismError::Config(
                "gateway.max_concurrent_normalize must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// `host:port` as written in config, for logs.
    pub fn listen_spec(&self) -> String {
        if self.listen_host.contains(':') {
            format!("[{}]:{}", self.listen_host, self.listen_port)
        } else {
            format!("{}:{}", self.listen_host, self.listen_port)
        }
    }

    /// Resolve the listen address (host may be a name, e.g. `localhost`).
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        (self.listen_host.as_str(), self.listen_port)
            .to_socket_addrs()
            .map_err(|e| {
                AddrPrismError::Config(format!("cannot resolve {}: {e}", self.listen_spec()))
            })?
            .next()
            .ok_or_else(|| {
                AddrPrismError::Config(format!("{} resolved to no address", self.listen_spec()))
            })
    }

    /// Certificate and key paths, only when both are set.
    pub fn tls_paths(&self) -> Option<(PathBuf, PathBuf)> {
        let tls = self.tls.as_ref()?;
        if tls.cert_file.is_empty() || tls.key_file.is_empty() {
            return None;
        }
        Some((PathBuf::from(&tls.cert_file), PathBuf::from(&tls.key_file)))
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TlsSection {
    #[serde(default)]
    pub cert_file: String,
    #[serde(default)]
    pub key_file: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Basic,
    Libpostal,
}

impl EngineKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "basic" => Some(EngineKind::Basic),
            "libpostal" => Some(EngineKind::Libpostal),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    /// Unset picks libpostal when it is compiled in. The `basic` stand-in is
    /// never chosen implicitly.
    #[serde(default)]
    pub kind: Option<EngineKind>,
}

impl EngineSection {
    pub fn resolve(&self) -> Result<EngineKind> {
        match self.kind {
            Some(kind) => Ok(kind),
            None if cfg!(feature = "libpostal") => Ok(EngineKind::Libpostal),
            None => Err(AddrPrismError::Config(
                "no address engine compiled in: build with the `libpostal` feature, \
                 or set engine.kind: basic (ADDRPRISM_ENGINE=basic) to serve the \
                 case-folding stand-in"
                    .into(),
            )),
        }
    }
}

fn default_listen_host() -> String {
    "0.0.0.0".into()
}
fn default_listen_port() -> u16 {
    8080
}
fn default_shutdown_grace_ms() -> u64 {
    10000
}
