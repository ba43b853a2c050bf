//! Shared fixtures: a scriptable engine, configs, and a tiny raw HTTP client.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use addrprism_core::error::{AddrPrismError, Result};
use addrprism_core::protocol::request::DecodeMode;
use addrprism_core::protocol::response::ParsedComponent;
use addrprism_core::Normalizer;
use addrprism_gateway::app_state::AppState;
use addrprism_gateway::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Ok,
    Fail,
    Panic,
}

/// How many engine calls are running right now, and the most ever seen at
/// once.
#[derive(Debug, Default)]
pub struct Overlap {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl Overlap {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Engine double: `expand` upper-cases and lower-cases the query, `parse`
/// labels the first token `house_number` and the rest `road`.
pub struct StubNormalizer {
    pub behavior: Behavior,
    pub delay: Duration,
    pub overlap: Arc<Overlap>,
}

impl StubNormalizer {
    pub fn ok() -> Self {
        Self::with(Behavior::Ok)
    }

    pub fn with(behavior: Behavior) -> Self {
        Self { behavior, delay: Duration::ZERO, overlap: Arc::default() }
    }

    pub fn slow(delay: Duration) -> Self {
        Self { delay, ..Self::ok() }
    }

    fn before(&self) -> Result<()> {
        self.overlap.enter();
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.overlap.leave();
        match self.behavior {
            Behavior::Ok => Ok(()),
            Behavior::Fail => Err(AddrPrismError::Engine("stub failure".into())),
            Behavior::Panic => panic!("stub panic"),
        }
    }
}

impl Normalizer for StubNormalizer {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn expand(&self, query: &str) -> Result<Vec<String>> {
        self.before()?;
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![query.to_lowercase(), query.to_uppercase()])
    }

    fn parse(&self, query: &str) -> Result<Vec<ParsedComponent>> {
        self.before()?;
        let mut parts = query.splitn(2, ' ');
        let mut out = Vec::new();
        if let Some(first) = parts.next().filter(|s| !s.is_empty()) {
            out.push(ParsedComponent::new("house_number", first));
        }
        if let Some(rest) = parts.next() {
            out.push(ParsedComponent::new("road", rest));
        }
        Ok(out)
    }
}

pub fn config(mode: DecodeMode) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.gateway.listen_host = "127.0.0.1".into();
    cfg.gateway.listen_port = 0;
    cfg.gateway.decode_mode = mode;
    cfg
}

pub fn state_with(cfg: AppConfig, engine: StubNormalizer) -> AppState {
    AppState::new(cfg, Arc::new(engine))
}

/// Send a raw HTTP/1.1 request with `Connection: close` and return the whole
/// response as text.
pub async fn http_request(addr: SocketAddr, method: &str, path: &str, body: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let req = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(req.as_bytes()).await.unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    String::from_utf8(buf).unwrap()
}

/// Like `http_request`, but for connections the server may cut: returns
/// whatever arrived, or the I/O error.
pub async fn http_request_lossy(
    addr: SocketAddr,
    method: &str,
    path: &str,
    body: &str,
) -> std::io::Result<Vec<u8>> {
    let mut stream = TcpStream::connect(addr).await?;
    let req = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(req.as_bytes()).await?;
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;
    Ok(buf)
}
