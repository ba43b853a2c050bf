//! Server lifecycle: bind (plain or TLS), serve, bounded graceful shutdown.
//!
//! `Stopped -> Starting -> Serving -> ShuttingDown -> Stopped`
//!
//! The listener runs on its own task behind an `axum_server::Handle`; the
//! caller keeps a `RunningServer` and decides when to stop it.

pub mod signal;

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tokio::task::{JoinError, JoinHandle};

use addrprism_core::error::{AddrPrismError, Result};

use crate::app_state::AppState;
use crate::router;

pub use signal::shutdown_signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    Stopped = 0,
    Starting = 1,
    Serving = 2,
    ShuttingDown = 3,
}

impl LifecycleState {
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => LifecycleState::Starting,
            2 => LifecycleState::Serving,
            3 => LifecycleState::ShuttingDown,
            _ => LifecycleState::Stopped,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

type ServeTask = JoinHandle<io::Result<()>>;

fn io_context(e: io::Error, what: String) -> AddrPrismError {
    AddrPrismError::Io(io::Error::new(e.kind(), format!("{what}: {e}")))
}

/// Run `fut` to completion on a fresh multi-threaded runtime, then tear the
/// runtime down.
///
/// Engine calls run on the blocking pool and cannot be cancelled, so teardown
/// waits at most `grace` for them before returning anyway.
pub fn block_on_bounded<F, T>(grace: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_context(e, "build tokio runtime".into()))?;

    let out = rt.block_on(fut);

    let started = Instant::now();
    rt.shutdown_timeout(grace);
    if started.elapsed() >= grace {
        tracing::warn!(
            grace_ms = grace.as_millis() as u64,
            "blocking engine calls still running at exit, abandoned"
        );
    }
    out
}

fn serve_exit_error(res: std::result::Result<io::Result<()>, JoinError>) -> AddrPrismError {
    match res {
        Ok(Ok(())) => AddrPrismError::Internal("server exited unexpectedly".into()),
        Ok(Err(e)) => AddrPrismError::Io(e),
        Err(e) => AddrPrismError::Internal(format!("serve task failed: {e}")),
    }
}

pub struct Server {
    addr: SocketAddr,
    tls: Option<(PathBuf, PathBuf)>,
    grace: Duration,
    state: AppState,
}

impl Server {
    pub fn new(state: AppState) -> Result<Self> {
        let gw = &state.cfg().gateway;
        let addr = gw.socket_addr()?;
        let tls = gw.tls_paths();
        if tls.is_none() && gw.tls.is_some() {
            tracing::warn!("tls needs both cert_file and key_file, serving plaintext");
        }
        let grace = gw.shutdown_grace();

        Ok(Self { addr, tls, grace, state })
    }

    /// Bind and start serving. Errors if the listener cannot be bound or the
    /// TLS material cannot be loaded.
    pub async fn start(self) -> Result<RunningServer> {
        let Server { addr, tls, grace, state } = self;
        state.set_lifecycle(LifecycleState::Starting);

        let app = router::build_router(state.clone()).into_make_service();
        let handle = Handle::new();

        let (scheme, task): (Scheme, ServeTask) = match tls {
            Some((cert, key)) => {
                let tls_cfg = match RustlsConfig::from_pem_file(&cert, &key).await {
                    Ok(c) => c,
                    Err(e) => {
                        state.set_lifecycle(LifecycleState::Stopped);
                        return Err(io_context(
                            e,
                            format!("load tls material ({}, {})", cert.display(), key.display()),
                        ));
                    }
                };
                let server = axum_server::bind_rustls(addr, tls_cfg).handle(handle.clone());
                (Scheme::Https, tokio::spawn(async move { server.serve(app).await }))
            }
            None => {
                let server = axum_server::bind(addr).handle(handle.clone());
                (Scheme::Http, tokio::spawn(async move { server.serve(app).await }))
            }
        };

        let Some(local_addr) = handle.listening().await else {
            state.set_lifecycle(LifecycleState::Stopped);
            return Err(match task.await {
                Ok(Err(e)) => io_context(e, format!("bind {addr}")),
                other => serve_exit_error(other),
            });
        };

        state.set_lifecycle(LifecycleState::Serving);
        tracing::info!(
            addr = %local_addr,
            engine = state.address().engine_name(),
            "listening on {}://{}",
            scheme.as_str(),
            local_addr
        );

        Ok(RunningServer {
            local_addr,
            scheme,
            handle,
            task,
            grace,
            state,
        })
    }
}

pub struct RunningServer {
    local_addr: SocketAddr,
    scheme: Scheme,
    handle: Handle,
    task: ServeTask,
    grace: Duration,
    state: AppState,
}

impl RunningServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Serve until `signal` resolves, then shut down gracefully.
    ///
    /// If the listener dies first, that is reported as an error.
    pub async fn run_until<F>(mut self, signal: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let exited = tokio::select! {
            _ = signal => None,
            res = &mut self.task => Some(res),
        };

        match exited {
            None => self.shutdown().await,
            Some(res) => {
                self.state.set_lifecycle(LifecycleState::Stopped);
                let err = serve_exit_error(res);
                tracing::error!(error = %err, "server stopped serving");
                Err(err)
            }
        }
    }

    /// Stop accepting, give in-flight requests up to the grace period, then
    /// close whatever is left.
    pub async fn shutdown(self) -> Result<()> {
        self.state.set_lifecycle(LifecycleState::ShuttingDown);
        tracing::info!(
            grace_ms = self.grace.as_millis() as u64,
            open_connections = self.handle.connection_count(),
            "shutting down the server"
        );

        let started = Instant::now();
        self.handle.graceful_shutdown(Some(self.grace));
        let res = self.task.await;

        if started.elapsed() >= self.grace {
            tracing::warn!(
                grace_ms = self.grace.as_millis() as u64,
                "grace period elapsed, remaining connections closed"
            );
        }
        self.state.set_lifecycle(LifecycleState::Stopped);

        match res {
            Ok(Ok(())) => {
                tracing::info!("server stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(AddrPrismError::Io(e)),
            Err(e) => Err(AddrPrismError::Internal(format!("serve task failed: {e}"))),
        }
    }
}
