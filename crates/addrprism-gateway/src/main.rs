//! addrPrism gateway
//!
//! - POST /expand, POST /parser : address normalization (JSON)
//! - GET /health, GET /metrics  : operations
//! - Plain or TLS listener, graceful shutdown on SIGINT/SIGTERM

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use addrprism_core::error::Result;
use addrprism_gateway::{app_state::AppState, config, config::AppConfig, engine, server};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let res = config::load().and_then(|cfg| {
        // Runtime teardown gets the listener's grace period too.
        let grace = cfg.gateway.shutdown_grace();
        server::block_on_bounded(grace, run(cfg))
    });

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, code = e.client_code().as_str(), "addrprism-gateway failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: AppConfig) -> Result<()> {
    let engine = engine::build(&cfg.engine)?;

    let state = AppState::new(cfg, engine);
    let running = server::Server::new(state)?.start().await?;

    running.run_until(server::shutdown_signal()).await
}
