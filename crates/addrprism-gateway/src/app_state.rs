//! Shared application state for the addrPrism gateway.
//!
//! Owns the metrics registry and the engine service; cloned into every
//! handler through axum's `State` extractor.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use addrprism_core::protocol::request::DecodeMode;
use addrprism_core::Normalizer;

use crate::config::AppConfig;
use crate::obs::GatewayMetrics;
use crate::server::LifecycleState;
use crate::services::AddressService;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<GatewayMetrics>,
    address: AddressService,
}

struct AppStateInner {
    cfg: AppConfig,
    lifecycle: AtomicU8,
}

impl AppState {
    pub fn new(cfg: AppConfig, engine: Arc<dyn Normalizer>) -> Self {
        let metrics = Arc::new(GatewayMetrics::new());
        let address = AddressService::new(
            engine,
            cfg.gateway.max_concurrent_normalize,
            Arc::clone(&metrics),
        );

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                lifecycle: AtomicU8::new(LifecycleState::Stopped as u8),
            }),
            metrics,
            address,
        }
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn decode_mode(&self) -> DecodeMode {
        self.inner.cfg.gateway.decode_mode
    }

    pub fn max_body_bytes(&self) -> Option<usize> {
        self.inner.cfg.gateway.max_body_bytes
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn address(&self) -> &AddressService {
        &self.address
    }

    pub fn lifecycle(&self) -> LifecycleState {
        LifecycleState::from_u8(self.inner.lifecycle.load(Ordering::Acquire))
    }

    pub fn set_lifecycle(&self, next: LifecycleState) {
        let prev = LifecycleState::from_u8(self.inner.lifecycle.swap(next as u8, Ordering::AcqRel));
        if next == LifecycleState::ShuttingDown {
            self.metrics.set_draining();
        }
        tracing::info!(from = ?prev, to = ?next, "lifecycle");
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }
}
