//! Normalization engine adapters.
//!
//! `basic` is always compiled; `libpostal` needs the `libpostal` cargo feature
//! and a system libpostal install with its data files.

pub mod basic;
#[cfg(feature = "libpostal")]
pub mod libpostal;

use std::sync::Arc;

use addrprism_core::error::Result;
#[cfg(not(feature = "libpostal"))]
use addrprism_core::error::AddrPrismError;
use addrprism_core::Normalizer;

use crate::config::{EngineKind, EngineSection};

pub use basic::BasicNormalizer;

/// Build the engine selected by config.
///
/// Fails when no engine is named and libpostal is not compiled in.
pub fn build(cfg: &EngineSection) -> Result<Arc<dyn Normalizer>> {
    let engine: Arc<dyn Normalizer> = match cfg.resolve()? {
        EngineKind::Basic => Arc::new(BasicNormalizer::new()),
        #[cfg(feature = "libpostal")]
        EngineKind::Libpostal => Arc::new(libpostal::LibpostalNormalizer::new()?),
        #[cfg(not(feature = "libpostal"))]
        EngineKind::Libpostal => {
            return Err(AddrPrismError::Config(
                "engine.kind=libpostal requires building with the `libpostal` feature".into(),
            ))
        }
    };
    tracing::info!(engine = engine.name(), "normalization engine ready");
    Ok(engine)
}
