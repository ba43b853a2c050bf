//! Address service: the bridge between async handlers and the synchronous
//! engine.
//!
//! Engine calls run on the blocking pool. Queries are cut at the first NUL
//! before they reach the engine, which sees them as C strings.

use std::sync::Arc;

use tokio::sync::Semaphore;

use addrprism_core::error::{AddrPrismError, Result};
use addrprism_core::protocol::response::ParsedComponent;
use addrprism_core::Normalizer;

use crate::obs::GatewayMetrics;

/// Runs engine calls on the blocking pool, optionally bounded by a semaphore.
#[derive(Clone)]
pub struct AddressService {
    engine: Arc<dyn Normalizer>,
    permits: Option<Arc<Semaphore>>,
    metrics: Arc<GatewayMetrics>,
}

impl AddressService {
    pub fn new(
        engine: Arc<dyn Normalizer>,
        max_concurrent: Option<usize>,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self {
            engine,
            permits: max_concurrent.map(|n| Arc::new(Semaphore::new(n))),
            metrics,
        }
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    pub async fn expand(&self, query: String) -> Result<Vec<String>> {
        let query = until_nul(query);
        self.run("expand", move |engine| engine.expand(&query)).await
    }

    pub async fn parse(&self, query: String) -> Result<Vec<ParsedComponent>> {
        let query = until_nul(query);
        self.run("parse", move |engine| engine.parse(&query)).await
    }

    async fn run<T, F>(&self, op: &'static str, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn Normalizer) -> Result<T> + Send + 'static,
    {
        // Permit is owned by the blocking task: released when the engine
        // returns, not when the request future is dropped.
        let permit = match &self.permits {
            Some(sem) => Some(
                Arc::clone(sem)
                    .acquire_owned()
                    .await
                    .map_err(|_| AddrPrismError::Internal("normalize permits closed".into()))?,
            ),
            None => None,
        };

        let engine = Arc::clone(&self.engine);
        let joined = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            f(engine.as_ref())
        })
        .await;

        match joined {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) => {
                self.metrics.engine_errors.inc(&[("op", op)]);
                tracing::warn!(op, engine = self.engine.name(), error = %e, "engine call failed");
                Err(e)
            }
            Err(e) => {
                self.metrics.engine_errors.inc(&[("op", op)]);
                tracing::error!(op, engine = self.engine.name(), error = %e, "engine task aborted");
                Err(AddrPrismError::Internal(format!("{op} worker failed: {e}")))
            }
        }
    }
}

/// Everything before the first `'\0'`.
fn until_nul(mut query: String) -> String {
    if let Some(at) = query.find('\0') {
        query.truncate(at);
    }
    query
}

#[cfg(test)]
mod tests {
    use super::until_nul;

    #[test]
    fn query_is_cut_at_first_nul() {
        assert_eq!(until_nul("a\0b\0c".into()), "a");
        assert_eq!(until_nul("\0tail".into()), "");
        assert_eq!(until_nul("no nul here".into()), "no nul here");
    }
}
