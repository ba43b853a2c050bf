//! Normalization engine seam.
//!
//! The gateway never looks inside an engine: it hands over the raw query and
//! serializes whatever comes back. Engines are synchronous and may be CPU
//! heavy, so callers are expected to run them off the async executor.

use crate::error::Result;
use crate::protocol::response::ParsedComponent;

/// An address normalization engine (e.g. libpostal).
///
/// Implementations must be stateless from the caller's point of view and safe
/// to call from many threads at once.
pub trait Normalizer: Send + Sync {
    /// Short engine name, used in logs and metric labels.
    fn name(&self) -> &'static str;

    /// All normalized string variants of `query`, in engine order.
    fn expand(&self, query: &str) -> Result<Vec<String>>;

    /// Ordered `(label, value)` components of `query`.
    fn parse(&self, query: &str) -> Result<Vec<ParsedComponent>>;
}
