//! Lightweight in-process observability.
//!
//! Metrics are stored as atomics, recorded through `RequestTimer` guards and
//! rendered by the `/metrics` handler.

pub mod metrics;
pub mod timer;

pub use metrics::GatewayMetrics;
pub use timer::RequestTimer;
