//! Scoped request instrumentation.
//!
//! `RequestTimer` is created at handler entry and records exactly one counter
//! increment and one duration observation when it is dropped. Dropping happens
//! on every exit path (return, `?`, panic unwinding, and cancellation of the
//! handler future when the client goes away).

use std::sync::Arc;
use std::time::Instant;

use super::GatewayMetrics;

/// Status recorded when the guard is dropped before a response was produced.
pub const UNFINISHED_STATUS: u16 = 500;

pub struct RequestTimer {
    metrics: Arc<GatewayMetrics>,
    path: &'static str,
    method: String,
    status: Option<u16>,
    started: Instant,
}

impl RequestTimer {
    pub fn start(metrics: Arc<GatewayMetrics>, path: &'static str, method: &str) -> Self {
        metrics.http_in_flight.inc(&[("path", path)]);
        Self {
            metrics,
            path,
            method: method.to_string(),
            status: None,
            started: Instant::now(),
        }
    }

    /// Fix the status that will be recorded.
    pub fn set_status(&mut self, status: u16) {
        self.status = Some(status);
    }

    /// Record now with `status`.
    pub fn finish(mut self, status: u16) {
        self.set_status(status);
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        let status = match self.status {
            Some(s) => s,
            None => {
                tracing::warn!(path = self.path, method = %self.method, "request ended without a response");
                UNFINISHED_STATUS
            }
        };
        self.metrics
            .record_request(self.path, &self.method, status, self.started.elapsed());
        self.metrics.http_in_flight.dec(&[("path", self.path)]);
    }
}

#[cfg(test)]
mod tests {
    use std::panic::AssertUnwindSafe;

    use super::*;

    fn total(m: &GatewayMetrics, status: &str) -> u64 {
        m.http_requests
            .get(&[("path", "/expand"), ("method", "POST"), ("status", status)])
    }

    #[test]
    fn finish_records_once() {
        let m = Arc::new(GatewayMetrics::new());
        let t = RequestTimer::start(Arc::clone(&m), "/expand", "POST");
        assert_eq!(m.http_in_flight.get(&[("path", "/expand")]), 1);
        t.finish(200);

        assert_eq!(total(&m, "200"), 1);
        assert_eq!(
            m.http_request_duration
                .count(&[("path", "/expand"), ("method", "POST"), ("status", "200")]),
            1
        );
        assert_eq!(m.http_in_flight.get(&[("path", "/expand")]), 0);
    }

    #[test]
    fn panic_still_records() {
        let m = Arc::new(GatewayMetrics::new());
        let m2 = Arc::clone(&m);
        let res = std::panic::catch_unwind(AssertUnwindSafe(move || {
            let _t = RequestTimer::start(m2, "/expand", "POST");
            panic!("engine exploded");
        }));
        assert!(res.is_err());
        assert_eq!(total(&m, "500"), 1);
        assert_eq!(m.http_in_flight.get(&[("path", "/expand")]), 0);
    }

    #[test]
    fn status_set_before_panic_is_kept() {
        let m = Arc::new(GatewayMetrics::new());
        let m2 = Arc::clone(&m);
        let _ = std::panic::catch_unwind(AssertUnwindSafe(move || {
            let mut t = RequestTimer::start(m2, "/expand", "POST");
            t.set_status(400);
            panic!("late failure");
        }));
        assert_eq!(total(&m, "400"), 1);
        assert_eq!(total(&m, "500"), 0);
    }
}
