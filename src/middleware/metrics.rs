use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use super::Middleware;
use crate::server::{Request, Response};

/// Request counters kept with atomics so one instance can be shared by
/// every request.
///
/// Counted:
/// - requests that entered the layer
/// - responses by status class (4xx, 5xx)
/// - total latency, for the running average
#[derive(Debug, Default)]
pub struct MetricsMiddleware {
    request_count: AtomicUsize,
    completed_count: AtomicUsize,
    client_errors: AtomicUsize,
    server_errors: AtomicUsize,
    total_latency_ns: AtomicU64,
}

impl MetricsMiddleware {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that reached this layer
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Requests whose response came back through this layer
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed_count.load(Ordering::Relaxed)
    }

    /// Responses with a 4xx status
    #[must_use]
    pub fn client_errors(&self) -> usize {
        self.client_errors.load(Ordering::Relaxed)
    }

    /// Responses with a 5xx status
    #[must_use]
    pub fn server_errors(&self) -> usize {
        self.server_errors.load(Ordering::Relaxed)
    }

    /// Mean latency over completed requests, zero before the first one
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.completed_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }
}

impl Middleware for MetricsMiddleware {
    fn before(&self, _req: &mut Request) -> anyhow::Result<()> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn after(&self, _req: &Request, res: &mut Response, latency: Duration) -> anyhow::Result<()> {
        self.completed_count.fetch_add(1, Ordering::Relaxed);
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.total_latency_ns.fetch_add(nanos, Ordering::Relaxed);
        match res.status_code {
            400..=499 => {
                self.client_errors.fetch_add(1, Ordering::Relaxed);
            }
            500..=599 => {
                self.server_errors.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_zero_requests() {
        let metrics = MetricsMiddleware::new();
        assert_eq!(metrics.request_count(), 0);
        assert_eq!(metrics.average_latency(), Duration::ZERO);
    }

    #[test]
    fn test_counts_by_status_class() {
        let metrics = MetricsMiddleware::new();
        let mut req = Request::new(Method::GET, "/");
        for (status, ms) in [(200, 10), (404, 20), (500, 30)] {
            metrics.before(&mut req).unwrap();
            let mut res = Response::with_text(status, "x");
            metrics
                .after(&req, &mut res, Duration::from_millis(ms))
                .unwrap();
        }
        assert_eq!(metrics.request_count(), 3);
        assert_eq!(metrics.completed_count(), 3);
        assert_eq!(metrics.client_errors(), 1);
        assert_eq!(metrics.server_errors(), 1);
        assert_eq!(metrics.average_latency(), Duration::from_millis(20));
    }
}
