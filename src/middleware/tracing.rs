use std::time::Duration;

use tracing::{info, warn};

use super::Middleware;
use crate::ids::REQUEST_ID_HEADER;
use crate::server::{Request, Response};

/// Logs each request on the way in and its outcome on the way out, and
/// echoes the request id back in the `x-request-id` response header.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn before(&self, req: &mut Request) -> anyhow::Result<()> {
        info!(
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            "Request started"
        );
        Ok(())
    }

    fn after(&self, req: &Request, res: &mut Response, latency: Duration) -> anyhow::Result<()> {
        res.set_header(REQUEST_ID_HEADER, req.request_id.to_string());
        if res.status_code >= 500 {
            warn!(
                request_id = %req.request_id,
                method = %req.method,
                path = %req.path,
                status = res.status_code,
                latency_us = latency.as_micros(),
                "Request failed"
            );
        } else {
            info!(
                request_id = %req.request_id,
                method = %req.method,
                path = %req.path,
                status = res.status_code,
                latency_us = latency.as_micros(),
                "Request completed"
            );
        }
        Ok(())
    }
}
