//! # Middleware Module
//!
//! Cross-cutting hooks that run around every routed request.
//!
//! A layer implements [`Middleware`]; a [`MiddlewareChain`] nests layers so
//! the most recently added one is outermost. Static asset requests never
//! enter the chain.
//!
//! Ready-made layers:
//!
//! - [`TracingMiddleware`] - request start/completion logs and the
//!   `x-request-id` response header
//! - [`MetricsMiddleware`] - request counts, status classes and latency

mod chain;
mod core;
mod metrics;
mod tracing;

pub use self::core::Middleware;
pub use chain::MiddlewareChain;
pub use metrics::MetricsMiddleware;
pub use self::tracing::TracingMiddleware;
