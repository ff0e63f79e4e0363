use std::time::Duration;

use crate::server::{Request, Response};

/// A layer of hooks around dispatch.
///
/// Both hooks default to doing nothing, so a layer implements only what it
/// needs. Hooks cannot short-circuit the request: the inner dispatch always
/// runs unless a hook fails. A hook's `Err` propagates to the host and is
/// never handed to the exception fallback.
pub trait Middleware: Send + Sync {
    /// Runs before dispatch and may modify the request
    fn before(&self, _req: &mut Request) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs after dispatch and may modify the response. `latency` is the
    /// time since the request entered the chain.
    fn after(
        &self,
        _req: &Request,
        _res: &mut Response,
        _latency: Duration,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}
