use std::fmt;
use std::sync::Arc;

use crate::server::{Request, Response};

/// Signature of the application-wide fallback for handler failures
pub type ExceptionHandler = dyn Fn(&Request, &mut Response) + Send + Sync;

/// Where handler failures go.
///
/// With no fallback registered a failure propagates to the caller of
/// `dispatch`. With one, the fallback is called with the request and the
/// in-progress response and its edits become the response.
#[derive(Clone, Default)]
pub struct ExceptionPolicy {
    fallback: Option<Arc<ExceptionHandler>>,
}

impl ExceptionPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the fallback. `None` restores propagation.
    pub fn set_fallback(&mut self, fallback: Option<Arc<ExceptionHandler>>) {
        self.fallback = fallback;
    }

    #[must_use]
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Route a handler failure.
    ///
    /// Returns `Ok(())` when a fallback handled it, otherwise the error itself.
    pub fn handle(
        &self,
        request: &Request,
        response: &mut Response,
        err: anyhow::Error,
    ) -> anyhow::Result<()> {
        match &self.fallback {
            Some(fallback) => {
                fallback(request, response);
                Ok(())
            }
            None => Err(err),
        }
    }
}

impl fmt::Debug for ExceptionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionPolicy")
            .field("has_fallback", &self.has_fallback())
            .finish()
    }
}
