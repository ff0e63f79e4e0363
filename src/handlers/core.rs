use std::fmt;
use std::sync::Arc;

use super::resource::{ResourceHandler, ResourceTarget};
use crate::router::PathParams;
use crate::server::{Request, Response};

/// Outcome of running a handler body.
///
/// `Err` is a handler failure: the dispatcher hands it to the exception policy
/// or returns it to the host.
pub type HandlerResult = anyhow::Result<()>;

/// Signature of a plain function handler
pub type HandlerFn = dyn Fn(&Request, &mut Response, &PathParams) -> HandlerResult + Send + Sync;

/// A plain callable route handler.
///
/// Receives the request, the response to fill in, and the values captured
/// from the path pattern.
#[derive(Clone)]
pub struct FunctionHandler {
    inner: Arc<HandlerFn>,
}

impl FunctionHandler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> HandlerResult + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Run the handler body
    pub fn call(&self, req: &Request, res: &mut Response, params: &PathParams) -> HandlerResult {
        (self.inner)(req, res, params)
    }
}

impl<F> From<F> for FunctionHandler
where
    F: Fn(&Request, &mut Response, &PathParams) -> HandlerResult + Send + Sync + 'static,
{
    fn from(value: F) -> Self {
        FunctionHandler::new(value)
    }
}

impl fmt::Debug for FunctionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FunctionHandler { .. }")
    }
}

/// What a route dispatches to.
///
/// The variant is chosen when the route is registered; dispatch switches on
/// it and never inspects the handler again.
#[derive(Clone)]
pub enum HandlerTarget {
    /// Plain callable; verbs are checked against the route's allowed set
    Function(FunctionHandler),
    /// Resource object; verbs are the entries of its capability table
    Resource(Arc<dyn ResourceTarget>),
}

impl HandlerTarget {
    /// Wrap a closure or function as a function target
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> HandlerResult + Send + Sync + 'static,
    {
        HandlerTarget::Function(FunctionHandler::new(f))
    }

    /// Wrap a resource handler as a resource target
    pub fn resource<R: 'static>(handler: ResourceHandler<R>) -> Self {
        HandlerTarget::Resource(Arc::new(handler))
    }

    /// Short label used in logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerTarget::Function(_) => "function",
            HandlerTarget::Resource(_) => "resource",
        }
    }
}

impl From<FunctionHandler> for HandlerTarget {
    fn from(value: FunctionHandler) -> Self {
        HandlerTarget::Function(value)
    }
}

impl<R: 'static> From<ResourceHandler<R>> for HandlerTarget {
    fn from(value: ResourceHandler<R>) -> Self {
        HandlerTarget::resource(value)
    }
}

impl fmt::Debug for HandlerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerTarget::Function(h) => f.debug_tuple("Function").field(h).finish(),
            HandlerTarget::Resource(r) => f
                .debug_struct("Resource")
                .field("verbs", &r.supported_methods())
                .finish(),
        }
    }
}
