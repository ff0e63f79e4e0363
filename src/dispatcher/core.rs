//! Dispatcher core: route lookup, method enforcement and handler invocation.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use super::exception::{ExceptionHandler, ExceptionPolicy};
use crate::handlers::{AllowedMethods, HandlerResult, HandlerTarget};
use crate::router::{RouteError, RouteMatch, Router};
use crate::server::{Request, Response};

/// Body of the response when no route matches
pub const NOT_FOUND_BODY: &str = "Page not found.";
/// Body of the response when the route does not accept the verb
pub const METHOD_NOT_ALLOWED_BODY: &str = "Method Not Allowed.";

/// Resolves a request to a handler and runs it.
///
/// Owns the route table and the exception policy; both are mutated during
/// setup and only read while dispatching.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    router: Router,
    exceptions: ExceptionPolicy,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route; see [`Router::add_route`]
    ///
    /// # Errors
    ///
    /// Propagates the route table's registration errors.
    pub fn add_route(
        &mut self,
        pattern: &str,
        target: HandlerTarget,
        allowed_methods: Option<AllowedMethods>,
    ) -> Result<(), RouteError> {
        self.router.add_route(pattern, target, allowed_methods)
    }

    /// Replace the fallback for handler failures (`None` propagates them)
    pub fn set_exception_handler(&mut self, fallback: Option<Arc<ExceptionHandler>>) {
        self.exceptions.set_fallback(fallback);
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn exception_policy(&self) -> &ExceptionPolicy {
        &self.exceptions
    }

    /// Produce the response for `request`.
    ///
    /// 404 and 405 are ordinary responses. A handler that fails (returns
    /// `Err` or panics) is given to the exception policy; without a fallback
    /// the failure is returned as `Err`.
    ///
    /// # Errors
    ///
    /// Only a handler failure with no fallback registered.
    pub fn dispatch(&self, request: &Request) -> anyhow::Result<Response> {
        let mut response = Response::new();

        let Some(route_match) = self.router.find_route(&request.path) else {
            debug!(
                request_id = %request.request_id,
                method = %request.method,
                path = %request.path,
                "No route, answering 404"
            );
            return Ok(Response::with_text(404, NOT_FOUND_BODY));
        };

        let verb = request.verb();
        let started = Instant::now();
        let outcome = match invoke(&route_match, &verb, request, &mut response) {
            Some(outcome) => outcome,
            None => {
                warn!(
                    request_id = %request.request_id,
                    method = %request.method,
                    route_pattern = %route_match.route.pattern(),
                    "Method not allowed"
                );
                return Ok(Response::with_text(405, METHOD_NOT_ALLOWED_BODY));
            }
        };

        match outcome {
            Ok(()) => {
                info!(
                    request_id = %request.request_id,
                    method = %request.method,
                    route_pattern = %route_match.route.pattern(),
                    status = response.status_code,
                    execution_time_us = started.elapsed().as_micros(),
                    "Handler complete"
                );
            }
            Err(err) => {
                error!(
                    request_id = %request.request_id,
                    method = %request.method,
                    route_pattern = %route_match.route.pattern(),
                    has_fallback = self.exceptions.has_fallback(),
                    error = %err,
                    "Handler failed"
                );
                self.exceptions.handle(request, &mut response, err)?;
            }
        }

        Ok(response)
    }
}

/// Run the matched target. `None` means the verb is not accepted.
fn invoke(
    route_match: &RouteMatch,
    verb: &str,
    request: &Request,
    response: &mut Response,
) -> Option<HandlerResult> {
    let entry = &route_match.route;
    match &entry.target {
        HandlerTarget::Resource(resource) => {
            // a panicking constructor is not a handler failure
            let mut instance = resource.construct();
            catch_panic(|| instance.call(verb, request, response))
                .unwrap_or_else(|err| Some(Err(err)))
        }
        HandlerTarget::Function(handler) => {
            if !entry.allowed_methods.contains(verb) {
                return None;
            }
            let outcome = catch_panic(|| handler.call(request, response, &route_match.path_params));
            Some(outcome.and_then(|r| r))
        }
    }
}

/// Turn a panic in `f` into a handler failure
fn catch_panic<T>(f: impl FnOnce() -> T) -> anyhow::Result<T> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = panic_message(payload.as_ref());
        error!(panic_message = %message, "Handler panicked");
        anyhow::anyhow!("handler panicked: {message}")
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::ResourceHandler;
    use http::Method;

    fn ok_text(text: &'static str) -> HandlerTarget {
        HandlerTarget::function(move |_req, res, _params| {
            res.set_text(text);
            Ok(())
        })
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u8), "non-string panic payload");
    }

    #[test]
    fn test_not_found() {
        let dispatcher = Dispatcher::new();
        let res = dispatcher.dispatch(&Request::new(Method::GET, "/nope")).unwrap();
        assert_eq!(res.status_code, 404);
        assert_eq!(res.text(), NOT_FOUND_BODY);
    }

    #[test]
    fn test_function_allowed_methods() {
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .add_route("/home", ok_text("home"), Some(AllowedMethods::new(["post"])))
            .unwrap();

        let res = dispatcher.dispatch(&Request::new(Method::GET, "/home")).unwrap();
        assert_eq!(res.status_code, 405);
        assert_eq!(res.text(), METHOD_NOT_ALLOWED_BODY);

        let res = dispatcher.dispatch(&Request::new(Method::POST, "/home")).unwrap();
        assert_eq!(res.status_code, 200);
        assert_eq!(res.text(), "home");
    }

    #[test]
    fn test_resource_with_no_verbs_is_405() {
        struct Empty;
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .add_route("/empty", ResourceHandler::new(|| Empty).into(), None)
            .unwrap();
        let res = dispatcher.dispatch(&Request::new(Method::GET, "/empty")).unwrap();
        assert_eq!(res.status_code, 405);
    }

    #[test]
    fn test_panic_goes_to_fallback() {
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .add_route(
                "/panic",
                HandlerTarget::function(|_req, _res, _params| panic!("kaboom")),
                None,
            )
            .unwrap();

        let err = dispatcher
            .dispatch(&Request::new(Method::GET, "/panic"))
            .unwrap_err();
        assert!(err.to_string().contains("kaboom"));

        dispatcher.set_exception_handler(Some(Arc::new(|_req: &Request, res: &mut Response| {
            res.status_code = 500;
            res.set_text("recovered");
        })));
        let res = dispatcher.dispatch(&Request::new(Method::GET, "/panic")).unwrap();
        assert_eq!(res.status_code, 500);
        assert_eq!(res.text(), "recovered");
    }

    #[test]
    fn test_constructor_panic_bypasses_fallback() {
        struct Boom;
        impl Boom {
            fn build() -> Self {
                panic!("cannot build")
            }

            fn get(&mut self, _req: &Request, _res: &mut Response) -> HandlerResult {
                Ok(())
            }
        }

        let mut dispatcher = Dispatcher::new();
        dispatcher
            .add_route("/boom", ResourceHandler::new(Boom::build).get(Boom::get).into(), None)
            .unwrap();
        dispatcher.set_exception_handler(Some(Arc::new(|_req: &Request, res: &mut Response| {
            res.status_code = 500;
            res.set_text("fallback");
        })));

        let request = Request::new(Method::GET, "/boom");
        let outcome = catch_unwind(AssertUnwindSafe(|| dispatcher.dispatch(&request)));
        assert!(outcome.is_err());
    }
}
