mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::text_route;
use http::Method;
use marhaba::dispatcher::{Dispatcher, METHOD_NOT_ALLOWED_BODY, NOT_FOUND_BODY};
use marhaba::handlers::{AllowedMethods, HandlerResult, HandlerTarget, ResourceHandler};
use marhaba::server::{Request, Response};

static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

struct Counted;

impl Counted {
    fn build() -> Self {
        CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
        Counted
    }

    fn get(&mut self, req: &Request, res: &mut Response) -> HandlerResult {
        res.set_text(format!("{} {}", req.method, req.path));
        Ok(())
    }

    fn fail(&mut self, _req: &Request, _res: &mut Response) -> HandlerResult {
        anyhow::bail!("resource failure")
    }
}

fn dispatch(dispatcher: &Dispatcher, method: Method, path: &str) -> Response {
    dispatcher.dispatch(&Request::new(method, path)).unwrap()
}

#[test]
fn test_method_case_and_allowed_set() {
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .add_route("/mixed", text_route("ok"), Some(AllowedMethods::new(["GET", "Put"])))
        .unwrap();

    assert_eq!(dispatch(&dispatcher, Method::GET, "/mixed").status_code, 200);
    assert_eq!(dispatch(&dispatcher, Method::PUT, "/mixed").status_code, 200);
    let res = dispatch(&dispatcher, Method::DELETE, "/mixed");
    assert_eq!(res.status_code, 405);
    assert_eq!(res.text(), METHOD_NOT_ALLOWED_BODY);
}

#[test]
fn test_default_methods_exclude_nonstandard() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_route("/any", text_route("ok"), None).unwrap();

    for method in [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
        Method::OPTIONS,
        Method::HEAD,
        Method::TRACE,
    ] {
        assert_eq!(dispatch(&dispatcher, method, "/any").status_code, 200);
    }
    assert_eq!(dispatch(&dispatcher, Method::CONNECT, "/any").status_code, 405);
}

#[test]
fn test_resource_ignores_allowed_methods() {
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .add_route(
            "/things",
            ResourceHandler::new(Counted::build).get(Counted::get).into(),
            Some(AllowedMethods::new(["post"])),
        )
        .unwrap();

    let res = dispatch(&dispatcher, Method::GET, "/things");
    assert_eq!(res.status_code, 200);
    assert_eq!(res.text(), "GET /things");
    assert_eq!(dispatch(&dispatcher, Method::POST, "/things").status_code, 405);
}

#[test]
fn test_resource_built_per_request_even_for_405() {
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .add_route(
            "/counted",
            ResourceHandler::new(Counted::build).get(Counted::get).into(),
            None,
        )
        .unwrap();

    let before = CONSTRUCTED.load(Ordering::SeqCst);
    dispatch(&dispatcher, Method::GET, "/counted");
    dispatch(&dispatcher, Method::PATCH, "/counted");
    assert!(CONSTRUCTED.load(Ordering::SeqCst) >= before + 2);
}

#[test]
fn test_not_found_touches_no_handler() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .add_route(
            "/only",
            HandlerTarget::function(move |_req, _res, _params| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
            None,
        )
        .unwrap();

    let res = dispatch(&dispatcher, Method::GET, "/only/not");
    assert_eq!(res.status_code, 404);
    assert_eq!(res.text(), NOT_FOUND_BODY);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn test_resource_failure_goes_to_fallback() {
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .add_route(
            "/fails",
            ResourceHandler::new(Counted::build).get(Counted::fail).into(),
            None,
        )
        .unwrap();

    let err = dispatcher
        .dispatch(&Request::new(Method::GET, "/fails"))
        .unwrap_err();
    assert_eq!(err.to_string(), "resource failure");

    dispatcher.set_exception_handler(Some(Arc::new(|req: &Request, res: &mut Response| {
        res.status_code = 503;
        res.set_text(format!("failed at {}", req.path));
    })));
    let res = dispatch(&dispatcher, Method::GET, "/fails");
    assert_eq!(res.status_code, 503);
    assert_eq!(res.text(), "failed at /fails");
}

#[test]
fn test_fallback_sees_partial_response() {
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .add_route(
            "/partial",
            HandlerTarget::function(|_req, res, _params| {
                res.set_header("x-stage", "started");
                anyhow::bail!("half way")
            }),
            None,
        )
        .unwrap();
    dispatcher.set_exception_handler(Some(Arc::new(|_req: &Request, res: &mut Response| {
        res.status_code = 500;
    })));

    let res = dispatch(&dispatcher, Method::GET, "/partial");
    assert_eq!(res.status_code, 500);
    assert_eq!(res.get_header("x-stage"), Some("started"));
}

#[test]
fn test_panicking_resource_is_handler_failure() {
    struct Grumpy;
    impl Grumpy {
        fn get(&mut self, _req: &Request, _res: &mut Response) -> HandlerResult {
            panic!("grumpy")
        }
    }

    let mut dispatcher = Dispatcher::new();
    dispatcher
        .add_route("/grumpy", ResourceHandler::new(|| Grumpy).get(Grumpy::get).into(), None)
        .unwrap();

    let err = dispatcher
        .dispatch(&Request::new(Method::GET, "/grumpy"))
        .unwrap_err();
    assert!(err.to_string().contains("grumpy"));
}

#[test]
fn test_resource_on_parametrized_pattern() {
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .add_route(
            "/books/{id}",
            ResourceHandler::new(Counted::build).get(Counted::get).into(),
            None,
        )
        .unwrap();

    let route_match = dispatcher.router().find_route("/books/7").unwrap();
    assert_eq!(route_match.get_path_param("id"), Some("7"));

    // resource methods get the request only; the id is still in the path
    let res = dispatcher.dispatch(&Request::new(Method::GET, "/books/7")).unwrap();
    assert_eq!(res.status_code, 200);
    assert_eq!(res.text(), "GET /books/7");

    let res = dispatcher.dispatch(&Request::new(Method::DELETE, "/books/7")).unwrap();
    assert_eq!(res.status_code, 405);
    assert_eq!(res.text(), METHOD_NOT_ALLOWED_BODY);
}
