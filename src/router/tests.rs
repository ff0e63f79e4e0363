use super::{RouteError, Router};
use crate::handlers::{AllowedMethods, HandlerTarget, ResourceHandler};

fn noop() -> HandlerTarget {
    HandlerTarget::function(|_req, _res, _params| Ok(()))
}

struct Books;

#[test]
fn test_root_path() {
    let mut router = Router::new();
    router.add_route("/", noop(), None).unwrap();
    assert!(router.find_route("/").is_some());
    assert!(router.find_route("/x").is_none());
    assert!(router.find_route("").is_none());
}

#[test]
fn test_parameterized_path() {
    let mut router = Router::new();
    router.add_route("/items/{id}", noop(), None).unwrap();
    let m = router.find_route("/items/123").unwrap();
    assert_eq!(m.get_path_param("id"), Some("123"));
    assert_eq!(m.path_params.len(), 1);
}

#[test]
fn test_nested_path() {
    let mut router = Router::new();
    router.add_route("/a/{b}/c", noop(), None).unwrap();
    assert_eq!(router.find_route("/a/1/c").unwrap().get_path_param("b"), Some("1"));
    assert!(router.find_route("/a/1/d").is_none());
    assert!(router.find_route("/a/1/c/").is_none());
}

#[test]
fn test_first_match_wins() {
    let mut router = Router::new();
    router.add_route("/books/{id}", noop(), None).unwrap();
    router.add_route("/books/new", noop(), None).unwrap();

    let m = router.find_route("/books/new").unwrap();
    assert_eq!(m.route.pattern(), "/books/{id}");
    assert_eq!(m.get_path_param("id"), Some("new"));
}

#[test]
fn test_duplicate_rejected_for_any_kind() {
    let mut router = Router::new();
    router.add_route("/home", noop(), None).unwrap();

    let err = router.add_route("/home", noop(), None).unwrap_err();
    assert_eq!(
        err,
        RouteError::DuplicateRoute {
            pattern: "/home".to_string()
        }
    );

    let resource = ResourceHandler::new(|| Books);
    let err = router.add_route("/home", resource.into(), None).unwrap_err();
    assert!(matches!(err, RouteError::DuplicateRoute { .. }));
    assert_eq!(router.len(), 1);
}

#[test]
fn test_invalid_pattern_not_registered() {
    let mut router = Router::new();
    assert!(router.add_route("/x/{a}/{a}", noop(), None).is_err());
    assert!(router.add_route("/x/{", noop(), None).is_err());
    assert!(router.is_empty());
}

#[test]
fn test_lookup_is_repeatable() {
    let mut router = Router::new();
    router.add_route("/hello/{name}", noop(), None).unwrap();
    let first = router.find_route("/hello/Aziz");
    let second = router.find_route("/hello/Aziz");
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn test_patterns_in_registration_order() {
    let mut router = Router::new();
    for p in ["/c", "/a", "/b/{x}"] {
        router.add_route(p, noop(), None).unwrap();
    }
    assert_eq!(router.patterns().collect::<Vec<_>>(), vec!["/c", "/a", "/b/{x}"]);
    assert!(router.contains("/a"));
    assert!(!router.contains("/b/{y}"));
    router.dump_routes();
}

#[test]
fn test_allowed_methods_default_and_explicit() {
    let mut router = Router::new();
    router.add_route("/open", noop(), None).unwrap();
    router
        .add_route("/post-only", noop(), Some(AllowedMethods::new(["POST"])))
        .unwrap();

    let open = router.get("/open").unwrap();
    assert_eq!(open.allowed_methods, AllowedMethods::default());

    let post_only = router.get("/post-only").unwrap();
    assert!(post_only.allowed_methods.contains("post"));
    assert!(!post_only.allowed_methods.contains("get"));
}
