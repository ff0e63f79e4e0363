//! # Router Module
//!
//! Path matching and route resolution.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling route patterns such as `/greet/{name}` into anchored regexes
//! - Keeping registered routes in registration order, one per pattern
//! - Finding the first route whose pattern matches a request path
//! - Extracting the placeholder values of the match
//!
//! Method checks are not done here; see the dispatcher.
//!
//! ## Example
//!
//! ```rust
//! use marhaba::handlers::HandlerTarget;
//! use marhaba::router::Router;
//!
//! let mut router = Router::new();
//! router
//!     .add_route("/books/{id}", HandlerTarget::function(|_req, _res, _params| Ok(())), None)
//!     .unwrap();
//!
//! let m = router.find_route("/books/42").unwrap();
//! assert_eq!(m.route.pattern(), "/books/{id}");
//! assert_eq!(m.get_path_param("id"), Some("42"));
//! assert!(router.find_route("/books").is_none());
//! ```
//!
//! ## Matching rules
//!
//! - A placeholder captures one or more characters other than `/`, so it
//!   never spans segments and never matches an empty segment.
//! - Literal text must match exactly, including trailing slashes.
//! - Values are strings; no type conversion happens.
//! - The scan is linear and the first registered match wins.

mod core;
mod error;
mod pattern;
#[cfg(test)]
mod tests;

pub use self::core::{RouteEntry, RouteMatch, Router};
pub use error::RouteError;
pub use pattern::{ParamVec, PathParams, PathPattern, MAX_INLINE_PARAMS};
