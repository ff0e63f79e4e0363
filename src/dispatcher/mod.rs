//! # Dispatcher Module
//!
//! Turns one request into one response: looks the path up in the route
//! table, enforces the verbs the route accepts and runs the handler.
//!
//! ## Outcomes
//!
//! | Situation | Result |
//! |---|---|
//! | no pattern matches | `404` with body `Page not found.` |
//! | verb not accepted | `405` with body `Method Not Allowed.` |
//! | handler succeeds | the response the handler filled in |
//! | handler fails, fallback set | the response as the fallback left it |
//! | handler fails, no fallback | `Err` carrying the failure |
//!
//! A handler fails by returning `Err` or by panicking; panics are caught
//! here and treated the same as an `Err`.
//!
//! ## Example
//!
//! ```rust
//! use marhaba::dispatcher::Dispatcher;
//! use marhaba::handlers::HandlerTarget;
//! use marhaba::server::Request;
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher
//!     .add_route(
//!         "/greet/{name}",
//!         HandlerTarget::function(|_req, res, params| {
//!             res.set_text(format!("Hello, {}", params.get("name").unwrap_or("you")));
//!             Ok(())
//!         }),
//!         None,
//!     )
//!     .unwrap();
//!
//! let res = dispatcher
//!     .dispatch(&Request::new(http::Method::GET, "/greet/Aziz"))
//!     .unwrap();
//! assert_eq!(res.text(), "Hello, Aziz");
//! ```

mod core;
mod exception;

pub use self::core::{Dispatcher, METHOD_NOT_ALLOWED_BODY, NOT_FOUND_BODY};
pub use exception::{ExceptionHandler, ExceptionPolicy};
