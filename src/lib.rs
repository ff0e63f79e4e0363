//! # marhaba
//!
//! **marhaba** is a small, synchronous HTTP request-dispatch core: it selects
//! a registered handler by URL pattern, enforces the HTTP methods the route
//! accepts, runs the handler inside an ordered chain of middleware hooks and
//! funnels handler failures to a single configurable fallback.
//!
//! ## Architecture
//!
//! - **[`router`]** - `{name}` route patterns and the insertion-ordered route table
//! - **[`handlers`]** - function and resource (per-verb) handlers, allowed methods
//! - **[`dispatcher`]** - lookup, 404/405 answers, handler invocation, exception fallback
//! - **[`middleware`]** - `before`/`after` hooks composed outermost-last-added
//! - **[`app`]** - the application value tying it all together
//! - **[`server`]** - request/response values, the host adapter and the test client
//! - **[`static_files`]** - assets under `/static`
//! - **[`templates`]** - `minijinja` rendering from a templates directory
//! - **[`config`]** / **[`logging`]** - environment-driven setup
//!
//! Connection handling is not part of the crate. A host hands
//! `http::Request<Vec<u8>>` values to [`AppService::call`] and writes back
//! the `http::Response<Vec<u8>>` it returns.
//!
//! ## Quick Start
//!
//! ```rust
//! use marhaba::handlers::{HandlerResult, ResourceHandler};
//! use marhaba::server::{Request, Response};
//! use marhaba::App;
//!
//! #[derive(Default)]
//! struct Books;
//!
//! impl Books {
//!     fn list(&mut self, _req: &Request, res: &mut Response) -> HandlerResult {
//!         res.set_text("Welcome to Books page.");
//!         Ok(())
//!     }
//! }
//!
//! let mut app = App::default();
//! app.add_resource_route("/books", ResourceHandler::new(Books::default).get(Books::list))
//!     .unwrap();
//! app.add_function_route("/about", |_req, res, _params| {
//!     res.set_text("Welcome to About page.");
//!     Ok(())
//! })
//! .unwrap();
//!
//! let client = app.test_client();
//! assert_eq!(client.get("/books").unwrap().text(), "Welcome to Books page.");
//! assert_eq!(client.delete("/books").unwrap().status_code(), 405);
//! assert_eq!(client.get("/missing").unwrap().status_code(), 404);
//! ```

pub mod app;
pub mod config;
pub mod dispatcher;
pub mod handlers;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod server;
pub mod static_files;
pub mod templates;

pub use app::App;
pub use config::{AppConfig, STATIC_PREFIX};
pub use dispatcher::{Dispatcher, METHOD_NOT_ALLOWED_BODY, NOT_FOUND_BODY};
pub use handlers::{AllowedMethods, HandlerResult, HandlerTarget, ResourceHandler};
pub use middleware::{Middleware, MiddlewareChain};
pub use router::{PathParams, RouteError, Router};
pub use server::{AppService, Request, Response, TestClient, TestResponse};
