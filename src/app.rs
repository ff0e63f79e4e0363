//! # Application
//!
//! [`App`] is the single value a host serves. It is built in two phases:
//!
//! 1. **Setup** (`&mut App`): register routes, middleware layers and the
//!    exception fallback.
//! 2. **Serving** (`&App`): every request is handled through shared
//!    references, so a built app can be put behind an `Arc` and shared.
//!
//! ## Request flow
//!
//! ```text
//! request ─┬─ /static... ──► StaticFiles ──────────────────────────► response
//!          └─ otherwise ──► middleware (outermost first) ──► Dispatcher
//!                                   ▲                            │
//!                                   └──── after hooks ◄──────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use marhaba::{App, AppConfig};
//!
//! let mut app = App::new(AppConfig::default());
//! app.add_function_route("/hello/{name}", |_req, res, params| {
//!     res.set_text(format!("Hello {}!", params.get("name").unwrap_or("stranger")));
//!     Ok(())
//! })
//! .unwrap();
//!
//! let client = app.test_client();
//! let res = client.get("http://testserver/hello/Aziz").unwrap();
//! assert_eq!(res.text(), "Hello Aziz!");
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::dispatcher::Dispatcher;
use crate::handlers::{AllowedMethods, HandlerResult, HandlerTarget, ResourceHandler};
use crate::middleware::{Middleware, MiddlewareChain};
use crate::router::{PathParams, RouteError, Router};
use crate::server::{AppService, Request, Response, TestClient};
use crate::static_files::StaticFiles;
use crate::templates::Templates;

/// A routed web application
#[derive(Debug)]
pub struct App {
    config: AppConfig,
    dispatcher: Dispatcher,
    middleware: MiddlewareChain,
    static_files: StaticFiles,
    templates: Arc<Templates>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        info!(
            templates_dir = %config.templates_dir.display(),
            static_dir = %config.static_dir.display(),
            "Creating application"
        );
        Self {
            static_files: StaticFiles::new(config.static_dir.clone()),
            templates: Arc::new(Templates::new(config.templates_dir.clone())),
            dispatcher: Dispatcher::new(),
            middleware: MiddlewareChain::new(),
            config,
        }
    }

    /// Build with [`AppConfig::from_env`]
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(AppConfig::from_env())
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        self.dispatcher.router()
    }

    /// Register a route.
    ///
    /// `allowed_methods` applies to function targets and defaults to every
    /// standard verb; resource targets take their verbs from their own table.
    ///
    /// # Errors
    ///
    /// `RouteError::DuplicateRoute` if `pattern` is taken, or a pattern error.
    pub fn add_route(
        &mut self,
        pattern: &str,
        target: impl Into<HandlerTarget>,
        allowed_methods: Option<AllowedMethods>,
    ) -> Result<(), RouteError> {
        self.dispatcher.add_route(pattern, target.into(), allowed_methods)
    }

    /// Register a function handler accepting every standard verb
    ///
    /// # Errors
    ///
    /// See [`add_route`](Self::add_route).
    pub fn add_function_route<F>(&mut self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&Request, &mut Response, &PathParams) -> HandlerResult + Send + Sync + 'static,
    {
        self.add_route(pattern, HandlerTarget::function(handler), None)
    }

    /// Register a resource handler
    ///
    /// # Errors
    ///
    /// See [`add_route`](Self::add_route).
    pub fn add_resource_route<R: 'static>(
        &mut self,
        pattern: &str,
        resource: ResourceHandler<R>,
    ) -> Result<(), RouteError> {
        self.add_route(pattern, HandlerTarget::resource(resource), None)
    }

    /// Add `layer` as the new outermost middleware layer
    pub fn add_middleware(&mut self, layer: Arc<dyn Middleware>) {
        self.middleware.add(layer);
    }

    /// Install the fallback for handler failures, replacing any earlier one
    pub fn set_exception_handler<F>(&mut self, fallback: F)
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        debug!("Exception fallback installed");
        self.dispatcher.set_exception_handler(Some(Arc::new(fallback)));
    }

    /// Remove the fallback; handler failures propagate again
    pub fn clear_exception_handler(&mut self) {
        debug!("Exception fallback cleared");
        self.dispatcher.set_exception_handler(None);
    }

    /// Shared handle to the template renderer, for use inside handlers
    #[must_use]
    pub fn templates(&self) -> Arc<Templates> {
        Arc::clone(&self.templates)
    }

    /// Render template `name` from the templates directory
    ///
    /// # Errors
    ///
    /// Fails when the template is missing or does not render.
    pub fn template<S: Serialize>(&self, name: &str, context: S) -> anyhow::Result<String> {
        self.templates.render(name, context)
    }

    /// Handle one request.
    ///
    /// Paths under the static prefix are answered by the static file server
    /// and never reach middleware or routes.
    ///
    /// # Errors
    ///
    /// A failing middleware hook, or a handler failure with no fallback.
    pub fn handle_request(&self, request: Request) -> anyhow::Result<Response> {
        if StaticFiles::is_static_path(&request.path) {
            return Ok(self.static_files.serve(&request.path));
        }
        self.middleware
            .call(request, |req| self.dispatcher.dispatch(req))
    }

    /// Wrap the app for a host; see [`AppService`]
    #[must_use]
    pub fn into_service(self) -> AppService {
        AppService::new(Arc::new(self))
    }

    /// In-process client for tests
    #[must_use]
    pub fn test_client(&self) -> TestClient<'_> {
        TestClient::new(self)
    }
}
