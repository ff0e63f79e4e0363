//! Resource (class-style) handlers.
//!
//! A resource groups per-verb methods on one type. A fresh value is built for
//! every matched request and the method registered for the request verb is
//! called on it. Which verbs a resource supports is decided by its verb table,
//! filled in at construction time:
//!
//! ```rust
//! use marhaba::handlers::{HandlerResult, ResourceHandler};
//! use marhaba::server::{Request, Response};
//!
//! #[derive(Default)]
//! struct Books;
//!
//! impl Books {
//!     fn list(&mut self, _req: &Request, res: &mut Response) -> HandlerResult {
//!         res.set_text("Books page.");
//!         Ok(())
//!     }
//! }
//!
//! let books = ResourceHandler::new(Books::default).get(Books::list);
//! assert_eq!(books.verbs(), vec!["get"]);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::core::HandlerResult;
use crate::server::{Request, Response};

/// A per-verb method on resource type `R`
pub type ResourceMethod<R> = fn(&mut R, &Request, &mut Response) -> HandlerResult;

/// Object-safe view of a resource handler, as stored in the route table
pub trait ResourceTarget: Send + Sync {
    /// Verbs with a registered method, lower-cased
    fn supported_methods(&self) -> Vec<String>;

    /// Build a fresh resource value for one request
    fn construct(&self) -> Box<dyn ResourceInstance + '_>;

    /// Build the resource and run the method for `verb` (lower-case).
    ///
    /// Returns `None` when the resource has no method for `verb`.
    fn invoke(&self, verb: &str, req: &Request, res: &mut Response) -> Option<HandlerResult> {
        self.construct().call(verb, req, res)
    }
}

/// A constructed resource bound to its verb table
pub trait ResourceInstance {
    /// Run the method for `verb` (lower-case), `None` when there is none
    fn call(&mut self, verb: &str, req: &Request, res: &mut Response) -> Option<HandlerResult>;
}

struct Bound<'a, R> {
    resource: R,
    methods: &'a BTreeMap<String, ResourceMethod<R>>,
}

impl<R> ResourceInstance for Bound<'_, R> {
    fn call(&mut self, verb: &str, req: &Request, res: &mut Response) -> Option<HandlerResult> {
        let method = self.methods.get(verb)?;
        Some(method(&mut self.resource, req, res))
    }
}

/// Verb table plus constructor for resource type `R`
pub struct ResourceHandler<R> {
    constructor: Arc<dyn Fn() -> R + Send + Sync>,
    methods: BTreeMap<String, ResourceMethod<R>>,
}

impl<R: 'static> ResourceHandler<R> {
    /// Start an empty verb table; `constructor` runs once per matched request
    pub fn new<C>(constructor: C) -> Self
    where
        C: Fn() -> R + Send + Sync + 'static,
    {
        Self {
            constructor: Arc::new(constructor),
            methods: BTreeMap::new(),
        }
    }

    /// Register `method` for `verb` (any case). A later call for the same verb
    /// replaces the earlier one.
    #[must_use]
    pub fn on(mut self, verb: &str, method: ResourceMethod<R>) -> Self {
        self.methods.insert(verb.to_ascii_lowercase(), method);
        self
    }

    #[must_use]
    pub fn get(self, method: ResourceMethod<R>) -> Self {
        self.on("get", method)
    }

    #[must_use]
    pub fn post(self, method: ResourceMethod<R>) -> Self {
        self.on("post", method)
    }

    #[must_use]
    pub fn put(self, method: ResourceMethod<R>) -> Self {
        self.on("put", method)
    }

    #[must_use]
    pub fn delete(self, method: ResourceMethod<R>) -> Self {
        self.on("delete", method)
    }

    #[must_use]
    pub fn patch(self, method: ResourceMethod<R>) -> Self {
        self.on("patch", method)
    }

    #[must_use]
    pub fn options(self, method: ResourceMethod<R>) -> Self {
        self.on("options", method)
    }

    #[must_use]
    pub fn head(self, method: ResourceMethod<R>) -> Self {
        self.on("head", method)
    }

    #[must_use]
    pub fn trace(self, method: ResourceMethod<R>) -> Self {
        self.on("trace", method)
    }

    /// Registered verbs in lexical order
    #[must_use]
    pub fn verbs(&self) -> Vec<&str> {
        self.methods.keys().map(String::as_str).collect()
    }
}

impl<R: 'static> ResourceTarget for ResourceHandler<R> {
    fn supported_methods(&self) -> Vec<String> {
        self.methods.keys().cloned().collect()
    }

    fn construct(&self) -> Box<dyn ResourceInstance + '_> {
        Box::new(Bound {
            resource: (self.constructor)(),
            methods: &self.methods,
        })
    }
}

impl<R> fmt::Debug for ResourceHandler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandler")
            .field("verbs", &self.methods.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
