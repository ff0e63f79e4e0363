//! Route table: registration and first-match lookup.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::error::RouteError;
use super::pattern::{PathParams, PathPattern};
use crate::handlers::{AllowedMethods, HandlerTarget};

/// One registered route
#[derive(Debug)]
pub struct RouteEntry {
    /// Compiled pattern; `pattern.as_str()` is the registration key
    pub pattern: PathPattern,
    /// Dispatch target, tagged at registration
    pub target: HandlerTarget,
    /// Verbs a function target accepts (lower-cased). Resource targets decide
    /// per verb from their own table and ignore this set.
    pub allowed_methods: AllowedMethods,
}

impl RouteEntry {
    /// The pattern string as registered
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Result of successfully matching a request path to a route
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched entry (Arc to avoid cloning handlers per request)
    pub route: Arc<RouteEntry>,
    /// Values captured by the pattern's placeholders (e.g., `{id}` → `"123"`)
    pub path_params: PathParams,
}

impl RouteMatch {
    /// Get a path parameter by name
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name)
    }
}

/// Two matches are equal when they point at the same entry with the same captures
impl PartialEq for RouteMatch {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.route, &other.route) && self.path_params == other.path_params
    }
}

/// Insertion-ordered route table.
///
/// Lookup is a linear scan in registration order and the first entry whose
/// pattern matches wins, even when a later, more specific pattern would also
/// match. Register specific patterns before general ones.
#[derive(Debug, Clone, Default)]
pub struct Router {
    /// Entries in registration order
    routes: Vec<Arc<RouteEntry>>,
    /// Pattern string → position in `routes`
    index: HashMap<String, usize>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route at the end of the lookup order
    ///
    /// `allowed_methods` defaults to the full standard verb set when `None`.
    ///
    /// # Errors
    ///
    /// * `RouteError::DuplicateRoute` - `pattern` is already registered
    ///   (regardless of handler kind)
    /// * `RouteError::InvalidPattern` / `RouteError::DuplicatePlaceholder` -
    ///   the pattern does not compile
    pub fn add_route(
        &mut self,
        pattern: &str,
        target: HandlerTarget,
        allowed_methods: Option<AllowedMethods>,
    ) -> Result<(), RouteError> {
        if self.index.contains_key(pattern) {
            warn!(pattern = %pattern, "Duplicate route registration rejected");
            return Err(RouteError::DuplicateRoute {
                pattern: pattern.to_string(),
            });
        }

        let compiled = PathPattern::parse(pattern)?;
        let allowed_methods = allowed_methods.unwrap_or_default();

        info!(
            pattern = %pattern,
            handler_kind = target.kind(),
            allowed_methods = %allowed_methods,
            position = self.routes.len(),
            "Route registered"
        );

        self.index.insert(pattern.to_string(), self.routes.len());
        self.routes.push(Arc::new(RouteEntry {
            pattern: compiled,
            target,
            allowed_methods,
        }));
        Ok(())
    }

    /// Find the first route, in registration order, whose pattern matches `path`
    ///
    /// # Returns
    ///
    /// * `Some(RouteMatch)` - the entry and its captured parameters
    /// * `None` - no pattern matches (the dispatcher answers 404)
    #[must_use]
    pub fn find_route(&self, path: &str) -> Option<RouteMatch> {
        let match_start = Instant::now();

        let found = self.routes.iter().find_map(|entry| {
            entry.pattern.matches(path).map(|path_params| RouteMatch {
                route: Arc::clone(entry),
                path_params,
            })
        });

        match &found {
            Some(m) => debug!(
                path = %path,
                route_pattern = %m.route.pattern(),
                path_params = ?m.path_params,
                duration_us = match_start.elapsed().as_micros(),
                "Route matched"
            ),
            None => debug!(
                path = %path,
                routes_count = self.routes.len(),
                duration_us = match_start.elapsed().as_micros(),
                "No route matched"
            ),
        }

        found
    }

    /// Look up an entry by its exact pattern string
    #[must_use]
    pub fn get(&self, pattern: &str) -> Option<&Arc<RouteEntry>> {
        self.index.get(pattern).and_then(|&i| self.routes.get(i))
    }

    /// Whether `pattern` is registered (exact string equality)
    #[must_use]
    pub fn contains(&self, pattern: &str) -> bool {
        self.index.contains_key(pattern)
    }

    /// Registered patterns in lookup order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.pattern())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Log every registered route, in lookup order
    pub fn dump_routes(&self) {
        info!(routes_count = self.routes.len(), "Routing table");
        for (position, entry) in self.routes.iter().enumerate() {
            info!(
                position = position,
                pattern = %entry.pattern(),
                handler_kind = entry.target.kind(),
                allowed_methods = %entry.allowed_methods,
                "Route"
            );
        }
    }
}
