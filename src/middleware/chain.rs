use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use super::core::Middleware;
use crate::server::{Request, Response};

/// Ordered stack of middleware layers around an inner dispatch.
///
/// The most recently added layer is the outermost. For layers added in the
/// order L1, L2, L3 the hooks run as
/// `L3.before, L2.before, L1.before, inner, L1.after, L2.after, L3.after`.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    /// Layers in the order they were added (innermost first)
    layers: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `layer` as the new outermost layer
    pub fn add(&mut self, layer: Arc<dyn Middleware>) {
        self.layers.push(layer);
        debug!(layers = self.layers.len(), "Middleware layer added");
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Run `request` through every layer around `inner`.
    ///
    /// # Errors
    ///
    /// The first hook failure, or the failure returned by `inner`. Either
    /// stops the chain at that point.
    pub fn call<F>(&self, mut request: Request, inner: F) -> anyhow::Result<Response>
    where
        F: FnOnce(&Request) -> anyhow::Result<Response>,
    {
        let started = Instant::now();

        for layer in self.layers.iter().rev() {
            if let Err(err) = layer.before(&mut request) {
                warn!(request_id = %request.request_id, error = %err, "Middleware before hook failed");
                return Err(err);
            }
        }

        let mut response = inner(&request)?;
        let latency = started.elapsed();

        for layer in &self.layers {
            if let Err(err) = layer.after(&request, &mut response, latency) {
                warn!(request_id = %request.request_id, error = %err, "Middleware after hook failed");
                return Err(err);
            }
        }

        Ok(response)
    }

    /// Compose the chain with `inner` into a single callable
    pub fn wrap<F>(&self, inner: F) -> impl Fn(Request) -> anyhow::Result<Response>
    where
        F: Fn(&Request) -> anyhow::Result<Response>,
    {
        let chain = self.clone();
        move |request: Request| chain.call(request, &inner)
    }
}

impl fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("layers", &self.layers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use std::sync::Mutex;
    use std::time::Duration;

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Middleware for Recorder {
        fn before(&self, _req: &mut Request) -> anyhow::Result<()> {
            self.log.lock().unwrap().push(format!("{}.before", self.name));
            Ok(())
        }

        fn after(
            &self,
            _req: &Request,
            _res: &mut Response,
            _latency: Duration,
        ) -> anyhow::Result<()> {
            self.log.lock().unwrap().push(format!("{}.after", self.name));
            Ok(())
        }
    }

    fn chain_of(names: &[&'static str], log: &Arc<Mutex<Vec<String>>>) -> MiddlewareChain {
        let mut chain = MiddlewareChain::new();
        for &name in names {
            chain.add(Arc::new(Recorder {
                name,
                log: Arc::clone(log),
            }));
        }
        chain
    }

    #[test]
    fn test_last_added_is_outermost() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = chain_of(&["l1", "l2", "l3"], &log);
        let inner_log = Arc::clone(&log);
        chain
            .call(Request::new(Method::GET, "/"), |_req| {
                inner_log.lock().unwrap().push("inner".to_string());
                Ok(Response::new())
            })
            .unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["l3.before", "l2.before", "l1.before", "inner", "l1.after", "l2.after", "l3.after"]
        );
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let chain = MiddlewareChain::new();
        let res = chain
            .call(Request::new(Method::GET, "/"), |_req| Ok(Response::with_text(201, "made")))
            .unwrap();
        assert_eq!(res, Response::with_text(201, "made"));
    }

    #[test]
    fn test_wrap_reusable() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = chain_of(&["only"], &log);
        let handler = chain.wrap(|req: &Request| Ok(Response::with_text(200, req.path.clone())));
        assert_eq!(handler(Request::new(Method::GET, "/a")).unwrap().text(), "/a");
        assert_eq!(handler(Request::new(Method::GET, "/b")).unwrap().text(), "/b");
        assert_eq!(log.lock().unwrap().len(), 4);
    }
}
