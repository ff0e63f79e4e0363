use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};

use super::request::Request;
use super::response::Response;
use crate::app::App;

/// Body sent when a failure propagates all the way out of the application
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// Host-facing adapter around a built [`App`].
///
/// The application answers 404/405 itself and may turn handler failures into
/// responses through its fallback. Whatever still propagates (a handler
/// failure with no fallback, a failing middleware hook) ends here as a logged
/// `500 Internal Server Error`. Cloning is cheap; clones share the app.
#[derive(Debug, Clone)]
pub struct AppService {
    app: Arc<App>,
}

impl AppService {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }

    #[must_use]
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Produce a response for `request`; never fails
    #[must_use]
    pub fn handle(&self, request: Request) -> Response {
        let request_id = request.request_id;
        let method = request.method.clone();
        let path = request.path.clone();
        let started = Instant::now();

        match self.app.handle_request(request) {
            Ok(response) => {
                info!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    status = response.status_code,
                    total_latency_us = started.elapsed().as_micros(),
                    "Request served"
                );
                response
            }
            Err(err) => {
                error!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    error = ?err,
                    "Unhandled failure, answering 500"
                );
                Response::with_text(500, INTERNAL_ERROR_BODY)
            }
        }
    }

    /// [`handle`](Self::handle) over `http` crate types
    #[must_use]
    pub fn call(&self, request: http::Request<Vec<u8>>) -> http::Response<Vec<u8>> {
        self.handle(Request::from_http(request)).into_http()
    }
}
