//! In-process client that drives an [`App`] without a socket.
//!
//! Requests go through the same `http` conversions a host would use, so what
//! a test sees is what a real client would receive. URLs may be full
//! (`http://testserver/home`) or just a path (`/home`).
//!
//! Unlike [`AppService`](super::AppService), failures that escape the
//! application are returned as `Err` instead of being turned into a 500, so a
//! test can assert on them.

use std::borrow::Cow;

use anyhow::Context;
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::request::Request;
use crate::app::App;

/// Host name used in examples and tests; any host is accepted
pub const TEST_SERVER: &str = "http://testserver";

/// Sends requests to a borrowed application
#[derive(Debug, Clone, Copy)]
pub struct TestClient<'a> {
    app: &'a App,
}

impl<'a> TestClient<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    /// Send a fully built request
    ///
    /// # Errors
    ///
    /// A failure that propagated out of the application.
    pub fn send(&self, request: http::Request<Vec<u8>>) -> anyhow::Result<TestResponse> {
        let response = self.app.handle_request(Request::from_http(request))?;
        Ok(TestResponse {
            inner: response.into_http(),
        })
    }

    /// Send `method` to `url` with `body`
    ///
    /// # Errors
    ///
    /// An unparsable URL, or a failure that propagated out of the application.
    pub fn request(
        &self,
        method: Method,
        url: &str,
        body: impl Into<Vec<u8>>,
    ) -> anyhow::Result<TestResponse> {
        let request = http::Request::builder()
            .method(method)
            .uri(url)
            .body(body.into())
            .with_context(|| format!("invalid test request URL '{url}'"))?;
        self.send(request)
    }

    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub fn get(&self, url: &str) -> anyhow::Result<TestResponse> {
        self.request(Method::GET, url, Vec::new())
    }

    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub fn post(&self, url: &str, body: impl Into<Vec<u8>>) -> anyhow::Result<TestResponse> {
        self.request(Method::POST, url, body)
    }

    /// POST `value` encoded as JSON with `content-type: application/json`
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request); also fails if `value` cannot be encoded.
    pub fn post_json<T: Serialize>(&self, url: &str, value: &T) -> anyhow::Result<TestResponse> {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri(url)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(value)?)
            .with_context(|| format!("invalid test request URL '{url}'"))?;
        self.send(request)
    }

    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub fn put(&self, url: &str, body: impl Into<Vec<u8>>) -> anyhow::Result<TestResponse> {
        self.request(Method::PUT, url, body)
    }

    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub fn patch(&self, url: &str, body: impl Into<Vec<u8>>) -> anyhow::Result<TestResponse> {
        self.request(Method::PATCH, url, body)
    }

    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub fn delete(&self, url: &str) -> anyhow::Result<TestResponse> {
        self.request(Method::DELETE, url, Vec::new())
    }

    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub fn options(&self, url: &str) -> anyhow::Result<TestResponse> {
        self.request(Method::OPTIONS, url, Vec::new())
    }

    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub fn head(&self, url: &str) -> anyhow::Result<TestResponse> {
        self.request(Method::HEAD, url, Vec::new())
    }
}

/// A response as received by [`TestClient`]
#[derive(Debug)]
pub struct TestResponse {
    inner: http::Response<Vec<u8>>,
}

impl TestResponse {
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.inner.status().as_u16()
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Header value by name (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub fn headers(&self) -> &http::HeaderMap {
        self.inner.headers()
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        self.inner.body()
    }

    /// Body as text, with invalid UTF-8 replaced
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.inner.body())
    }

    /// Decode the body as JSON
    ///
    /// # Errors
    ///
    /// Fails when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(self.inner.body())
    }

    #[must_use]
    pub fn into_inner(self) -> http::Response<Vec<u8>> {
        self.inner
    }
}
