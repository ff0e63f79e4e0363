use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;

use super::request::{find_header, upsert_header, HeaderVec};

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const TEXT_HTML: &str = "text/html; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json";

/// Canonical reason phrase for a status code ("" when unknown)
#[must_use]
pub fn status_reason(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}

/// The response a handler fills in. A fresh one is created per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status_code: u16,
    pub headers: HeaderVec,
    body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status_code: 200,
            headers: HeaderVec::new(),
            body: Vec::new(),
        }
    }
}

impl Response {
    /// Status 200, no headers, empty body
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Response with `status` and a plain text body
    #[must_use]
    pub fn with_text(status: u16, text: impl Into<String>) -> Self {
        let mut res = Self::new();
        res.status_code = status;
        res.set_text(text);
        res
    }

    /// Set a text body and `content-type: text/plain`
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.body = text.into().into_bytes();
        self.set_header("content-type", TEXT_PLAIN);
    }

    /// Set an HTML body and `content-type: text/html`
    pub fn set_html(&mut self, html: impl Into<String>) {
        self.body = html.into().into_bytes();
        self.set_header("content-type", TEXT_HTML);
    }

    /// Serialize `value` as the body and set `content-type: application/json`.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; the response is left unchanged.
    pub fn set_json<T: Serialize + ?Sized>(&mut self, value: &T) -> serde_json::Result<()> {
        self.body = serde_json::to_vec(value)?;
        self.set_header("content-type", APPLICATION_JSON);
        Ok(())
    }

    /// Set raw body bytes; the content type is left as it is
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
    }

    /// Add or replace a header (names compare case-insensitively)
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        upsert_header(&mut self.headers, name, value.into());
    }

    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.get_header("content-type")
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, with invalid UTF-8 replaced
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decode the body as JSON
    ///
    /// # Errors
    ///
    /// Fails when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    /// Convert into an `http` response.
    ///
    /// An invalid status code or header that `http` refuses is logged and
    /// turned into a bare 500.
    #[must_use]
    pub fn into_http(self) -> http::Response<Vec<u8>> {
        let status = self.status_code;
        let mut builder = http::Response::builder().status(status);
        for (name, value) in &self.headers {
            builder = builder.header(&**name, value.as_str());
        }
        match builder.body(self.body) {
            Ok(res) => res,
            Err(err) => {
                error!(status = status, error = %err, "Response could not be converted");
                let mut fallback = http::Response::new(Vec::new());
                *fallback.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let res = Response::new();
        assert_eq!(res.status_code, 200);
        assert!(res.body().is_empty());
        assert_eq!(res.content_type(), None);
    }

    #[test]
    fn test_content_type_per_setter() {
        let mut res = Response::new();
        res.set_text("hello");
        assert_eq!(res.content_type(), Some(TEXT_PLAIN));

        res.set_json(&json!({"name": "Aziz"})).unwrap();
        assert_eq!(res.content_type(), Some(APPLICATION_JSON));
        assert_eq!(res.json::<serde_json::Value>().unwrap()["name"], "Aziz");

        res.set_html("<h1>hi</h1>");
        assert_eq!(res.content_type(), Some(TEXT_HTML));
        assert_eq!(res.headers.len(), 1);

        res.set_body(b"raw".to_vec());
        assert_eq!(res.content_type(), Some(TEXT_HTML));
        assert_eq!(res.text(), "raw");
    }

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(405), "Method Not Allowed");
        assert_eq!(status_reason(799), "");
    }

    #[test]
    fn test_into_http() {
        let res = Response::with_text(418, "teapot").into_http();
        assert_eq!(res.status(), http::StatusCode::IM_A_TEAPOT);
        assert_eq!(res.headers()["content-type"], TEXT_PLAIN);
        assert_eq!(res.body(), b"teapot");

        let mut bad = Response::new();
        bad.status_code = 1000;
        assert_eq!(bad.into_http().status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
