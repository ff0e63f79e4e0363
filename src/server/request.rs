use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use http::Method;
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use smallvec::SmallVec;
use tracing::debug;

use crate::ids::{RequestId, REQUEST_ID_HEADER};

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Header storage for requests and responses.
///
/// Names are lower-cased `Arc<str>`, values are kept as received.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

pub(crate) fn find_header<'a>(headers: &'a HeaderVec, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

pub(crate) fn upsert_header(headers: &mut HeaderVec, name: &str, value: String) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        Some((_, v)) => *v = value,
        None => headers.push((Arc::from(name.to_ascii_lowercase()), value)),
    }
}

/// Percent-decode `path` one segment at a time.
///
/// A segment stays as received when its decoded form holds a `/` or is not
/// valid UTF-8, so decoding never changes the number of segments.
#[must_use]
pub fn decode_path(path: &str) -> Cow<'_, str> {
    if !path.contains('%') {
        return Cow::Borrowed(path);
    }
    let segments: Vec<Cow<'_, str>> = path
        .split('/')
        .map(|segment| match percent_decode_str(segment).decode_utf8() {
            Ok(decoded) if !decoded.contains('/') => decoded,
            _ => Cow::Borrowed(segment),
        })
        .collect();
    Cow::Owned(segments.join("/"))
}

/// An incoming request as seen by middleware and handlers
#[derive(Debug, Clone)]
pub struct Request {
    /// Correlation id for log lines about this request
    pub request_id: RequestId,
    pub method: Method,
    /// Path without the query string. Requests built by `from_http` carry
    /// the percent-decoded path, see [`decode_path`].
    pub path: String,
    /// Raw query string (without `?`), if any
    pub query: Option<String>,
    pub headers: HeaderVec,
    pub body: Vec<u8>,
}

impl Request {
    /// Build a request for `target`, which may carry a `?query` suffix
    pub fn new(method: Method, target: impl AsRef<str>) -> Self {
        let target = target.as_ref();
        let (path, query) = match target.split_once('?') {
            Some((p, q)) => (p, Some(q.to_string())),
            None => (target, None),
        };
        let path = if path.is_empty() { "/" } else { path };

        Self {
            request_id: RequestId::new(),
            method,
            path: path.to_string(),
            query,
            headers: HeaderVec::new(),
            body: Vec::new(),
        }
    }

    /// Add or replace a header
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if name.eq_ignore_ascii_case(REQUEST_ID_HEADER) {
            self.request_id = RequestId::from_header_or_new(Some(&value));
        }
        upsert_header(&mut self.headers, name, value);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Serialize `value` as the body and set `content-type: application/json`
    ///
    /// # Errors
    ///
    /// Returns the serializer error if `value` cannot be encoded.
    pub fn with_json<T: serde::Serialize>(self, value: &T) -> serde_json::Result<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(self
            .with_header("content-type", "application/json")
            .with_body(body))
    }

    /// Case-insensitive header lookup
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Lower-cased verb, as used for allowed-method checks and resource lookup
    #[must_use]
    pub fn verb(&self) -> Cow<'_, str> {
        let m = self.method.as_str();
        if m.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(m.to_ascii_lowercase())
        } else {
            Cow::Borrowed(m)
        }
    }

    /// Decoded query parameters. A repeated key keeps its last value.
    #[must_use]
    pub fn query_params(&self) -> HashMap<String, String> {
        self.query
            .as_deref()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<String> {
        self.query.as_deref().and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .filter(|(k, _)| k == name)
                .last()
                .map(|(_, v)| v.into_owned())
        })
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
    pub fn json<T: DeserializeOwned>(&self) -> anyhow::Result<T> {
        serde_json::from_slice(&self.body)
            .with_context(|| format!("request body of {} {} is not valid JSON", self.method, self.path))
    }

    /// Convert an `http` request into the crate's request value.
    ///
    /// The path is percent-decoded per segment and the query is kept raw.
    /// Headers whose values are not visible ASCII are dropped.
    pub fn from_http(req: http::Request<Vec<u8>>) -> Self {
        let (parts, body) = req.into_parts();
        let mut request = Request::new(parts.method, "/");
        request.path = decode_path(parts.uri.path()).into_owned();
        request.query = parts.uri.query().map(str::to_string);

        for (name, value) in &parts.headers {
            match value.to_str() {
                Ok(v) => request.headers.push((Arc::from(name.as_str()), v.to_string())),
                Err(_) => debug!(header = %name, "Dropping non-ASCII header value"),
            }
        }
        request.request_id = RequestId::from_header_or_new(request.get_header(REQUEST_ID_HEADER));
        request.body = body;
        request
    }
}
