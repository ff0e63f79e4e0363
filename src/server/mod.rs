//! # Server Module
//!
//! The edges of the application: the request and response values handlers
//! work with, the host adapter ([`AppService`]) and the in-process
//! [`TestClient`].
//!
//! Connection handling is left to the host. A host converts its incoming
//! request to an `http::Request<Vec<u8>>`, calls [`AppService::call`] and
//! writes the returned `http::Response<Vec<u8>>`.

pub mod request;
pub mod response;
pub mod service;
pub mod test_client;

pub use request::{decode_path, HeaderVec, Request, MAX_INLINE_HEADERS};
pub use response::{status_reason, Response, APPLICATION_JSON, TEXT_HTML, TEXT_PLAIN};
pub use service::{AppService, INTERNAL_ERROR_BODY};
pub use test_client::{TestClient, TestResponse, TEST_SERVER};
