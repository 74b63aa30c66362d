//! Shared request/response harness for integration tests.
//!
//! `TestHandler` drives anything implementing `Service`, either the full
//! router or a single handler function.

#![allow(dead_code)]

use ipecho::http::request::{Method, RequestBuilder};
use ipecho::http::response::Response;
use ipecho::router::Service;

/// Remote address stamped onto requests unless overridden.
pub const DEFAULT_REMOTE_ADDR: &str = "1.2.3.4:80";

pub struct TestHandler<S> {
    service: S,
    remote_addr: String,
}

impl<S: Service> TestHandler<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            remote_addr: DEFAULT_REMOTE_ADDR.to_string(),
        }
    }

    pub fn with_remote_addr(mut self, addr: &str) -> Self {
        self.remote_addr = addr.to_string();
        self
    }

    /// Builds a request, passes it to the service and returns the response.
    pub fn request(&self, method: Method, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = RequestBuilder::new()
            .method(method)
            .path(path)
            .remote_addr(self.remote_addr.clone());

        for (key, value) in headers {
            builder = builder.header(*key, *value);
        }

        let request = builder.build().expect("test request must build");
        TestResponse(self.service.serve(&request))
    }

    pub fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, &[])
    }

    pub fn post(&self, path: &str) -> TestResponse {
        self.request(Method::POST, path, &[])
    }
}

pub struct TestResponse(pub Response);

impl TestResponse {
    pub fn assert_status_equals(&self, expected: u16) -> &Self {
        assert_eq!(
            self.0.status.as_u16(),
            expected,
            "handler returned unexpected status code"
        );
        self
    }

    pub fn assert_body_equals(&self, expected: &str) -> &Self {
        assert_eq!(self.0.body_text(), expected, "handler returned unexpected body");
        self
    }

    pub fn assert_body_contains(&self, substr: &str) -> &Self {
        let actual = self.0.body_text();
        assert!(
            actual.contains(substr),
            "handler returned unexpected body: did not find `{}` in `{}`",
            substr,
            actual
        );
        self
    }

    pub fn assert_header_exists(&self, header: &str) -> &Self {
        assert!(
            self.0.header(header).is_some(),
            "handler did not set header `{}`",
            header
        );
        self
    }

    pub fn assert_header_contains(&self, header: &str, expected: &str) -> &Self {
        self.assert_header_exists(header);
        assert_eq!(
            self.0.header(header),
            Some(expected),
            "handler returned unexpected {}",
            header
        );
        self
    }
}
