//! HTTP transport abstraction for testability
//!
//! The core never talks to the network directly. Each client supplies an
//! [`HttpClient`]: reqwest on native targets, gloo-net in the browser.

use async_trait::async_trait;

/// HTTP method of a backend request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// A fully described backend request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// Query parameters, percent-encoded by the transport
    pub query: Vec<(String, String)>,
    /// Bearer token for the `Authorization` header
    pub bearer: Option<String>,
    /// JSON request body, sent with `Content-Type: application/json`
    pub json_body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            bearer: None,
            json_body: None,
        }
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    pub fn json_body(mut self, body: String) -> Self {
        self.json_body = Some(body);
        self
    }
}

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over HTTP client for dependency injection
#[cfg(not(target_arch = "wasm32"))]
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a request and return the raw response, whatever its status
    async fn send(&self, request: HttpRequest) -> crate::Result<HttpResponse>;
}

/// Abstraction over HTTP client for dependency injection
///
/// Browser futures are not `Send`, so the wasm flavour drops that bound.
#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
pub trait HttpClient: Send + Sync {
    /// Send a request and return the raw response, whatever its status
    async fn send(&self, request: HttpRequest) -> crate::Result<HttpResponse>;
}
