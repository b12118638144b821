//! HTTP request and response values, and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. `Client` builds an `HttpRequest`,
//! hands it to a `Transport`, and parses the `HttpResponse` it gets back,
//! so every step on either side of the network call can be tested without
//! a socket. `UreqTransport` is the blocking implementation used by
//! default; tests substitute their own.

use serde_json::Value;

use crate::error::TransportError;
use crate::transform::is_blank;

/// HTTP method for a request. The listing API is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// A verified, decoded API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status_code: u16,
    pub reason_phrase: String,
    pub content: Value,
}

impl ApiResponse {
    /// The content when the service reported a match: reason phrase `OK`
    /// and a non-blank body. `None` is a soft miss.
    pub fn matched_content(&self) -> Option<&Value> {
        if self.reason_phrase == "OK" && !is_blank(&self.content) {
            Some(&self.content)
        } else {
            None
        }
    }
}

/// Executes one request. Implementations must not retry.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 200,
            reason: "OK".to_string(),
            headers: vec![("Server-Authorization".to_string(), "Hawk mac=\"x\"".to_string())],
            body: String::new(),
        };
        assert_eq!(response.header("server-authorization"), Some("Hawk mac=\"x\""));
        assert_eq!(response.header("content-type"), None);
    }

    #[test]
    fn matched_content_requires_ok_and_content() {
        let mut response = ApiResponse {
            status_code: 200,
            reason_phrase: "OK".to_string(),
            content: json!({"id": 1}),
        };
        assert!(response.matched_content().is_some());

        response.content = json!({});
        assert!(response.matched_content().is_none());

        response.content = json!({"id": 1});
        response.reason_phrase = "Not Found".to_string();
        assert!(response.matched_content().is_none());
    }
}
