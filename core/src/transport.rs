//! Blocking transport built on `ureq`.
//!
//! Status codes are returned as data (`http_status_as_error(false)`) so the
//! client can treat a non-`OK` reply as a soft miss. Failures before a
//! response arrives are classified into `TransportErrorKind`.

use std::io;

use crate::error::{TransportError, TransportErrorKind};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Use a caller-configured agent, e.g. one with timeouts set.
    /// The agent should have `http_status_as_error(false)`.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.agent.get(request.url.as_str()),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder.call().map_err(classify)?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string().map_err(classify)?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

/// Map a `ureq` failure onto the transport taxonomy.
pub fn classify(err: ureq::Error) -> TransportError {
    let message = err.to_string();
    match err {
        ureq::Error::Timeout(_) => TransportError::new(TransportErrorKind::Timeout, message),
        ureq::Error::Tls(_) => TransportError::new(TransportErrorKind::Tls, message),
        ureq::Error::Io(io_err) => classify_io(&io_err, message),
        _ if looks_like_tls(&message) => TransportError::new(TransportErrorKind::Tls, message),
        _ => TransportError::new(TransportErrorKind::Unavailable, message),
    }
}

fn classify_io(err: &io::Error, message: String) -> TransportError {
    let kind = match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TransportErrorKind::Timeout,
        _ if looks_like_tls(&message) => TransportErrorKind::Tls,
        _ => TransportErrorKind::Unavailable,
    };
    TransportError::new(kind, message).with_code(err.raw_os_error())
}

fn looks_like_tls(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("certificate") || lower.contains("tls") || lower.contains("handshake")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn io_timeout_is_timeout() {
        let err = classify(ureq::Error::Io(io::Error::new(io::ErrorKind::TimedOut, "read timed out")));
        assert_eq!(err.kind, TransportErrorKind::Timeout);
    }

    #[test]
    fn refused_connection_keeps_os_code() {
        let err = classify(ureq::Error::Io(io::Error::from_raw_os_error(111)));
        assert_eq!(err.kind, TransportErrorKind::Unavailable);
        assert_eq!(err.code, Some(111));
    }

    #[test]
    fn tls_failure_is_tls() {
        let err = classify(ureq::Error::Tls("certificate not trusted"));
        assert_eq!(err.kind, TransportErrorKind::Tls);
    }

    #[test]
    fn unknown_host_is_unavailable() {
        let err = classify(ureq::Error::HostNotFound);
        assert_eq!(err.kind, TransportErrorKind::Unavailable);
        assert_eq!(err.code, None);
    }

    #[test]
    fn configured_agent_times_out() {
        // Accepted by the backlog but never answered.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_millis(200)))
            .build()
            .new_agent();
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: format!("http://{addr}/_status"),
            headers: Vec::new(),
            body: None,
        };
        let err = UreqTransport::with_agent(agent).send(&request).unwrap_err();
        assert_eq!(err.kind, TransportErrorKind::Timeout);
        drop(listener);
    }

    #[test]
    fn closed_port_is_unavailable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let request = HttpRequest {
            method: HttpMethod::Get,
            url: format!("http://{addr}/_status"),
            headers: Vec::new(),
            body: None,
        };
        let err = UreqTransport::new().send(&request).unwrap_err();
        assert_eq!(err.kind, TransportErrorKind::Unavailable);
    }
}
