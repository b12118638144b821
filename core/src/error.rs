//! Error types for the listing API client.
//!
//! # Design
//! Every hard failure aborts the current call and surfaces as a
//! `ClientError`. Transport failures keep their own `TransportError` so the
//! caller can tell a certificate problem from a timeout without string
//! matching. A response that fails signature verification never reaches the
//! decoder, so `AuthenticationFailed` carries no payload.
//!
//! A soft miss (service answered, nothing matched) is not an error; see
//! `Collection::parse` and `Property::parse`.

use std::fmt;

use thiserror::Error;

/// Errors returned by `Client` operations and the transform layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Credentials or options were missing or empty at construction.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Caller input was rejected before any I/O took place.
    #[error("invalid input: {message}")]
    Validation { message: String },

    /// The request never produced a usable HTTP response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response signature did not verify; the body was discarded.
    #[error("response authentication failed")]
    AuthenticationFailed,

    /// The body was not valid JSON, or the envelope was inconsistent.
    #[error("response malformed: {0}")]
    MalformedResponse(String),

    /// The field schema names a domain field the decoder cannot assign.
    #[error("schema mismatch for field `{field}`")]
    SchemaMismatch { field: &'static str },
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::MalformedResponse(err.to_string())
    }
}

/// Broad classes of transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// TLS handshake or certificate validation failed.
    Tls,
    /// The operation did not complete in time.
    Timeout,
    /// Anything else: DNS, refused connection, broken stream.
    Unavailable,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Tls => write!(f, "certificate could not be validated"),
            TransportErrorKind::Timeout => write!(f, "timeout or possible request failure"),
            TransportErrorKind::Unavailable => {
                write!(f, "service is currently unavailable, please try again later")
            }
        }
    }
}

/// A classified failure from the underlying transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}; {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    /// Low-level code reported by the transport (OS errno), when known.
    pub code: Option<i32>,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: Option<i32>) -> Self {
        self.code = code;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_message_names_the_kind() {
        let err = TransportError::new(TransportErrorKind::Timeout, "read timed out");
        assert_eq!(err.to_string(), "timeout or possible request failure; read timed out");
    }

    #[test]
    fn transport_error_converts_into_client_error() {
        let err: ClientError = TransportError::new(TransportErrorKind::Tls, "bad cert")
            .with_code(Some(60))
            .into();
        match err {
            ClientError::Transport(inner) => {
                assert_eq!(inner.kind, TransportErrorKind::Tls);
                assert_eq!(inner.code, Some(60));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn json_error_becomes_malformed_response() {
        let parse = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err = ClientError::from(parse);
        assert!(matches!(err, ClientError::MalformedResponse(ref msg) if msg.contains("line 1")));
    }
}
