//! Request signing seam.
//!
//! # Design
//! The MAC scheme itself lives outside this crate. `Client` only needs two
//! capabilities from it: produce an `Authorization` header for an outgoing
//! request, and later check the response's `server-authorization` header
//! against whatever the signer remembered about that request. Those
//! remembered values are the signer's own `Artifacts` type; the client
//! keeps them for the duration of one call and then drops them.

use std::fmt;

use serde::Deserialize;

use crate::http::HttpMethod;

pub const DEFAULT_ALGORITHM: &str = "sha256";

/// API credentials. The key is never printed.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub id: String,
    pub key: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

fn default_algorithm() -> String {
    DEFAULT_ALGORITHM.to_string()
}

impl Credentials {
    pub fn new(id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            algorithm: default_algorithm(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("id", &self.id)
            .field("key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// What the signer sees of an outgoing request.
#[derive(Debug, Clone, Copy)]
pub struct SignRequest<'a> {
    pub url: &'a str,
    pub method: HttpMethod,
    pub content_type: &'a str,
    pub payload: Option<&'a str>,
}

/// Header value to send plus the artifacts needed to verify the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization<A> {
    pub field: String,
    pub artifacts: A,
}

/// Response headers the signer verifies. Missing headers are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    pub content_type: String,
    pub server_authorization: String,
}

/// Request signing and response verification.
pub trait Signer {
    type Artifacts;

    fn sign(&self, request: &SignRequest<'_>, credentials: &Credentials) -> Authorization<Self::Artifacts>;

    fn verify(&self, headers: &ResponseHeaders, credentials: &Credentials, artifacts: &Self::Artifacts) -> bool;
}
