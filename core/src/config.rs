//! Client configuration.
//!
//! # Design
//! `ClientOptions` is the raw, all-optional shape callers load from wherever
//! they keep settings (it derives `Deserialize`). `ClientConfig::from_options`
//! validates it once, at construction, so a client never exists without
//! credentials.

use serde::Deserialize;

use crate::auth::{Credentials, DEFAULT_ALGORITHM};
use crate::error::ClientError;

pub const DEFAULT_ENDPOINT: &str = "https://api.example";
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Unvalidated client options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClientOptions {
    pub id: Option<String>,
    pub key: Option<String>,
    pub endpoint: Option<String>,
    pub algorithm: Option<String>,
    pub content_type: Option<String>,
}

impl ClientOptions {
    pub fn new(id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            key: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Validated configuration held by a `Client`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub content_type: String,
    pub credentials: Credentials,
}

impl ClientConfig {
    pub fn from_options(options: ClientOptions) -> Result<Self, ClientError> {
        if options.is_empty() {
            return Err(configuration("credentials required"));
        }

        let id = non_empty(options.id).ok_or_else(|| configuration("\"id\" missing"))?;
        let key = non_empty(options.key).ok_or_else(|| configuration("\"key\" missing"))?;

        let endpoint = non_empty(options.endpoint).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let algorithm = non_empty(options.algorithm).unwrap_or_else(|| DEFAULT_ALGORITHM.to_string());
        let content_type =
            non_empty(options.content_type).unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            content_type,
            credentials: Credentials::new(id, key).with_algorithm(algorithm),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn configuration(message: &str) -> ClientError {
    ClientError::Configuration {
        message: message.to_string(),
    }
}
