//! Signed request pipeline for the listing API.
//!
//! # Design
//! Each call walks the same steps:
//!
//! 1. `build_request` assembles the URL from wire parameters and asks the
//!    `Signer` for an `Authorization` header.
//! 2. The `Transport` performs exactly one GET. Nothing is retried.
//! 3. `parse_response` verifies `server-authorization` against the signing
//!    artifacts, then decodes the JSON body. Verification runs first, so an
//!    unverified body is never decoded or returned.
//! 4. `Collection::parse` / `Property::parse` turn the `ApiResponse` into
//!    domain values, treating a non-`OK` reply as a soft miss.
//!
//! The client holds only its validated configuration, the signer and the
//! transport; nothing about a request outlives the call.

use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::{Credentials, ResponseHeaders, SignRequest, Signer};
use crate::collection::Collection;
use crate::config::{ClientConfig, ClientOptions};
use crate::error::ClientError;
use crate::http::{ApiResponse, HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::property::Property;
use crate::search::Search;
use crate::transform::WireParams;
use crate::transport::UreqTransport;

/// API version segment of every resource URL.
pub const API_VERSION: &str = "v1";

/// Unauthenticated liveness path, relative to the endpoint.
pub const STATUS_PATH: &str = "_status";

const PROPERTIES_RESOURCE: &str = "properties";

/// Synchronous client for the property listing service.
#[derive(Debug)]
pub struct Client<S, T = UreqTransport> {
    config: ClientConfig,
    signer: S,
    transport: T,
}

impl<S: Signer> Client<S, UreqTransport> {
    /// Validate `options` and create a client using the blocking `ureq`
    /// transport.
    pub fn new(options: ClientOptions, signer: S) -> Result<Self, ClientError> {
        Self::with_transport(options, signer, UreqTransport::new())
    }
}

impl<S: Signer, T: Transport> Client<S, T> {
    pub fn with_transport(options: ClientOptions, signer: S, transport: T) -> Result<Self, ClientError> {
        let config = ClientConfig::from_options(options)?;
        Ok(Self {
            config,
            signer,
            transport,
        })
    }

    pub fn version(&self) -> &'static str {
        API_VERSION
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub fn content_type(&self) -> &str {
        &self.config.content_type
    }

    pub fn credentials(&self) -> &Credentials {
        &self.config.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `{endpoint}/v1/{resource}?{query}`; the `?` is omitted without params.
    pub fn request_url(&self, resource: &str, params: &WireParams) -> Result<String, ClientError> {
        let mut url = format!("{}/{}/{}", self.config.endpoint, API_VERSION, resource);
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.to_query_string()?);
        }
        Ok(url)
    }

    /// Build and sign a GET for `resource`.
    pub fn build_request(
        &self,
        resource: &str,
        params: &WireParams,
    ) -> Result<(HttpRequest, S::Artifacts), ClientError> {
        let method = HttpMethod::Get;
        let url = self.request_url(resource, params)?;
        debug!(%url, "built request url");

        let authorization = self.signer.sign(
            &SignRequest {
                url: &url,
                method,
                content_type: &self.config.content_type,
                payload: None,
            },
            &self.config.credentials,
        );

        let request = HttpRequest {
            method,
            headers: vec![
                ("authorization".to_string(), authorization.field),
                ("content-type".to_string(), self.config.content_type.clone()),
            ],
            url,
            body: None,
        };
        Ok((request, authorization.artifacts))
    }

    /// Verify the response signature, then decode the JSON body.
    pub fn parse_response(
        &self,
        response: HttpResponse,
        artifacts: &S::Artifacts,
    ) -> Result<ApiResponse, ClientError> {
        let headers = ResponseHeaders {
            content_type: response.header("content-type").unwrap_or_default().to_string(),
            server_authorization: response
                .header("server-authorization")
                .unwrap_or_default()
                .to_string(),
        };
        if !self.signer.verify(&headers, &self.config.credentials, artifacts) {
            warn!(status = response.status, "response signature did not verify");
            return Err(ClientError::AuthenticationFailed);
        }

        let content: Value = serde_json::from_str(&response.body)?;
        Ok(ApiResponse {
            status_code: response.status,
            reason_phrase: response.reason,
            content,
        })
    }

    /// One signed GET against `resource`.
    #[tracing::instrument(skip(self, params), err)]
    pub fn request(&self, resource: &str, params: &WireParams) -> Result<ApiResponse, ClientError> {
        let (request, artifacts) = self.build_request(resource, params)?;
        let response = self.transport.send(&request)?;
        debug!(status = response.status, reason = %response.reason, "received response");
        self.parse_response(response, &artifacts)
    }

    pub fn build_status_request(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/{}", self.config.endpoint, STATUS_PATH),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Liveness probe: unauthenticated, `true` iff the reason phrase is `OK`.
    #[tracing::instrument(skip(self), err)]
    pub fn is_ok(&self) -> Result<bool, ClientError> {
        let response = self.transport.send(&self.build_status_request())?;
        Ok(response.reason == "OK")
    }

    /// Run a search. A soft miss yields an empty collection.
    #[tracing::instrument(skip(self, search), err)]
    pub fn get_properties(&self, search: &Search) -> Result<Collection, ClientError> {
        let response = self.request(PROPERTIES_RESOURCE, &search.to_wire_params())?;
        Collection::parse(&response)
    }

    /// Fetch one property by numeric web id. `params` are merged over the
    /// default `format=1`. A soft miss yields a property whose `id` is `None`.
    #[tracing::instrument(skip(self, params), err)]
    pub fn get_property(&self, id: &str, params: WireParams) -> Result<Property, ClientError> {
        let id = parse_property_id(id)?;
        let defaults: WireParams = [("format", 1)].into_iter().collect();
        let params = defaults.merge(params);

        let response = self.request(&format!("{PROPERTIES_RESOURCE}/{id}"), &params)?;
        Property::parse(&response)
    }

    /// Re-fetch a property using its own identifier.
    pub fn refresh_property(&self, property: &Property) -> Result<Property, ClientError> {
        let params = property.to_wire_params();
        let id = params.get("id").ok_or_else(|| ClientError::Validation {
            message: "property has no identifier".to_string(),
        })?;
        self.get_property(id, WireParams::new())
    }
}

fn parse_property_id(id: &str) -> Result<u64, ClientError> {
    let trimmed = id.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClientError::Validation {
            message: format!("property identifier must be a number, got {id:?}"),
        });
    }
    trimmed.parse().map_err(|_| ClientError::Validation {
        message: format!("property identifier out of range: {id}"),
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;
    use crate::auth::Authorization;
    use crate::error::{TransportError, TransportErrorKind};

    /// Signs with a readable header and accepts a JSON reply echoing it.
    #[derive(Debug)]
    struct EchoSigner {
        accept: bool,
    }

    impl Signer for EchoSigner {
        type Artifacts = String;

        fn sign(&self, request: &SignRequest<'_>, credentials: &Credentials) -> Authorization<String> {
            let field = format!(
                "Test id=\"{}\", method=\"{}\", url=\"{}\"",
                credentials.id,
                request.method.as_str(),
                request.url
            );
            Authorization {
                artifacts: field.clone(),
                field,
            }
        }

        fn verify(&self, headers: &ResponseHeaders, _: &Credentials, artifacts: &String) -> bool {
            self.accept
                && headers.content_type == "application/json"
                && headers.server_authorization == *artifacts
        }
    }

    /// Replays a canned outcome and records every request.
    #[derive(Debug)]
    struct FakeTransport {
        outcome: Result<(u16, &'static str, String), TransportError>,
        content_type: &'static str,
        sent: RefCell<Vec<HttpRequest>>,
    }

    impl FakeTransport {
        fn replying(status: u16, reason: &'static str, body: Value) -> Self {
            Self {
                outcome: Ok((status, reason, body.to_string())),
                content_type: "application/json",
                sent: RefCell::new(Vec::new()),
            }
        }

        fn raw(status: u16, reason: &'static str, body: &str) -> Self {
            Self {
                outcome: Ok((status, reason, body.to_string())),
                content_type: "application/json",
                sent: RefCell::new(Vec::new()),
            }
        }

        fn with_content_type(mut self, content_type: &'static str) -> Self {
            self.content_type = content_type;
            self
        }

        fn failing(err: TransportError) -> Self {
            Self {
                outcome: Err(err),
                content_type: "application/json",
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for FakeTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.sent.borrow_mut().push(request.clone());
            let (status, reason, body) = self.outcome.clone()?;
            let echoed = request.header("authorization").unwrap_or_default().to_string();
            Ok(HttpResponse {
                status,
                reason: reason.to_string(),
                headers: vec![
                    ("content-type".to_string(), self.content_type.to_string()),
                    ("server-authorization".to_string(), echoed),
                ],
                body,
            })
        }
    }

    fn client(transport: FakeTransport) -> Client<EchoSigner, FakeTransport> {
        Client::with_transport(
            ClientOptions::new("client-id", "secret").endpoint("http://localhost:8081/"),
            EchoSigner { accept: true },
            transport,
        )
        .unwrap()
    }

    #[test]
    fn construction_requires_credentials() {
        let err = Client::with_transport(
            ClientOptions::default(),
            EchoSigner { accept: true },
            FakeTransport::raw(200, "OK", "{}"),
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::Configuration { .. }));
    }

    #[test]
    fn request_url_includes_version_and_query() {
        let c = client(FakeTransport::raw(200, "OK", "{}"));
        let params: WireParams = [("size", "4"), ("sort", "_id:asc")].into_iter().collect();
        assert_eq!(
            c.request_url("properties", &params).unwrap(),
            "http://localhost:8081/v1/properties?size=4&sort=_id%3Aasc"
        );
        assert_eq!(
            c.request_url("properties", &WireParams::new()).unwrap(),
            "http://localhost:8081/v1/properties"
        );
    }

    #[test]
    fn build_request_signs_and_sets_content_type() {
        let c = client(FakeTransport::raw(200, "OK", "{}"));
        let (request, artifacts) = c.build_request("properties", &WireParams::new()).unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("authorization"), Some(artifacts.as_str()));
        assert!(artifacts.contains("id=\"client-id\""));
        assert!(request.body.is_none());
    }

    #[test]
    fn get_properties_decodes_collection() {
        let transport = FakeTransport::replying(
            200,
            "OK",
            json!({
                "total": 172,
                "count": 1,
                "previous": null,
                "next": null,
                "rows": [{"id": 569365, "title": "Garden flat"}]
            }),
        );
        let c = client(transport);
        let collection = c.get_properties(&Search::new()).unwrap();
        assert_eq!(collection.total, 172);
        assert_eq!(collection.rows[0].title.as_deref(), Some("Garden flat"));

        let sent = c.transport().sent.borrow();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].url.starts_with("http://localhost:8081/v1/properties?size=1&format=1&from=0"));
    }

    #[test]
    fn get_property_merges_params_over_default_format() {
        let c = client(FakeTransport::replying(200, "OK", json!({"id": 42})));
        let extra: WireParams = [("format", "0"), ("fields", "title")].into_iter().collect();
        let property = c.get_property("42", extra).unwrap();
        assert_eq!(property.id, Some(42));

        let sent = c.transport().sent.borrow();
        assert_eq!(sent[0].url, "http://localhost:8081/v1/properties/42?format=0&fields=title");
    }

    #[test]
    fn get_property_rejects_non_numeric_id_before_io() {
        let c = client(FakeTransport::raw(200, "OK", "{}"));
        let err = c.get_property("foobar", WireParams::new()).unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
        assert!(c.transport().sent.borrow().is_empty());
    }

    #[test]
    fn not_found_is_a_soft_miss() {
        let c = client(FakeTransport::replying(404, "Not Found", json!({"message": "no such property"})));
        let property = c.get_property("1", WireParams::new()).unwrap();
        assert_eq!(property.id, None);
    }

    #[test]
    fn failed_verification_discards_valid_json() {
        let c = Client::with_transport(
            ClientOptions::new("client-id", "secret"),
            EchoSigner { accept: false },
            FakeTransport::replying(200, "OK", json!({"id": 7})),
        )
        .unwrap();
        let err = c.get_property("7", WireParams::new()).unwrap_err();
        assert!(matches!(err, ClientError::AuthenticationFailed));
    }

    #[test]
    fn response_content_type_is_verified() {
        let c = client(
            FakeTransport::replying(200, "OK", json!({"id": 7})).with_content_type("text/html"),
        );
        let err = c.get_property("7", WireParams::new()).unwrap_err();
        assert!(matches!(err, ClientError::AuthenticationFailed));
    }

    #[test]
    fn malformed_json_is_distinct_from_verification_failure() {
        let c = client(FakeTransport::raw(200, "OK", "<html>oops</html>"));
        let err = c.get_properties(&Search::new()).unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }

    #[test]
    fn transport_failure_propagates_unchanged() {
        let c = client(FakeTransport::failing(
            TransportError::new(TransportErrorKind::Timeout, "timed out").with_code(Some(110)),
        ));
        let err = c.get_properties(&Search::new()).unwrap_err();
        match err {
            ClientError::Transport(inner) => {
                assert_eq!(inner.kind, TransportErrorKind::Timeout);
                assert_eq!(inner.code, Some(110));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(c.transport().sent.borrow().len(), 1);
    }

    #[test]
    fn status_probe_is_unsigned() {
        let c = client(FakeTransport::raw(200, "OK", ""));
        assert!(c.is_ok().unwrap());
        let sent = c.transport().sent.borrow();
        assert_eq!(sent[0].url, "http://localhost:8081/_status");
        assert!(sent[0].header("authorization").is_none());
    }

    #[test]
    fn status_probe_reports_degraded_service() {
        let c = client(FakeTransport::raw(503, "Service Unavailable", ""));
        assert!(!c.is_ok().unwrap());
    }

    #[test]
    fn refresh_property_requires_identifier() {
        let c = client(FakeTransport::replying(200, "OK", json!({"id": 9})));
        let err = c.refresh_property(&Property::default()).unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));

        let known = c.get_property("9", WireParams::new()).unwrap();
        let refreshed = c.refresh_property(&known).unwrap();
        assert_eq!(refreshed.id, Some(9));
    }

    #[test]
    fn property_id_parsing() {
        assert_eq!(parse_property_id(" 569365 ").unwrap(), 569365);
        assert!(parse_property_id("12.5").is_err());
        assert!(parse_property_id("").is_err());
        assert!(parse_property_id("-4").is_err());
    }
}
