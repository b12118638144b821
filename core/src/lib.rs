//! Client library for a property listing search API.
//!
//! # Overview
//! A `Search` is an immutable set of criteria; each setter returns a new
//! value. `Client::get_properties` encodes it into query parameters, sends
//! one signed GET, verifies the signed response and decodes the rows into
//! `Property` values inside a `Collection`. `Client::get_property` fetches a
//! single property by its numeric id.
//!
//! # Design
//! - Wire names and types live in one table (`schema`); `transform` is the
//!   only code that reads it.
//! - Request signing is a trait (`Signer`) and so is the network call
//!   (`Transport`). The default transport is blocking `ureq`.
//! - `build_request` and `parse_response` are split around the transport so
//!   every step before and after the socket can be tested without one.
//! - A reply whose reason phrase is not `OK` is a soft miss: an empty
//!   `Collection` or an empty `Property`, not an error.

pub mod auth;
pub mod client;
pub mod collection;
pub mod config;
pub mod error;
pub mod http;
pub mod property;
pub mod schema;
pub mod search;
pub mod transform;
pub mod transport;

pub use auth::{Authorization, Credentials, ResponseHeaders, SignRequest, Signer};
pub use client::Client;
pub use collection::Collection;
pub use config::{ClientConfig, ClientOptions};
pub use error::{ClientError, TransportError, TransportErrorKind};
pub use http::{ApiResponse, HttpMethod, HttpRequest, HttpResponse, Transport};
pub use property::{Coordinates, Fees, Media, Office, Property};
pub use search::{Criterion, Feature, IntoCriterion, Radius, Search, SearchCriteria, Sort};
pub use transform::WireParams;
pub use transport::UreqTransport;
