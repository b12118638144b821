//! In-memory property listing service.
//!
//! Serves a fixed set of wire rows in the shape the real API uses:
//!
//! - `GET /_status` is unauthenticated.
//! - `GET /v1/properties` pages and filters the rows, returning the
//!   `{total, count, previous, next, rows}` envelope.
//! - `GET /v1/properties/{id}` returns one row, or 404 with a JSON body.
//!
//! Everything under `/v1` needs an `Authorization` header and echoes it back
//! as `server-authorization`, so a client can verify replies with a signer
//! that expects its own header back.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderName, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

const DEFAULT_PAGE_SIZE: usize = 10;
const SERVER_AUTHORIZATION: &str = "server-authorization";

/// Query keys compared numerically, each also accepting `_min`/`_max`.
const NUMERIC_FILTERS: &[&str] = &["price", "bedrooms", "bathrooms", "receptions"];

/// Query keys compared as case-insensitive text against the same wire key.
const TEXT_FILTERS: &[(&str, &str)] = &[
    ("category", "category"),
    ("status", "status"),
    ("type", "property_type"),
    ("postcode", "postcode"),
];

/// Read-only listing store.
#[derive(Debug, Clone, Default)]
pub struct Listings {
    rows: Vec<Value>,
}

pub type Db = Arc<Listings>;

impl Listings {
    pub fn new(rows: Vec<Value>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    /// Four listings covering sales and lettings, with the wire quirks the
    /// client has to cope with: numeric strings, caption lists and blanks.
    pub fn fixtures() -> Self {
        Self::new(vec![
            json!({
                "id": 101,
                "property_id": "HQ-101",
                "title": "Victorian terrace with garden",
                "address": ["12 Mill Lane", "Harborne", "Birmingham"],
                "postcode": "B17 9QT",
                "postcode_1": "B17",
                "postcode_2": "9QT",
                "town": "Birmingham",
                "category": "Sales",
                "criteria_type": "Residential",
                "property_type": "Terraced",
                "status": "Available",
                "price": "425000",
                "price_display": "£425,000",
                "bedrooms": 3,
                "bathrooms": 1,
                "receptions": 2,
                "featured": 1,
                "new_home": "N",
                "features": ["South facing garden", "Cellar", "Original fireplaces"],
                "photos": [
                    {"url": "https://img.example/101/1.jpg", "text": "Front elevation"},
                    "https://img.example/101/2.jpg"
                ],
                "latitude": 52.4581,
                "longitude": -1.9392,
                "inserted_at": "2024-03-01T09:30:00+00:00",
                "updated_at": "2024-04-12T16:05:41+00:00",
                "office_name": "Harborne",
                "office_phone": "0121 000 0101",
                "fees_url": "",
                "videos": []
            }),
            json!({
                "id": 102,
                "property_id": "HQ-102",
                "title": "Two bedroom apartment near the canal",
                "address": ["Flat 4", "Water Street", "Birmingham"],
                "postcode": "B3 1HP",
                "town": "Birmingham",
                "category": "Lettings",
                "criteria_type": "Residential",
                "property_type": "Apartment",
                "status": "Available",
                "price": 1150,
                "rent_period": "Monthly",
                "bedrooms": 2,
                "bathrooms": 2,
                "receptions": 1,
                "featured": false,
                "furnished": "Furnished",
                "fees_text": ["Holding deposit: one week's rent"],
                "fees_url": "https://agent.example/fees",
                "available_at": "2024-06-01T00:00:00+00:00",
                "inserted_at": "2024-05-02T11:00:00+00:00"
            }),
            json!({
                "id": 103,
                "property_id": "HQ-103",
                "title": "Detached family home",
                "address": ["The Gables", "Church Road", "Solihull"],
                "postcode": "B91 3RQ",
                "town": "Solihull",
                "category": "Sales",
                "criteria_type": "Residential",
                "property_type": "Detached",
                "status": "Under Offer",
                "price": 895000,
                "bedrooms": 5,
                "bathrooms": 3,
                "receptions": 3,
                "featured": "0",
                "new_home": "Y",
                "videos": ["https://video.example/103"],
                "videos_text": ["Walkthrough"],
                "inserted_at": "2023-11-20T08:15:00+00:00"
            }),
            json!({
                "id": 104,
                "property_id": "HQ-104",
                "title": "Retail unit on the high street",
                "address": ["Unit 2", "High Street", "Solihull"],
                "postcode": "B91 3DA",
                "town": "Solihull",
                "category": "Lettings",
                "criteria_type": "Commercial Property",
                "property_type": "Retail",
                "status": "Available",
                "price": 2400,
                "rent_period": "Monthly",
                "bedrooms": 0,
                "inserted_at": "2024-01-08T10:00:00+00:00"
            }),
        ])
    }

    fn find(&self, id: u64) -> Option<&Value> {
        self.rows.iter().find(|row| row["id"].as_u64() == Some(id))
    }
}

/// Search response envelope.
#[derive(Debug, Serialize)]
pub struct Page {
    pub total: usize,
    pub count: usize,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub rows: Vec<Value>,
}

pub fn app() -> Router {
    app_with(Listings::fixtures())
}

pub fn app_with(listings: Listings) -> Router {
    let db: Db = Arc::new(listings);
    let api = Router::new()
        .route("/v1/properties", get(list_properties))
        .route("/v1/properties/{id}", get(get_property))
        .route_layer(middleware::from_fn(require_authorization))
        .with_state(db);

    Router::new().route("/_status", get(status)).merge(api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_authorization(request: Request, next: Next) -> Response {
    let Some(authorization) = request.headers().get(header::AUTHORIZATION).cloned() else {
        tracing::warn!(uri = %request.uri(), "rejected unsigned request");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "authorization required"})),
        )
            .into_response();
    };

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(HeaderName::from_static(SERVER_AUTHORIZATION), authorization);
    response
}

async fn status() -> StatusCode {
    StatusCode::OK
}

async fn list_properties(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Page> {
    let mut hits: Vec<&Value> = db.rows().iter().filter(|row| matches(row, &query)).collect();
    if let Some(sort) = query.get("sort") {
        sort_rows(&mut hits, sort);
    }

    let size = parse_usize(query.get("size")).unwrap_or(DEFAULT_PAGE_SIZE);
    let from = parse_usize(query.get("from")).unwrap_or(0);
    let total = hits.len();
    let rows: Vec<Value> = hits.into_iter().skip(from).take(size).cloned().collect();

    let previous = (from > 0).then(|| page_link(from.saturating_sub(size), size));
    let next = (from + rows.len() < total).then(|| page_link(from + size, size));

    tracing::debug!(total, count = rows.len(), from, size, "listed properties");
    Json(Page {
        total,
        count: rows.len(),
        previous,
        next,
        rows,
    })
}

async fn get_property(State(db): State<Db>, Path(id): Path<String>) -> Response {
    match id.parse::<u64>().ok().and_then(|id| db.find(id)) {
        Some(row) => Json(row.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": format!("property {id} not found")})),
        )
            .into_response(),
    }
}

fn matches(row: &Value, query: &HashMap<String, String>) -> bool {
    let numeric = NUMERIC_FILTERS.iter().all(|key| {
        let value = number(&row[*key]);
        let bound = |suffix: &str| query.get(&format!("{key}{suffix}")).and_then(|v| v.parse::<f64>().ok());
        let within = |wanted: Option<f64>, keep: fn(f64, f64) -> bool| match wanted {
            Some(wanted) => value.is_some_and(|v| keep(v, wanted)),
            None => true,
        };
        within(bound(""), |v, w| v == w)
            && within(bound("_min"), |v, w| v >= w)
            && within(bound("_max"), |v, w| v <= w)
    });

    let text = TEXT_FILTERS.iter().all(|(param, wire)| match query.get(*param) {
        Some(wanted) => row[*wire]
            .as_str()
            .is_some_and(|v| v.eq_ignore_ascii_case(wanted)),
        None => true,
    });

    numeric && text
}

/// `field:order`; `_id` sorts by `id`. Unknown orders sort ascending.
fn sort_rows(rows: &mut [&Value], sort: &str) {
    let (field, order) = sort.split_once(':').unwrap_or((sort, "asc"));
    let field = if field == "_id" { "id" } else { field };
    rows.sort_by(|a, b| {
        let ordering = compare(&a[field], &b[field]);
        if order == "desc" {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (number(a), number(b)) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.as_str().unwrap_or_default().cmp(b.as_str().unwrap_or_default()),
    }
}

/// Wire numbers arrive either as JSON numbers or numeric strings.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_usize(value: Option<&String>) -> Option<usize> {
    value.and_then(|v| v.parse().ok())
}

fn page_link(from: usize, size: usize) -> String {
    format!("/v1/properties?from={from}&size={size}")
}
