//! Translation between wire rows/parameters and domain values.
//!
//! # Design
//! Pure functions driven by the tables in `schema`:
//!
//! - `decode_row` turns one wire row into a `Property`. Each inbound entry
//!   present in the row is coerced to its declared `FieldType` and assigned
//!   through `Property::assign`, which rejects a field/type pairing it does
//!   not know with `ClientError::SchemaMismatch`.
//! - `encode_search` turns `SearchCriteria` into ordered query parameters.
//! - `encode_property` emits the identifier only.
//!
//! Blank wire values (`null`, `""`, `[]`, `{}`) are skipped so a partial row
//! leaves the field unset instead of producing a zero value. `0`, `"0"` and
//! `false` are values, not blanks.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::error::ClientError;
use crate::property::{Media, Property};
use crate::schema::{outbound_wire_name, FieldType, INBOUND};
use crate::search::{Criterion, SearchCriteria};

/// Wire timestamp layout; any trailing offset marker is ignored.
const WIRE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const DEFAULT_SORT_FIELD: &str = "_id";
const DEFAULT_SORT_ORDER: &str = "asc";

// ---------------------------------------------------------------------------
// Wire parameters
// ---------------------------------------------------------------------------

/// Ordered query parameters. Insertion order is kept so the query string
/// is deterministic; inserting an existing key replaces it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireParams(Vec<(String, String)>);

impl WireParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply `other` on top of `self`; keys in `other` win.
    pub fn merge(mut self, other: WireParams) -> Self {
        for (key, value) in other.0 {
            self.insert(key, value);
        }
        self
    }

    /// Form-urlencoded query string, without the leading `?`.
    pub fn to_query_string(&self) -> Result<String, ClientError> {
        serde_urlencoded::to_string(&self.0).map_err(|e| ClientError::Validation {
            message: format!("query parameters could not be encoded: {e}"),
        })
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for WireParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = WireParams::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// A wire value coerced to its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    List(Vec<String>),
    Media(Vec<Media>),
    DateTime(DateTime<Utc>),
}

/// Decode one wire row into a `Property`.
///
/// Keys absent from the schema are ignored. A date that does not parse is
/// left unset.
pub fn decode_row(row: &Map<String, Value>) -> Result<Property, ClientError> {
    let mut property = Property::default();
    for spec in INBOUND {
        let Some(raw) = row.get(spec.wire) else {
            continue;
        };
        if is_blank(raw) {
            continue;
        }
        if let Some(value) = coerce(raw, spec.field_type) {
            property.assign(spec.field, value)?;
        }
    }
    Ok(property)
}

/// `null`, empty string, empty array or empty object.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Coerce a raw wire value to `field_type`. Only dates can fail to coerce.
pub fn coerce(raw: &Value, field_type: FieldType) -> Option<FieldValue> {
    let value = match field_type {
        FieldType::String => FieldValue::Text(to_text(raw)),
        FieldType::Integer => FieldValue::Integer(to_integer(raw)),
        FieldType::Float => FieldValue::Float(to_float(raw)),
        FieldType::Boolean => FieldValue::Boolean(to_boolean(raw)),
        FieldType::StringList => FieldValue::List(to_list(raw)),
        FieldType::Media => FieldValue::Media(to_media(raw)),
        FieldType::DateTime => FieldValue::DateTime(to_datetime(raw)?),
    };
    Some(value)
}

fn to_text(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn to_integer(raw: &Value) -> i64 {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| parse_numeric(s).map(|f| f as i64))
            .unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        Value::Null | Value::Array(_) | Value::Object(_) => 0,
    }
}

fn to_float(raw: &Value) -> f64 {
    match raw {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_numeric(s).unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => 0.0,
    }
}

fn to_boolean(raw: &Value) -> bool {
    match raw {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => match parse_numeric(s) {
            Some(f) => f != 0.0,
            None => s.trim().eq_ignore_ascii_case("true"),
        },
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

fn to_list(raw: &Value) -> Vec<String> {
    match raw {
        Value::Array(items) => items.iter().filter_map(list_item).collect(),
        Value::Object(map) => map.values().filter_map(list_item).collect(),
        scalar => list_item(scalar).into_iter().collect(),
    }
}

fn list_item(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        nested => Some(nested.to_string()),
    }
}

fn to_media(raw: &Value) -> Vec<Media> {
    match raw {
        Value::Array(items) => items.iter().filter_map(media_item).collect(),
        single => media_item(single).into_iter().collect(),
    }
}

fn media_item(value: &Value) -> Option<Media> {
    match value {
        Value::String(url) if !url.is_empty() => Some(Media {
            url: url.clone(),
            text: None,
        }),
        Value::Object(map) => {
            let url = map.get("url")?.as_str()?.to_string();
            let text = map
                .get("text")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            Some(Media { url, text })
        }
        _ => None,
    }
}

fn to_datetime(raw: &Value) -> Option<DateTime<Utc>> {
    let text = raw.as_str()?;
    let (naive, _offset) = NaiveDateTime::parse_and_remainder(text, WIRE_DATE_FORMAT).ok()?;
    Some(naive.and_utc())
}

/// Parse a numeric string (`"12"`, `" 3.5"`, `"1e3"`); `None` otherwise.
pub(crate) fn parse_numeric(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Encode search criteria as query parameters.
pub fn encode_search(criteria: &SearchCriteria) -> WireParams {
    let mut params = WireParams::new();
    params.insert("size", criteria.size);
    params.insert("format", criteria.format);
    params.insert("from", criteria.from);
    params.insert("sort", encode_sort(criteria));

    insert_text(&mut params, "address", criteria.address.as_deref());
    params.insert("availability", criteria.availability);
    insert_criterion(&mut params, "bathrooms", criteria.bathrooms);
    insert_criterion(&mut params, "bedrooms", criteria.bedrooms);
    insert_text(&mut params, "category", criteria.category.as_deref());
    insert_text(&mut params, "classification", criteria.classification.as_deref());
    if let Some(created) = criteria.created_date {
        params.insert("created", created.timestamp());
    }
    if let Some(featured) = criteria.featured {
        params.insert("featured", featured);
    }
    if !criteria.features.is_empty() {
        let terms: Vec<String> = criteria.features.iter().map(|f| f.to_string()).collect();
        params.insert("features", terms.join(";"));
    }
    insert_text(&mut params, "furnished", criteria.furnished.as_deref());
    insert_text(&mut params, "keyword", criteria.keyword.as_deref());
    insert_text(&mut params, "postcode", criteria.postcode.as_deref());
    insert_criterion(&mut params, "price", criteria.price);
    insert_text(&mut params, "property_id", criteria.property_id.as_deref());
    if let Some(radius) = &criteria.radius {
        if radius.is_complete() {
            params.insert("lat", radius.lat);
            params.insert("lon", radius.lon);
            params.insert("distance", &radius.distance);
        }
    }
    insert_criterion(&mut params, "receptions", criteria.receptions);
    insert_text(&mut params, "status", criteria.status.as_deref());
    insert_text(&mut params, "type", criteria.property_type.as_deref());
    if let Some(updated) = criteria.updated_date {
        params.insert("updated", updated.timestamp());
    }
    params
}

/// Encode a property for fetch-by-id style calls.
pub fn encode_property(property: &Property) -> WireParams {
    let mut params = WireParams::new();
    if let Some(id) = property.id {
        params.insert("id", id);
    }
    params
}

/// `<wire field>:<order>`, falling back to `_id` and `asc`.
fn encode_sort(criteria: &SearchCriteria) -> String {
    let (by, order) = match &criteria.sort {
        Some(sort) => (
            outbound_wire_name(&sort.by).unwrap_or(DEFAULT_SORT_FIELD),
            match sort.order.as_str() {
                "asc" | "desc" => sort.order.as_str(),
                _ => DEFAULT_SORT_ORDER,
            },
        ),
        None => (DEFAULT_SORT_FIELD, DEFAULT_SORT_ORDER),
    };
    format!("{by}:{order}")
}

fn insert_text(params: &mut WireParams, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        params.insert(key, value);
    }
}

fn insert_criterion(params: &mut WireParams, key: &str, criterion: Option<Criterion>) {
    match criterion {
        Some(Criterion::Exact(n)) => params.insert(key, n),
        Some(Criterion::Range { min, max }) => {
            if let Some(min) = min {
                params.insert(format!("{key}_min"), min);
            }
            if let Some(max) = max {
                params.insert(format!("{key}_max"), max);
            }
        }
        None => {}
    }
}
