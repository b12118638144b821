//! Immutable property search builder.
//!
//! # Design
//! `Search` wraps a plain `SearchCriteria` record. Every setter takes
//! `&self` and returns a new `Search` with one field changed, so a
//! configured search can be kept as a preset and shared between threads
//! while callers derive narrower searches from it.
//!
//! Numeric criteria (bathrooms, bedrooms, price, receptions) take anything
//! implementing `IntoCriterion`: integers, numeric strings, `Criterion`
//! values and the inclusive Rust range forms. Input that is not numeric is
//! ignored and the field keeps its previous value.

use std::fmt;
use std::ops::{RangeFrom, RangeInclusive, RangeToInclusive};

use chrono::{DateTime, Utc};

use crate::transform::{encode_search, parse_numeric, WireParams};

pub const CATEGORY_SALES: &str = "Sales";
pub const CATEGORY_LETTINGS: &str = "Lettings";

/// Distance used by `Search::radius_default`.
pub const DEFAULT_RADIUS_DISTANCE: &str = "20km";

/// An exact value or an optional `{min, max}` bound pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Exact(i64),
    Range { min: Option<i64>, max: Option<i64> },
}

impl Criterion {
    pub fn range(min: Option<i64>, max: Option<i64>) -> Self {
        Criterion::Range { min, max }
    }

    pub fn at_least(min: i64) -> Self {
        Criterion::range(Some(min), None)
    }

    pub fn at_most(max: i64) -> Self {
        Criterion::range(None, Some(max))
    }

    pub fn between(min: i64, max: i64) -> Self {
        Criterion::range(Some(min), Some(max))
    }
}

/// Conversion into a numeric criterion; `None` means "not numeric".
pub trait IntoCriterion {
    fn into_criterion(self) -> Option<Criterion>;
}

impl IntoCriterion for Criterion {
    fn into_criterion(self) -> Option<Criterion> {
        Some(self)
    }
}

macro_rules! exact_criterion {
    ($($int:ty),*) => {
        $(
            impl IntoCriterion for $int {
                fn into_criterion(self) -> Option<Criterion> {
                    i64::try_from(self).ok().map(Criterion::Exact)
                }
            }
        )*
    };
}

exact_criterion!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl IntoCriterion for &str {
    fn into_criterion(self) -> Option<Criterion> {
        parse_numeric(self).map(|n| Criterion::Exact(n as i64))
    }
}

impl IntoCriterion for String {
    fn into_criterion(self) -> Option<Criterion> {
        self.as_str().into_criterion()
    }
}

impl IntoCriterion for RangeInclusive<i64> {
    fn into_criterion(self) -> Option<Criterion> {
        Some(Criterion::between(*self.start(), *self.end()))
    }
}

impl IntoCriterion for RangeFrom<i64> {
    fn into_criterion(self) -> Option<Criterion> {
        Some(Criterion::at_least(self.start))
    }
}

impl IntoCriterion for RangeToInclusive<i64> {
    fn into_criterion(self) -> Option<Criterion> {
        Some(Criterion::at_most(self.end))
    }
}

/// One feature term, optionally pinned to a numbered feature slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub term: String,
    pub slot: Option<u32>,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot {
            Some(slot) => write!(f, "{}:{slot}", self.term),
            None => write!(f, "{}", self.term),
        }
    }
}

impl From<&str> for Feature {
    fn from(term: &str) -> Self {
        Feature {
            term: term.to_string(),
            slot: None,
        }
    }
}

impl From<String> for Feature {
    fn from(term: String) -> Self {
        Feature { term, slot: None }
    }
}

impl From<(&str, u32)> for Feature {
    fn from((term, slot): (&str, u32)) -> Self {
        Feature {
            term: term.to_string(),
            slot: Some(slot),
        }
    }
}

impl From<(String, u32)> for Feature {
    fn from((term, slot): (String, u32)) -> Self {
        Feature {
            term,
            slot: Some(slot),
        }
    }
}

/// Geographic radius criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct Radius {
    pub lat: f64,
    pub lon: f64,
    pub distance: String,
}

impl Radius {
    /// Finite coordinates and a non-empty distance.
    pub fn is_complete(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite() && !self.distance.is_empty()
    }
}

/// Requested ordering. `by` is a domain field name; `order` is stored
/// lower-cased and validated when encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub by: String,
    pub order: String,
}

/// Plain record of everything a search can constrain.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub size: u32,
    pub from: u32,
    /// 1 for formatted results, 0 for raw rows.
    pub format: u8,
    pub sort: Option<Sort>,
    /// 1 excludes listings marked not available; 0 includes them.
    pub availability: u8,
    pub address: Option<String>,
    pub bathrooms: Option<Criterion>,
    pub bedrooms: Option<Criterion>,
    pub category: Option<String>,
    pub classification: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    pub features: Vec<Feature>,
    pub featured: Option<i64>,
    pub furnished: Option<String>,
    pub keyword: Option<String>,
    pub postcode: Option<String>,
    pub price: Option<Criterion>,
    pub property_id: Option<String>,
    pub radius: Option<Radius>,
    pub receptions: Option<Criterion>,
    pub status: Option<String>,
    pub property_type: Option<String>,
    pub updated_date: Option<DateTime<Utc>>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            size: 1,
            from: 0,
            format: 1,
            sort: None,
            availability: 1,
            address: None,
            bathrooms: None,
            bedrooms: None,
            category: None,
            classification: None,
            created_date: None,
            features: Vec::new(),
            featured: None,
            furnished: None,
            keyword: None,
            postcode: None,
            price: None,
            property_id: None,
            radius: None,
            receptions: None,
            status: None,
            property_type: None,
            updated_date: None,
        }
    }
}

/// Fluent, copy-on-write search builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Search {
    criteria: SearchCriteria,
}

impl Search {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    /// Query parameters for this search.
    pub fn to_wire_params(&self) -> WireParams {
        encode_search(&self.criteria)
    }

    fn with(&self, change: impl FnOnce(&mut SearchCriteria)) -> Search {
        let mut criteria = self.criteria.clone();
        change(&mut criteria);
        Search { criteria }
    }

    fn with_criterion(
        &self,
        value: impl IntoCriterion,
        field: impl FnOnce(&mut SearchCriteria) -> &mut Option<Criterion>,
    ) -> Search {
        match value.into_criterion() {
            Some(criterion) => self.with(|c| *field(c) = Some(criterion)),
            None => self.clone(),
        }
    }

    /// Number of rows to return.
    pub fn size(&self, size: u32) -> Search {
        self.with(|c| c.size = size)
    }

    /// Offset of the first row.
    pub fn from(&self, from: u32) -> Search {
        self.with(|c| c.from = from)
    }

    pub fn format(&self, formatted: bool) -> Search {
        self.with(|c| c.format = u8::from(formatted))
    }

    /// Multi-phrase match against the address fields.
    pub fn address(&self, address: impl Into<String>) -> Search {
        let address = address.into();
        self.with(|c| c.address = Some(address))
    }

    pub fn availability(&self, available: bool) -> Search {
        self.with(|c| c.availability = u8::from(available))
    }

    pub fn available(&self) -> Search {
        self.availability(true)
    }

    pub fn unavailable(&self) -> Search {
        self.availability(false)
    }

    pub fn bathrooms(&self, value: impl IntoCriterion) -> Search {
        self.with_criterion(value, |c| &mut c.bathrooms)
    }

    pub fn bedrooms(&self, value: impl IntoCriterion) -> Search {
        self.with_criterion(value, |c| &mut c.bedrooms)
    }

    pub fn category(&self, category: impl Into<String>) -> Search {
        let category = category.into();
        self.with(|c| c.category = Some(category))
    }

    pub fn sales(&self) -> Search {
        self.category(CATEGORY_SALES)
    }

    pub fn lettings(&self) -> Search {
        self.category(CATEGORY_LETTINGS)
    }

    pub fn classification(&self, classification: impl Into<String>) -> Search {
        let classification = classification.into();
        self.with(|c| c.classification = Some(classification))
    }

    pub fn created_date(&self, created: DateTime<Utc>) -> Search {
        self.with(|c| c.created_date = Some(created))
    }

    /// Append a feature term. Order of calls is preserved on the wire.
    pub fn feature(&self, term: impl Into<String>, slot: Option<u32>) -> Search {
        let feature = Feature {
            term: term.into(),
            slot,
        };
        self.with(|c| c.features.push(feature))
    }

    /// Append several features; bare terms and `(term, slot)` pairs mix freely
    /// once converted with `Feature::from`.
    pub fn features<I>(&self, features: I) -> Search
    where
        I: IntoIterator,
        I::Item: Into<Feature>,
    {
        features.into_iter().fold(self.clone(), |search, item| {
            let Feature { term, slot } = item.into();
            search.feature(term, slot)
        })
    }

    pub fn featured(&self, featured: i64) -> Search {
        self.with(|c| c.featured = Some(featured))
    }

    pub fn furnished(&self, furnished: impl Into<String>) -> Search {
        let furnished = furnished.into();
        self.with(|c| c.furnished = Some(furnished))
    }

    /// Fuzzy match against description, postcode, address and town.
    pub fn keyword(&self, keyword: impl Into<String>) -> Search {
        let keyword = keyword.into();
        self.with(|c| c.keyword = Some(keyword))
    }

    /// Prefix phrase match against the full postcode.
    pub fn postcode(&self, postcode: impl Into<String>) -> Search {
        let postcode = postcode.into();
        self.with(|c| c.postcode = Some(postcode))
    }

    pub fn price(&self, value: impl IntoCriterion) -> Search {
        self.with_criterion(value, |c| &mut c.price)
    }

    /// Match a numeric web id or a primary-key UUID.
    pub fn property_id(&self, id: impl Into<String>) -> Search {
        let id = id.into();
        self.with(|c| c.property_id = Some(id))
    }

    pub fn radius(&self, lat: f64, lon: f64, distance: impl Into<String>) -> Search {
        let radius = Radius {
            lat,
            lon,
            distance: distance.into(),
        };
        self.with(|c| c.radius = Some(radius))
    }

    /// `radius` with `DEFAULT_RADIUS_DISTANCE`.
    pub fn radius_default(&self, lat: f64, lon: f64) -> Search {
        self.radius(lat, lon, DEFAULT_RADIUS_DISTANCE)
    }

    pub fn receptions(&self, value: impl IntoCriterion) -> Search {
        self.with_criterion(value, |c| &mut c.receptions)
    }

    pub fn status(&self, status: impl Into<String>) -> Search {
        let status = status.into();
        self.with(|c| c.status = Some(status))
    }

    pub fn property_type(&self, property_type: impl Into<String>) -> Search {
        let property_type = property_type.into();
        self.with(|c| c.property_type = Some(property_type))
    }

    pub fn updated_date(&self, updated: DateTime<Utc>) -> Search {
        self.with(|c| c.updated_date = Some(updated))
    }

    pub fn sort(&self, by: impl Into<String>, order: &str) -> Search {
        let sort = Sort {
            by: by.into(),
            order: order.to_lowercase(),
        };
        self.with(|c| c.sort = Some(sort))
    }
}
