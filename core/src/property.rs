//! A single property listing.
//!
//! # Design
//! `Property` is a flat record of optional, typed fields. A field is `None`
//! when the wire row did not carry it, or carried a blank value, so callers
//! can tell "not provided" apart from zero. Values only enter through
//! `transform::decode_row`, which goes through `assign`.
//!
//! Grouped views (`office`, `fees`, `videos`, `coordinates`) are derived on
//! demand from the flat fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::http::ApiResponse;
use crate::schema::PropertyField;
use crate::search::{CATEGORY_LETTINGS, CATEGORY_SALES};
use crate::transform::{decode_row, encode_property, FieldValue, WireParams};

pub const CLASSIFICATION_COMMERCIAL: &str = "Commercial Property";

/// A photo or similar media link with an optional caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    pub text: Option<String>,
}

/// Branch office details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Office {
    pub id: Option<String>,
    pub manager: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
}

/// Fee schedule: a link and/or free-text lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Fees {
    pub url: Option<String>,
    pub text: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub address: Option<Vec<String>>,
    pub price: Option<i64>,
    pub price_base: Option<i64>,
    pub area: Option<String>,
    pub available_date: Option<DateTime<Utc>>,
    pub bathrooms: Option<i64>,
    pub bedrooms: Option<i64>,
    pub brochures: Option<Vec<String>>,
    pub company_id: Option<String>,
    pub company_name: Option<String>,
    pub classification: Option<String>,
    pub updated_date: Option<DateTime<Utc>>,
    pub photos_text: Option<Vec<String>>,
    pub epc_documents: Option<Vec<String>>,
    pub epc_images: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub featured_date: Option<DateTime<Utc>>,
    pub fees_text: Option<Vec<String>>,
    pub fees_url: Option<String>,
    pub floor_plans: Option<Vec<String>>,
    pub floors: Option<i64>,
    pub furnished: Option<String>,
    pub ground_rent: Option<i64>,
    pub hip_documents: Option<Vec<String>>,
    pub created_date: Option<DateTime<Utc>>,
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub new_home: Option<String>,
    pub office_email: Option<String>,
    pub office_id: Option<String>,
    pub office_manager: Option<String>,
    pub office_name: Option<String>,
    pub office_phone: Option<String>,
    pub office_url: Option<String>,
    pub outside_space: Option<String>,
    pub parking: Option<String>,
    pub photos: Option<Vec<Media>>,
    pub postcode_out: Option<String>,
    pub postcode_in: Option<String>,
    pub postcode: Option<String>,
    pub price_qualifier: Option<String>,
    pub price_display: Option<String>,
    pub primary_key: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub receptions: Option<i64>,
    pub rent_period: Option<String>,
    pub description_rtf: Option<String>,
    pub selling_state: Option<String>,
    pub service_charge: Option<i64>,
    pub service_provided: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub tenure: Option<String>,
    pub tenure_type: Option<String>,
    pub town: Option<String>,
    pub category: Option<String>,
    pub videos: Option<Vec<String>>,
    pub videos_text: Option<Vec<String>>,
    pub id: Option<i64>,
    pub urls: Option<Vec<String>>,
    pub status: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Property {
    /// Decode one wire row.
    pub fn from_row(row: &serde_json::Map<String, Value>) -> Result<Self, ClientError> {
        decode_row(row)
    }

    /// Build from a single-resource response.
    ///
    /// Anything other than an `OK` response with an object body is a soft
    /// miss and yields an empty property whose `id` is `None`.
    pub fn parse(response: &ApiResponse) -> Result<Self, ClientError> {
        match response.matched_content() {
            Some(Value::Object(row)) => Self::from_row(row),
            _ => {
                tracing::debug!(
                    status = response.status_code,
                    reason = %response.reason_phrase,
                    "no property in response"
                );
                Ok(Self::default())
            }
        }
    }

    /// Parameters identifying this property.
    pub fn to_wire_params(&self) -> WireParams {
        encode_property(self)
    }

    pub(crate) fn assign(&mut self, field: PropertyField, value: FieldValue) -> Result<(), ClientError> {
        use FieldValue as V;
        use PropertyField as F;

        match (field, value) {
            (F::Address, V::List(v)) => self.address = Some(v),
            (F::Price, V::Integer(v)) => self.price = Some(v),
            (F::PriceBase, V::Integer(v)) => self.price_base = Some(v),
            (F::Area, V::Text(v)) => self.area = Some(v),
            (F::AvailableDate, V::DateTime(v)) => self.available_date = Some(v),
            (F::Bathrooms, V::Integer(v)) => self.bathrooms = Some(v),
            (F::Bedrooms, V::Integer(v)) => self.bedrooms = Some(v),
            (F::Brochures, V::List(v)) => self.brochures = Some(v),
            (F::CompanyId, V::Text(v)) => self.company_id = Some(v),
            (F::CompanyName, V::Text(v)) => self.company_name = Some(v),
            (F::Classification, V::Text(v)) => self.classification = Some(v),
            (F::UpdatedDate, V::DateTime(v)) => self.updated_date = Some(v),
            (F::PhotosText, V::List(v)) => self.photos_text = Some(v),
            (F::EpcDocuments, V::List(v)) => self.epc_documents = Some(v),
            (F::EpcImages, V::List(v)) => self.epc_images = Some(v),
            (F::Features, V::List(v)) => self.features = Some(v),
            (F::Featured, V::Boolean(v)) => self.featured = Some(v),
            (F::FeaturedDate, V::DateTime(v)) => self.featured_date = Some(v),
            (F::FeesText, V::List(v)) => self.fees_text = Some(v),
            (F::FeesUrl, V::Text(v)) => self.fees_url = Some(v),
            (F::FloorPlans, V::List(v)) => self.floor_plans = Some(v),
            (F::Floors, V::Integer(v)) => self.floors = Some(v),
            (F::Furnished, V::Text(v)) => self.furnished = Some(v),
            (F::GroundRent, V::Integer(v)) => self.ground_rent = Some(v),
            (F::HipDocuments, V::List(v)) => self.hip_documents = Some(v),
            (F::CreatedDate, V::DateTime(v)) => self.created_date = Some(v),
            (F::Keywords, V::Text(v)) => self.keywords = Some(v),
            (F::Description, V::Text(v)) => self.description = Some(v),
            (F::NewHome, V::Text(v)) => self.new_home = Some(v),
            (F::OfficeEmail, V::Text(v)) => self.office_email = Some(v),
            (F::OfficeId, V::Text(v)) => self.office_id = Some(v),
            (F::OfficeManager, V::Text(v)) => self.office_manager = Some(v),
            (F::OfficeName, V::Text(v)) => self.office_name = Some(v),
            (F::OfficePhone, V::Text(v)) => self.office_phone = Some(v),
            (F::OfficeUrl, V::Text(v)) => self.office_url = Some(v),
            (F::OutsideSpace, V::Text(v)) => self.outside_space = Some(v),
            (F::Parking, V::Text(v)) => self.parking = Some(v),
            (F::Photos, V::Media(v)) => self.photos = Some(v),
            (F::PostcodeOut, V::Text(v)) => self.postcode_out = Some(v),
            (F::PostcodeIn, V::Text(v)) => self.postcode_in = Some(v),
            (F::Postcode, V::Text(v)) => self.postcode = Some(v),
            (F::PriceQualifier, V::Text(v)) => self.price_qualifier = Some(v),
            (F::PriceDisplay, V::Text(v)) => self.price_display = Some(v),
            (F::PrimaryKey, V::Text(v)) => self.primary_key = Some(v),
            (F::Type, V::Text(v)) => self.property_type = Some(v),
            (F::Receptions, V::Integer(v)) => self.receptions = Some(v),
            (F::RentPeriod, V::Text(v)) => self.rent_period = Some(v),
            (F::DescriptionRtf, V::Text(v)) => self.description_rtf = Some(v),
            (F::SellingState, V::Text(v)) => self.selling_state = Some(v),
            (F::ServiceCharge, V::Integer(v)) => self.service_charge = Some(v),
            (F::ServiceProvided, V::Text(v)) => self.service_provided = Some(v),
            (F::Title, V::Text(v)) => self.title = Some(v),
            (F::Summary, V::Text(v)) => self.summary = Some(v),
            (F::Tenure, V::Text(v)) => self.tenure = Some(v),
            (F::TenureType, V::Text(v)) => self.tenure_type = Some(v),
            (F::Town, V::Text(v)) => self.town = Some(v),
            (F::Category, V::Text(v)) => self.category = Some(v),
            (F::Videos, V::List(v)) => self.videos = Some(v),
            (F::VideosText, V::List(v)) => self.videos_text = Some(v),
            (F::Id, V::Integer(v)) => self.id = Some(v),
            (F::Urls, V::List(v)) => self.urls = Some(v),
            (F::Status, V::Text(v)) => self.status = Some(v),
            (F::Latitude, V::Float(v)) => self.latitude = Some(v),
            (F::Longitude, V::Float(v)) => self.longitude = Some(v),
            (field, _) => return Err(ClientError::SchemaMismatch { field: field.name() }),
        }
        Ok(())
    }

    /// Address lines joined with `glue`, e.g. `", "`.
    pub fn address_line(&self, glue: &str) -> Option<String> {
        self.address.as_ref().map(|lines| lines.join(glue))
    }

    /// Feature term at position `index`.
    pub fn feature(&self, index: usize) -> Option<&str> {
        self.features.as_ref()?.get(index).map(String::as_str)
    }

    pub fn photo(&self, index: usize) -> Option<&Media> {
        self.photos.as_ref()?.get(index)
    }

    pub fn photo_url(&self, index: usize) -> Option<&str> {
        self.photo(index).map(|p| p.url.as_str())
    }

    pub fn photo_text(&self, index: usize) -> Option<&str> {
        self.photo(index)?.text.as_deref()
    }

    /// Video links paired with their captions by position.
    pub fn videos(&self) -> Vec<Media> {
        let captions = self.videos_text.as_deref().unwrap_or_default();
        self.videos
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, url)| Media {
                url: url.clone(),
                text: captions.get(i).cloned(),
            })
            .collect()
    }

    pub fn fees(&self) -> Fees {
        Fees {
            url: self.fees_url.clone(),
            text: self.fees_text.clone().unwrap_or_default(),
        }
    }

    pub fn office(&self) -> Office {
        Office {
            id: self.office_id.clone(),
            manager: self.office_manager.clone(),
            email: self.office_email.clone(),
            name: self.office_name.clone(),
            phone: self.office_phone.clone(),
            url: self.office_url.clone(),
        }
    }

    /// Latitude/longitude pair, when both are known.
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates {
            lat: self.latitude?,
            lon: self.longitude?,
        })
    }

    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }

    pub fn is_new_home(&self) -> bool {
        self.new_home.as_deref() == Some("Y")
    }

    pub fn classification_of(&self, classification: &str) -> bool {
        self.classification.as_deref() == Some(classification)
    }

    pub fn is_commercial(&self) -> bool {
        self.classification_of(CLASSIFICATION_COMMERCIAL)
    }

    pub fn category_of(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }

    pub fn is_sales(&self) -> bool {
        self.category_of(CATEGORY_SALES)
    }

    pub fn is_lettings(&self) -> bool {
        self.category_of(CATEGORY_LETTINGS)
    }

    pub fn status_of(&self, status: &str) -> bool {
        self.status.as_deref() == Some(status)
    }

    /// Format one of the listing dates, or return `default` when unset.
    pub fn format_date(date: Option<DateTime<Utc>>, format: &str, default: &str) -> String {
        match date {
            Some(date) => date.format(format).to_string(),
            None => default.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn response(reason: &str, content: Value) -> ApiResponse {
        ApiResponse {
            status_code: if reason == "OK" { 200 } else { 404 },
            reason_phrase: reason.to_string(),
            content,
        }
    }

    fn sample() -> Property {
        let row = json!({
            "id": 569365,
            "address": ["Flat 2", "10 Queensway", "London"],
            "category": "Lettings",
            "criteria_type": "Commercial Property",
            "new_home": "Y",
            "featured": "1",
            "office_name": "Bayswater",
            "office_phone": "020 7000 0000",
            "fees_url": "https://agent.example/fees",
            "fees_text": ["Admin fee", "Reference fee"],
            "videos": ["https://video.example/1", "https://video.example/2"],
            "videos_text": ["Walkthrough"],
            "photos": [{"url": "https://cdn.example/1.jpg", "text": "Lounge"}],
            "latitude": 51.51,
            "longitude": -0.18,
            "status": "Available",
        });
        Property::from_row(row.as_object().unwrap()).unwrap()
    }

    #[test]
    fn parse_ok_response_decodes_row() {
        let property = Property::parse(&response("OK", json!({"id": 7, "title": "Mews house"}))).unwrap();
        assert_eq!(property.id, Some(7));
        assert_eq!(property.title.as_deref(), Some("Mews house"));
    }

    #[test]
    fn parse_not_ok_is_soft_miss() {
        let property = Property::parse(&response("Not Found", json!({"id": 7}))).unwrap();
        assert_eq!(property.id, None);
        assert_eq!(property, Property::default());
    }

    #[test]
    fn parse_empty_content_is_soft_miss() {
        let property = Property::parse(&response("OK", json!({}))).unwrap();
        assert_eq!(property.id, None);
        let property = Property::parse(&response("OK", Value::Null)).unwrap();
        assert_eq!(property.id, None);
    }

    #[test]
    fn assign_rejects_mismatched_value_type() {
        let mut property = Property::default();
        let err = property
            .assign(PropertyField::Price, FieldValue::Text("cheap".to_string()))
            .unwrap_err();
        assert!(matches!(err, ClientError::SchemaMismatch { field: "price" }));
    }

    #[test]
    fn derived_views() {
        let property = sample();
        assert_eq!(
            property.address_line(", ").as_deref(),
            Some("Flat 2, 10 Queensway, London")
        );
        assert!(property.is_lettings());
        assert!(!property.is_sales());
        assert!(property.is_commercial());
        assert!(property.is_new_home());
        assert!(property.is_featured());
        assert!(property.status_of("Available"));
        assert_eq!(property.office().name.as_deref(), Some("Bayswater"));
        assert_eq!(property.fees().text.len(), 2);
        assert_eq!(property.photo_url(0), Some("https://cdn.example/1.jpg"));
        assert_eq!(property.photo_text(0), Some("Lounge"));
        assert_eq!(property.photo_url(1), None);
        assert_eq!(
            property.coordinates(),
            Some(Coordinates { lat: 51.51, lon: -0.18 })
        );
    }

    #[test]
    fn videos_pair_captions_by_position() {
        let videos = sample().videos();
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].text.as_deref(), Some("Walkthrough"));
        assert_eq!(videos[1].text, None);
    }

    #[test]
    fn empty_property_has_no_derived_values() {
        let property = Property::default();
        assert!(property.videos().is_empty());
        assert_eq!(property.coordinates(), None);
        assert_eq!(property.feature(0), None);
        assert!(!property.is_featured());
        assert_eq!(property.fees(), Fees::default());
    }

    #[test]
    fn format_date_falls_back_to_default() {
        let date = Utc.with_ymd_and_hms(2016, 5, 4, 0, 0, 0).unwrap();
        assert_eq!(Property::format_date(Some(date), "%d/%m/%Y", "-"), "04/05/2016");
        assert_eq!(Property::format_date(None, "%d/%m/%Y", "-"), "-");
    }

    #[test]
    fn serializes_with_domain_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 569365);
        assert_eq!(json["officeName"], "Bayswater");
        assert!(json.get("office_name").is_none());
    }
}
