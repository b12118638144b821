//! Wire schema for property listings.
//!
//! # Design
//! Two static tables are the single source of truth for name and type
//! translation between the service's wire rows (snake_case, loosely typed)
//! and the `Property` record:
//!
//! - `INBOUND` maps a wire key to the declared `FieldType` and the
//!   `PropertyField` it populates. `transform::decode_row` walks it.
//! - `OUTBOUND` maps a domain field name (camelCase) to its wire key. It is
//!   used to resolve sort fields when encoding a search.
//!
//! The tables are not assumed to be inverses of each other. Both are
//! `static` and never mutated.

/// Declared wire type of an inbound field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    StringList,
    /// List of media entries, each a bare URL or `{url, text}` object.
    Media,
    DateTime,
}

/// Every assignable field of a `Property`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyField {
    Address,
    Price,
    PriceBase,
    Area,
    AvailableDate,
    Bathrooms,
    Bedrooms,
    Brochures,
    CompanyId,
    CompanyName,
    Classification,
    UpdatedDate,
    PhotosText,
    EpcDocuments,
    EpcImages,
    Features,
    Featured,
    FeaturedDate,
    FeesText,
    FeesUrl,
    FloorPlans,
    Floors,
    Furnished,
    GroundRent,
    HipDocuments,
    CreatedDate,
    Keywords,
    Description,
    NewHome,
    OfficeEmail,
    OfficeId,
    OfficeManager,
    OfficeName,
    OfficePhone,
    OfficeUrl,
    OutsideSpace,
    Parking,
    Photos,
    PostcodeOut,
    PostcodeIn,
    Postcode,
    PriceQualifier,
    PriceDisplay,
    PrimaryKey,
    Type,
    Receptions,
    RentPeriod,
    DescriptionRtf,
    SellingState,
    ServiceCharge,
    ServiceProvided,
    Title,
    Summary,
    Tenure,
    TenureType,
    Town,
    Category,
    Videos,
    VideosText,
    Id,
    Urls,
    Status,
    Latitude,
    Longitude,
}

impl PropertyField {
    /// Domain (camelCase) name of the field.
    pub fn name(self) -> &'static str {
        use PropertyField::*;
        match self {
            Address => "address",
            Price => "price",
            PriceBase => "priceBase",
            Area => "area",
            AvailableDate => "availableDate",
            Bathrooms => "bathrooms",
            Bedrooms => "bedrooms",
            Brochures => "brochures",
            CompanyId => "companyId",
            CompanyName => "companyName",
            Classification => "classification",
            UpdatedDate => "updatedDate",
            PhotosText => "photosText",
            EpcDocuments => "epcDocuments",
            EpcImages => "epcImages",
            Features => "features",
            Featured => "featured",
            FeaturedDate => "featuredDate",
            FeesText => "feesText",
            FeesUrl => "feesUrl",
            FloorPlans => "floorPlans",
            Floors => "floors",
            Furnished => "furnished",
            GroundRent => "groundRent",
            HipDocuments => "hipDocuments",
            CreatedDate => "createdDate",
            Keywords => "keywords",
            Description => "description",
            NewHome => "newHome",
            OfficeEmail => "officeEmail",
            OfficeId => "officeId",
            OfficeManager => "officeManager",
            OfficeName => "officeName",
            OfficePhone => "officePhone",
            OfficeUrl => "officeUrl",
            OutsideSpace => "outsideSpace",
            Parking => "parking",
            Photos => "photos",
            PostcodeOut => "postcodeOut",
            PostcodeIn => "postcodeIn",
            Postcode => "postcode",
            PriceQualifier => "priceQualifier",
            PriceDisplay => "priceDisplay",
            PrimaryKey => "primaryKey",
            Type => "type",
            Receptions => "receptions",
            RentPeriod => "rentPeriod",
            DescriptionRtf => "descriptionRtf",
            SellingState => "sellingState",
            ServiceCharge => "serviceCharge",
            ServiceProvided => "serviceProvided",
            Title => "title",
            Summary => "summary",
            Tenure => "tenure",
            TenureType => "tenureType",
            Town => "town",
            Category => "category",
            Videos => "videos",
            VideosText => "videosText",
            Id => "id",
            Urls => "urls",
            Status => "status",
            Latitude => "latitude",
            Longitude => "longitude",
        }
    }
}

/// One inbound schema entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub wire: &'static str,
    pub field_type: FieldType,
    pub field: PropertyField,
}

const fn inbound(wire: &'static str, field_type: FieldType, field: PropertyField) -> FieldSpec {
    FieldSpec {
        wire,
        field_type,
        field,
    }
}

/// Wire key → (type, domain field).
pub static INBOUND: &[FieldSpec] = &[
    inbound("address", FieldType::StringList, PropertyField::Address),
    inbound("price", FieldType::Integer, PropertyField::Price),
    inbound("price_base", FieldType::Integer, PropertyField::PriceBase),
    inbound("area", FieldType::String, PropertyField::Area),
    inbound("available_at", FieldType::DateTime, PropertyField::AvailableDate),
    inbound("bathrooms", FieldType::Integer, PropertyField::Bathrooms),
    inbound("bedrooms", FieldType::Integer, PropertyField::Bedrooms),
    inbound("brochures", FieldType::StringList, PropertyField::Brochures),
    inbound("company_id", FieldType::String, PropertyField::CompanyId),
    inbound("company_name", FieldType::String, PropertyField::CompanyName),
    inbound("criteria_type", FieldType::String, PropertyField::Classification),
    inbound("updated_at", FieldType::DateTime, PropertyField::UpdatedDate),
    inbound("photos_text", FieldType::StringList, PropertyField::PhotosText),
    inbound("epc_docs", FieldType::StringList, PropertyField::EpcDocuments),
    inbound("epc_images", FieldType::StringList, PropertyField::EpcImages),
    inbound("features", FieldType::StringList, PropertyField::Features),
    inbound("featured", FieldType::Boolean, PropertyField::Featured),
    inbound("featured_at", FieldType::DateTime, PropertyField::FeaturedDate),
    inbound("fees_text", FieldType::StringList, PropertyField::FeesText),
    inbound("fees_url", FieldType::String, PropertyField::FeesUrl),
    inbound("floor_plans", FieldType::StringList, PropertyField::FloorPlans),
    inbound("floors", FieldType::Integer, PropertyField::Floors),
    inbound("furnished", FieldType::String, PropertyField::Furnished),
    inbound("ground_rent", FieldType::Integer, PropertyField::GroundRent),
    inbound("hip_docs", FieldType::StringList, PropertyField::HipDocuments),
    inbound("inserted_at", FieldType::DateTime, PropertyField::CreatedDate),
    inbound("keywords", FieldType::String, PropertyField::Keywords),
    inbound("description", FieldType::String, PropertyField::Description),
    inbound("new_home", FieldType::String, PropertyField::NewHome),
    inbound("office_email", FieldType::String, PropertyField::OfficeEmail),
    inbound("office_id", FieldType::String, PropertyField::OfficeId),
    inbound("office_manager", FieldType::String, PropertyField::OfficeManager),
    inbound("office_name", FieldType::String, PropertyField::OfficeName),
    inbound("office_phone", FieldType::String, PropertyField::OfficePhone),
    inbound("office_url", FieldType::String, PropertyField::OfficeUrl),
    inbound("outside_space", FieldType::String, PropertyField::OutsideSpace),
    inbound("parking", FieldType::String, PropertyField::Parking),
    inbound("photos", FieldType::Media, PropertyField::Photos),
    inbound("postcode_1", FieldType::String, PropertyField::PostcodeOut),
    inbound("postcode_2", FieldType::String, PropertyField::PostcodeIn),
    inbound("postcode", FieldType::String, PropertyField::Postcode),
    inbound("price_qualifier", FieldType::String, PropertyField::PriceQualifier),
    inbound("price_display", FieldType::String, PropertyField::PriceDisplay),
    inbound("property_id", FieldType::String, PropertyField::PrimaryKey),
    inbound("property_type", FieldType::String, PropertyField::Type),
    inbound("receptions", FieldType::Integer, PropertyField::Receptions),
    inbound("rent_period", FieldType::String, PropertyField::RentPeriod),
    inbound("description_rtf", FieldType::String, PropertyField::DescriptionRtf),
    inbound("selling_state", FieldType::String, PropertyField::SellingState),
    inbound("service_charge", FieldType::Integer, PropertyField::ServiceCharge),
    inbound("service_provided", FieldType::String, PropertyField::ServiceProvided),
    inbound("title", FieldType::String, PropertyField::Title),
    inbound("summary", FieldType::String, PropertyField::Summary),
    inbound("tenure", FieldType::String, PropertyField::Tenure),
    inbound("tenure_type", FieldType::String, PropertyField::TenureType),
    inbound("town", FieldType::String, PropertyField::Town),
    inbound("category", FieldType::String, PropertyField::Category),
    inbound("videos", FieldType::StringList, PropertyField::Videos),
    inbound("videos_text", FieldType::StringList, PropertyField::VideosText),
    inbound("id", FieldType::Integer, PropertyField::Id),
    inbound("urls", FieldType::StringList, PropertyField::Urls),
    inbound("status", FieldType::String, PropertyField::Status),
    inbound("latitude", FieldType::Float, PropertyField::Latitude),
    inbound("longitude", FieldType::Float, PropertyField::Longitude),
];

/// Domain field name → wire key.
pub static OUTBOUND: &[(&str, &str)] = &[
    ("address", "address"),
    ("price", "price"),
    ("priceBase", "price_base"),
    ("area", "area"),
    ("availableDate", "available_at"),
    ("bathrooms", "bathrooms"),
    ("bedrooms", "bedrooms"),
    ("brochures", "brochures"),
    ("companyId", "company_id"),
    ("companyName", "company_name"),
    ("classification", "criteria_type"),
    ("updatedDate", "updated_at"),
    ("photosText", "photos_text"),
    ("epcDocuments", "epc_docs"),
    ("epcImages", "epc_images"),
    ("features", "features"),
    ("featured", "featured"),
    ("featuredDate", "featured_at"),
    ("feesText", "fees_text"),
    ("feesUrl", "fees_url"),
    ("floorPlans", "floor_plans"),
    ("floors", "floors"),
    ("furnished", "furnished"),
    ("groundRent", "ground_rent"),
    ("hipDocuments", "hip_docs"),
    ("createdDate", "inserted_at"),
    ("keywords", "keywords"),
    ("description", "description"),
    ("newHome", "new_home"),
    ("officeEmail", "office_email"),
    ("officeId", "office_id"),
    ("officeManager", "office_manager"),
    ("officeName", "office_name"),
    ("officePhone", "office_phone"),
    ("officeUrl", "office_url"),
    ("outsideSpace", "outside_space"),
    ("parking", "parking"),
    ("photos", "photos"),
    ("postcodeOut", "postcode_1"),
    ("postcodeIn", "postcode_2"),
    ("postcode", "postcode"),
    ("priceQualifier", "price_qualifier"),
    ("priceDisplay", "price_display"),
    ("primaryKey", "property_id"),
    ("type", "property_type"),
    ("receptions", "receptions"),
    ("rentPeriod", "rent_period"),
    ("descriptionRtf", "description_rtf"),
    ("sellingState", "selling_state"),
    ("serviceCharge", "service_charge"),
    ("serviceProvided", "service_provided"),
    ("title", "title"),
    ("summary", "summary"),
    ("tenure", "tenure"),
    ("tenureType", "tenure_type"),
    ("town", "town"),
    ("category", "category"),
    ("videos", "videos"),
    ("videosText", "videos_text"),
    ("id", "id"),
    ("urls", "urls"),
    ("status", "status"),
    ("latitude", "latitude"),
    ("longitude", "longitude"),
];

/// Wire key for a domain field name, if the field is mapped outbound.
pub fn outbound_wire_name(domain: &str) -> Option<&'static str> {
    OUTBOUND
        .iter()
        .find(|(name, _)| *name == domain)
        .map(|(_, wire)| *wire)
}

/// Inbound entry for a wire key, if the key is part of the schema.
pub fn inbound_spec(wire: &str) -> Option<&'static FieldSpec> {
    INBOUND.iter().find(|spec| spec.wire == wire)
}
