use serde::{Deserialize, Serialize};

pub const UNKNOWN_PLACE: &str = "Unknown Place";
pub const NOT_AVAILABLE: &str = "N/A";
pub const ADDRESS_NOT_AVAILABLE: &str = "Address not available";

/// What the swipe UI renders. Every field is always present.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlaceRecord {
    pub name: String,
    pub place_id: String,
    /// One decimal place, or "N/A"
    pub rating: String,
    #[serde(rename = "priceLevel")]
    pub price_level: PriceLevel,
    pub address: String,
    pub photo: String,
    #[serde(rename = "type")]
    pub place_type: String,
    pub description: String,
    #[serde(rename = "openNow")]
    pub open_now: bool,
    #[serde(rename = "websiteUri")]
    pub website_uri: String,
    #[serde(rename = "internationalPhoneNumber")]
    pub international_phone_number: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceLevel {
    #[serde(rename = "PRICE_LEVEL_FREE")]
    Free,
    #[serde(rename = "PRICE_LEVEL_INEXPENSIVE")]
    Inexpensive,
    #[serde(rename = "PRICE_LEVEL_MODERATE")]
    Moderate,
    #[serde(rename = "PRICE_LEVEL_EXPENSIVE")]
    Expensive,
    #[serde(rename = "PRICE_LEVEL_VERY_EXPENSIVE")]
    VeryExpensive,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl PriceLevel {
    /// Unknown tiers and `PRICE_LEVEL_UNSPECIFIED` collapse to `NotAvailable`.
    pub fn from_upstream(value: Option<&str>) -> Self {
        match value {
            Some("PRICE_LEVEL_FREE") => PriceLevel::Free,
            Some("PRICE_LEVEL_INEXPENSIVE") => PriceLevel::Inexpensive,
            Some("PRICE_LEVEL_MODERATE") => PriceLevel::Moderate,
            Some("PRICE_LEVEL_EXPENSIVE") => PriceLevel::Expensive,
            Some("PRICE_LEVEL_VERY_EXPENSIVE") => PriceLevel::VeryExpensive,
            _ => PriceLevel::NotAvailable,
        }
    }
}
