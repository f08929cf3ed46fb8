use sha2::{Digest, Sha256};

use crate::{
    config::Config,
    types::{
        dto::places::Place,
        model::place::{PlaceRecord, PriceLevel, ADDRESS_NOT_AVAILABLE, NOT_AVAILABLE, UNKNOWN_PLACE},
    },
};

const PHOTO_MAX_HEIGHT_PX: u32 = 400;
const PLACEHOLDER_BASE: &str = "https://via.placeholder.com/400x200";

/// Turns merged upstream places into records for the UI. Never fails, missing
/// data is replaced with sentinels.
pub struct Normalizer<'a> {
    api_base: &'a str,
    api_key: &'a str,
}

impl<'a> Normalizer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            api_base: &config.places_api_base,
            api_key: &config.api_key,
        }
    }

    pub fn normalize(&self, place: Place) -> PlaceRecord {
        let name = place
            .display_name_text()
            .or(place.name.as_deref().filter(|n| !n.is_empty()))
            .unwrap_or(UNKNOWN_PLACE)
            .to_string();
        let address = first_non_empty([
            &place.formatted_address,
            &place.short_formatted_address,
            &place.vicinity,
        ])
        .unwrap_or(ADDRESS_NOT_AVAILABLE)
        .to_string();
        let resource_id = place
            .name
            .as_deref()
            .and_then(|n| n.strip_prefix("places/"))
            .filter(|id| !id.is_empty());
        let place_id = place
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or(resource_id)
            .or(place.legacy_place_id.as_deref().filter(|id| !id.is_empty()))
            .map(String::from)
            .unwrap_or_else(|| generate_place_id(&name, &address));

        let photo = match place
            .photos
            .as_ref()
            .and_then(|photos| photos.first())
            .and_then(|photo| photo.name.as_deref())
            .filter(|reference| !reference.is_empty())
        {
            Some(reference) => self.photo_url(reference),
            None => placeholder_url(&name),
        };

        let place_type = place
            .primary_type_display_name
            .as_ref()
            .and_then(|t| t.text.clone())
            .filter(|t| !t.is_empty())
            .or_else(|| place.types.as_ref().and_then(|types| types.first().cloned()))
            .unwrap_or_default();

        let open_now = place
            .current_opening_hours
            .as_ref()
            .and_then(|hours| hours.open_now)
            .unwrap_or(place.business_status.as_deref() == Some("OPERATIONAL"));

        PlaceRecord {
            rating: format_rating(place.rating),
            price_level: PriceLevel::from_upstream(place.price_level.as_deref()),
            description: place
                .editorial_summary
                .and_then(|summary| summary.text)
                .unwrap_or_default(),
            website_uri: place.website_uri.unwrap_or_default(),
            international_phone_number: place.international_phone_number.unwrap_or_default(),
            name,
            place_id,
            address,
            photo,
            place_type,
            open_now,
        }
    }

    fn photo_url(&self, reference: &str) -> String {
        format!(
            "{}/{}/media?maxHeightPx={}&key={}",
            self.api_base,
            reference,
            PHOTO_MAX_HEIGHT_PX,
            urlencoding::encode(self.api_key)
        )
    }
}

fn first_non_empty<const N: usize>(candidates: [&Option<String>; N]) -> Option<&str> {
    candidates
        .into_iter()
        .filter_map(|c| c.as_deref())
        .find(|c| !c.is_empty())
}

pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(rating) if rating.is_finite() => format!("{rating:.1}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn placeholder_url(name: &str) -> String {
    format!("{PLACEHOLDER_BASE}?text={}", urlencoding::encode(name))
}

/// Deterministic id for places the upstream gave no identifier for, so the
/// same place gets the same id across searches.
pub fn generate_place_id(name: &str, address: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update([0u8]);
    hasher.update(address.as_bytes());
    let hash = hasher.finalize();
    format!("generated_{}", hex::encode(&hash[..12]))
}
