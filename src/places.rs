use async_trait::async_trait;
use color_eyre::eyre::{eyre, Result};
use geo_types::Point;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    config::Config,
    types::dto::places::{
        Circle, LatLng, LocationRestriction, Place, PlacesResponse, SearchNearbyRequest,
        SearchTextRequest, UpstreamErrorBody,
    },
};

/// Everything the normalizer reads, requested for every search.
pub const FIELD_MASK: &str = "places.id,places.name,places.displayName,places.formattedAddress,\
places.shortFormattedAddress,places.location,places.rating,places.priceLevel,places.photos,\
places.types,places.primaryTypeDisplayName,places.editorialSummary,places.businessStatus,\
places.currentOpeningHours,places.websiteUri,places.internationalPhoneNumber";

pub const NEARBY_RADIUS_METRES: f64 = 1500.0;
pub const NEARBY_MAX_RESULTS: u32 = 10;
pub const TEXT_NEAR_MAX_RESULTS: u32 = 10;
pub const TEXT_QUERY_MAX_RESULTS: u32 = 20;

impl SearchNearbyRequest {
    /// Cafes and restaurants within the search radius of `center` (x = lng, y = lat).
    pub fn around(center: Point<f64>) -> Self {
        SearchNearbyRequest {
            included_types: vec!["cafe".to_string(), "restaurant".to_string()],
            max_result_count: NEARBY_MAX_RESULTS,
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: LatLng {
                        latitude: center.y(),
                        longitude: center.x(),
                    },
                    radius: NEARBY_RADIUS_METRES,
                },
            },
        }
    }
}

impl SearchTextRequest {
    /// The broader text search issued alongside a nearby search.
    pub fn near(center: Point<f64>) -> Self {
        SearchTextRequest {
            text_query: format!("cafes and restaurants near {},{}", center.y(), center.x()),
            max_result_count: TEXT_NEAR_MAX_RESULTS,
            language_code: None,
        }
    }

    pub fn in_area(query: &str) -> Self {
        SearchTextRequest {
            text_query: format!("restaurants and cafes in {query}"),
            max_result_count: TEXT_QUERY_MAX_RESULTS,
            language_code: Some("en".to_string()),
        }
    }
}

/// The upstream places search.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn search_nearby(&self, request: SearchNearbyRequest) -> Result<Vec<Place>>;

    async fn search_text(&self, request: SearchTextRequest) -> Result<Vec<Place>>;
}

pub struct GooglePlaces {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl GooglePlaces {
    /// `client` carries the upstream timeout.
    pub fn new(config: &Config, client: reqwest::Client) -> Self {
        Self {
            client,
            api_base: config.places_api_base.clone(),
            api_key: config.api_key.clone(),
        }
    }

    async fn post<B: Serialize>(&self, operation: &str, body: &B) -> Result<Vec<Place>> {
        let response = self
            .client
            .post(format!("{}/places:{operation}", self.api_base))
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<UpstreamErrorBody>(&text)
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or(text);
            return Err(eyre!("Places API returned {status}: {message}"));
        }

        let places = response.json::<PlacesResponse>().await?.places;
        debug!("{operation} returned {} places", places.len());
        Ok(places)
    }
}

#[async_trait]
impl PlacesProvider for GooglePlaces {
    #[instrument(skip(self))]
    async fn search_nearby(&self, request: SearchNearbyRequest) -> Result<Vec<Place>> {
        self.post("searchNearby", &request).await
    }

    #[instrument(skip(self))]
    async fn search_text(&self, request: SearchTextRequest) -> Result<Vec<Place>> {
        self.post("searchText", &request).await
    }
}
