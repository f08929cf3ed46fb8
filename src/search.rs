use color_eyre::eyre::Result;
use futures::try_join;
use geo_types::Point;
use tracing::{info, instrument};

use crate::{
    config::MergeKeyPolicy,
    merge::merge_places,
    net::response::ResponseError,
    normalize::Normalizer,
    places::PlacesProvider,
    types::{
        dto::{
            places::{SearchNearbyRequest, SearchTextRequest},
            search::SearchParams,
        },
        model::place::PlaceRecord,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchRequest {
    /// x = longitude, y = latitude
    Nearby(Point<f64>),
    Text(String),
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_coordinate(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coordinates win when both `lat` and `lng` are given, otherwise `query` is used.
impl TryFrom<SearchParams> for SearchRequest {
    type Error = ResponseError;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        match (present(params.lat), present(params.lng), present(params.query)) {
            (Some(lat), Some(lng), _) => {
                let (Some(lat), Some(lng)) = (parse_coordinate(&lat), parse_coordinate(&lng))
                else {
                    return Err(ResponseError::bad_request(
                        "Invalid coordinates",
                        "Latitude and longitude must be valid numbers",
                    ));
                };
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
                    return Err(ResponseError::bad_request(
                        "Invalid coordinates",
                        "Latitude must be within [-90, 90] and longitude within [-180, 180]",
                    ));
                }
                Ok(SearchRequest::Nearby(Point::new(lng, lat)))
            }
            (_, _, Some(query)) => Ok(SearchRequest::Text(query)),
            _ => Err(ResponseError::bad_request(
                "Invalid search parameters",
                "Please provide either coordinates (lat, lng) or a location query",
            )),
        }
    }
}

/// Run the upstream searches for `request` and return merged, normalized places.
/// A coordinate search issues a nearby and a text search concurrently.
#[instrument(skip(provider, normalizer))]
pub async fn search_places(
    provider: &dyn PlacesProvider,
    request: &SearchRequest,
    policy: MergeKeyPolicy,
    normalizer: &Normalizer<'_>,
) -> Result<Vec<PlaceRecord>> {
    let (nearby, text) = match request {
        SearchRequest::Nearby(center) => try_join!(
            provider.search_nearby(SearchNearbyRequest::around(*center)),
            provider.search_text(SearchTextRequest::near(*center)),
        )?,
        SearchRequest::Text(query) => (
            Vec::new(),
            provider.search_text(SearchTextRequest::in_area(query)).await?,
        ),
    };
    info!(
        nearby = nearby.len(),
        text = text.len(),
        "upstream searches complete"
    );

    let places = merge_places(nearby, text, policy)
        .into_iter()
        .map(|place| normalizer.normalize(place))
        .collect::<Vec<_>>();
    info!("returning {} places", places.len());
    Ok(places)
}
