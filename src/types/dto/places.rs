use serde::{Deserialize, Deserializer, Serialize};

/// Body of a `places:searchNearby` / `places:searchText` response.
/// The upstream omits `places` entirely when nothing matched.
#[derive(Deserialize, Debug, Default)]
pub struct PlacesResponse {
    #[serde(default)]
    pub places: Vec<Place>,
}

/// A place as returned by the upstream API. Every field is optional, the field
/// mask and the search mode decide what actually comes back.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: Option<String>,
    /// Resource name, `places/{id}`
    pub name: Option<String>,
    /// Legacy API identifier, still seen from older proxies
    #[serde(rename = "place_id")]
    pub legacy_place_id: Option<String>,
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub short_formatted_address: Option<String>,
    pub vicinity: Option<String>,
    pub location: Option<LatLng>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rating: Option<f64>,
    pub price_level: Option<String>,
    pub photos: Option<Vec<Photo>>,
    pub types: Option<Vec<String>>,
    pub primary_type_display_name: Option<LocalizedText>,
    pub editorial_summary: Option<LocalizedText>,
    pub business_status: Option<String>,
    pub current_opening_hours: Option<OpeningHours>,
    pub website_uri: Option<String>,
    pub international_phone_number: Option<String>,
}

impl Place {
    pub fn display_name_text(&self) -> Option<&str> {
        self.display_name
            .as_ref()
            .and_then(|d| d.text.as_deref())
            .filter(|t| !t.is_empty())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    pub text: Option<String>,
    pub language_code: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Resource name, `places/{id}/photos/{ref}`
    pub name: Option<String>,
    pub width_px: Option<u32>,
    pub height_px: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    pub open_now: Option<bool>,
}

/// A rating that isn't a JSON number is treated as missing rather than failing
/// the whole response.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<serde_json::Value>::deserialize(deserializer)?.and_then(|v| v.as_f64()))
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SearchNearbyRequest {
    pub included_types: Vec<String>,
    pub max_result_count: u32,
    pub location_restriction: LocationRestriction,
}

#[derive(Serialize, Debug)]
pub struct LocationRestriction {
    pub circle: Circle,
}

#[derive(Serialize, Debug)]
pub struct Circle {
    pub center: LatLng,
    /// Metres
    pub radius: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchTextRequest {
    pub text_query: String,
    pub max_result_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

/// Error envelope the upstream sends with non-2xx statuses.
#[derive(Deserialize, Debug)]
pub struct UpstreamErrorBody {
    pub error: UpstreamError,
}

#[derive(Deserialize, Debug)]
pub struct UpstreamError {
    pub message: Option<String>,
}
