use serde::{Deserialize, Serialize};

use crate::types::model::place::PlaceRecord;

/// Query string of `GET /api/search-cafes`. Kept as raw strings so bad numbers
/// can be reported with our own error body.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct SearchParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub query: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SearchResponse {
    pub status: String,
    pub results: Vec<PlaceRecord>,
}

impl SearchResponse {
    pub fn ok(results: Vec<PlaceRecord>) -> Self {
        Self {
            status: "OK".to_string(),
            results,
        }
    }
}
