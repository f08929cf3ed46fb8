use std::collections::HashMap;

use crate::{
    config::MergeKeyPolicy,
    types::dto::places::{LocalizedText, Photo, Place},
};

/// A value that counts as missing when merging, even if the upstream sent it.
trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for f64 {
    fn is_blank(&self) -> bool {
        !self.is_finite()
    }
}

impl Blank for Vec<Photo> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for LocalizedText {
    fn is_blank(&self) -> bool {
        self.text.as_deref().map_or(true, str::is_empty)
    }
}

fn existing_first<T: Blank>(existing: Option<T>, new: Option<T>) -> Option<T> {
    existing.filter(|v| !v.is_blank()).or(new)
}

/// Key under which a place is deduplicated. `None` means the place can't be
/// addressed at all and is dropped.
pub fn merge_key(place: &Place, policy: MergeKeyPolicy) -> Option<String> {
    let upstream_id = place
        .id
        .as_deref()
        .or_else(|| {
            place
                .name
                .as_deref()
                .map(|n| n.strip_prefix("places/").unwrap_or(n))
        })
        .or(place.legacy_place_id.as_deref())
        .filter(|id| !id.is_empty());

    match policy {
        MergeKeyPolicy::DisplayName => place
            .display_name_text()
            .or(upstream_id)
            .map(String::from),
        MergeKeyPolicy::Stable => upstream_id.map(String::from).or_else(|| {
            place.display_name_text().map(|name| {
                format!(
                    "{name}\u{1f}{}",
                    place.formatted_address.as_deref().unwrap_or_default()
                )
            })
        }),
    }
}

/// Fold a later sighting of a place into the one already stored. Fields in the
/// whitelist keep the stored value when it's non-empty; everything else takes
/// the newer value when the newer one has it.
fn merge_pair(existing: Place, new: Place) -> Place {
    Place {
        rating: existing_first(existing.rating, new.rating),
        price_level: existing_first(existing.price_level, new.price_level),
        formatted_address: existing_first(existing.formatted_address, new.formatted_address),
        photos: existing_first(existing.photos, new.photos),
        editorial_summary: existing_first(existing.editorial_summary, new.editorial_summary),
        primary_type_display_name: existing_first(
            existing.primary_type_display_name,
            new.primary_type_display_name,
        ),
        business_status: existing_first(existing.business_status, new.business_status),

        id: new.id.or(existing.id),
        name: new.name.or(existing.name),
        legacy_place_id: new.legacy_place_id.or(existing.legacy_place_id),
        display_name: new.display_name.or(existing.display_name),
        short_formatted_address: new
            .short_formatted_address
            .or(existing.short_formatted_address),
        vicinity: new.vicinity.or(existing.vicinity),
        location: new.location.or(existing.location),
        types: new.types.or(existing.types),
        current_opening_hours: new.current_opening_hours.or(existing.current_opening_hours),
        website_uri: new.website_uri.or(existing.website_uri),
        international_phone_number: new
            .international_phone_number
            .or(existing.international_phone_number),
    }
}

/// Merge nearby results followed by text results into one list, one entry per
/// merge key, ordered by where each key first appeared.
pub fn merge_places(nearby: Vec<Place>, text: Vec<Place>, policy: MergeKeyPolicy) -> Vec<Place> {
    let mut merged: Vec<Place> = Vec::with_capacity(nearby.len() + text.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for place in nearby.into_iter().chain(text) {
        let Some(key) = merge_key(&place, policy) else {
            continue;
        };
        match positions.get(&key) {
            Some(&index) => {
                let existing = std::mem::take(&mut merged[index]);
                merged[index] = merge_pair(existing, place);
            }
            None => {
                positions.insert(key, merged.len());
                merged.push(place);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn places(value: Value) -> Vec<Place> {
        serde_json::from_value(value).unwrap()
    }

    fn names(merged: &[Place]) -> Vec<&str> {
        merged
            .iter()
            .map(|p| p.display_name_text().unwrap_or_default())
            .collect()
    }

    #[test]
    fn fields_from_both_searches_are_combined() {
        let merged = merge_places(
            places(json!([{ "displayName": { "text": "Cafe A" }, "rating": 4.2 }])),
            places(json!([{ "displayName": { "text": "Cafe A" }, "priceLevel": "PRICE_LEVEL_MODERATE" }])),
            MergeKeyPolicy::DisplayName,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].display_name_text(), Some("Cafe A"));
        assert_eq!(merged[0].rating, Some(4.2));
        assert_eq!(merged[0].price_level.as_deref(), Some("PRICE_LEVEL_MODERATE"));
    }

    #[test]
    fn first_seen_rating_wins() {
        let merged = merge_places(
            places(json!([{ "displayName": { "text": "Cafe A" }, "rating": 4.2 }])),
            places(json!([{ "displayName": { "text": "Cafe A" }, "rating": 3.1 }])),
            MergeKeyPolicy::DisplayName,
        );
        assert_eq!(merged[0].rating, Some(4.2));
    }

    #[test]
    fn empty_existing_field_takes_new_value() {
        let merged = merge_places(
            places(json!([{ "displayName": { "text": "Cafe A" }, "formattedAddress": "", "photos": [] }])),
            places(json!([{
                "displayName": { "text": "Cafe A" },
                "formattedAddress": "1 Main St",
                "photos": [{ "name": "places/x/photos/y" }]
            }])),
            MergeKeyPolicy::DisplayName,
        );
        assert_eq!(merged[0].formatted_address.as_deref(), Some("1 Main St"));
        assert_eq!(merged[0].photos.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn non_whitelisted_fields_prefer_new_but_keep_existing() {
        let merged = merge_places(
            places(json!([{ "displayName": { "text": "Cafe A" }, "id": "old", "websiteUri": "https://a.example" }])),
            places(json!([{ "displayName": { "text": "Cafe A" }, "id": "new" }])),
            MergeKeyPolicy::DisplayName,
        );
        assert_eq!(merged[0].id.as_deref(), Some("new"));
        assert_eq!(merged[0].website_uri.as_deref(), Some("https://a.example"));
    }

    #[test]
    fn order_follows_first_appearance() {
        let merged = merge_places(
            places(json!([
                { "displayName": { "text": "B" } },
                { "displayName": { "text": "A" } }
            ])),
            places(json!([
                { "displayName": { "text": "C" } },
                { "displayName": { "text": "A" } },
                { "displayName": { "text": "B" } }
            ])),
            MergeKeyPolicy::DisplayName,
        );
        assert_eq!(names(&merged), vec!["B", "A", "C"]);
    }

    #[test]
    fn unaddressable_places_are_dropped() {
        let merged = merge_places(
            places(json!([{}, { "rating": 5.0 }])),
            places(json!([{ "displayName": { "text": "" } }])),
            MergeKeyPolicy::DisplayName,
        );
        assert!(merged.is_empty());
    }

    #[test]
    fn falls_back_to_upstream_identifier() {
        let merged = merge_places(
            places(json!([{ "name": "places/abc", "rating": 4.0 }])),
            places(json!([{ "name": "places/abc", "priceLevel": "PRICE_LEVEL_FREE" }])),
            MergeKeyPolicy::DisplayName,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].rating, Some(4.0));
        assert_eq!(merged[0].price_level.as_deref(), Some("PRICE_LEVEL_FREE"));
    }

    #[test]
    fn every_key_appears_exactly_once() {
        let nearby = places(json!([
            { "displayName": { "text": "A" } },
            { "displayName": { "text": "A" } },
            { "displayName": { "text": "B" } }
        ]));
        let text = places(json!([
            { "displayName": { "text": "B" } },
            { "id": "only-id" },
            { "displayName": { "text": "D" } }
        ]));
        let merged = merge_places(nearby, text, MergeKeyPolicy::DisplayName);
        let keys: Vec<String> = merged
            .iter()
            .filter_map(|p| merge_key(p, MergeKeyPolicy::DisplayName))
            .collect();
        assert_eq!(keys, vec!["A", "B", "only-id", "D"]);
    }

    #[test]
    fn stable_policy_separates_same_named_places() {
        let merged = merge_places(
            places(json!([
                { "id": "1", "displayName": { "text": "Starbucks" } },
                { "id": "2", "displayName": { "text": "Starbucks" } }
            ])),
            places(json!([{ "name": "places/1", "displayName": { "text": "Starbucks" }, "rating": 3.9 }])),
            MergeKeyPolicy::Stable,
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id.as_deref(), Some("1"));
        assert_eq!(merged[0].rating, Some(3.9));
        assert_eq!(merged[1].id.as_deref(), Some("2"));
    }

    #[test]
    fn stable_policy_uses_name_and_address_without_id() {
        let merged = merge_places(
            places(json!([
                { "displayName": { "text": "Cafe" }, "formattedAddress": "1 Main St" },
                { "displayName": { "text": "Cafe" }, "formattedAddress": "9 High St" }
            ])),
            places(json!([{ "displayName": { "text": "Cafe" }, "formattedAddress": "1 Main St", "rating": 4.0 }])),
            MergeKeyPolicy::Stable,
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].rating, Some(4.0));
    }
}
