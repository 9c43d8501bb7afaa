//! Places API wire types.
//!
//! Both search endpoints wrap results in the same envelope:
//! `{"status": "OK", "results": [...], "error_message": "..."}`.
//! The envelope is deserialized strictly, but individual results are kept as
//! raw JSON and read into [`RawPlace`] field by field so one oddly shaped
//! entry never poisons the rest of the page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `"lat,lng"` as expected by the `location` query parameter.
    #[must_use]
    pub fn to_query_value(self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

/// Response envelope shared by `nearbysearch` and `textsearch`.
#[derive(Debug, Deserialize)]
pub struct PlacesResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<Value>,
}

/// One search result with every field optional.
///
/// Fallback order for fields the two endpoints spell differently:
/// - review count: `user_ratings_total`, then `userRatingCount`
/// - address: `vicinity`, then `formatted_address`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPlace {
    pub name: Option<String>,
    pub place_id: Option<String>,
    pub location: Option<Coordinate>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    pub address: Option<String>,
    pub photo_reference: Option<String>,
}

impl RawPlace {
    /// Reads a result object. Missing or mistyped fields become `None`;
    /// non-object input yields an empty record.
    #[must_use]
    pub fn from_json(item: &Value) -> Self {
        let location = item
            .get("geometry")
            .and_then(|g| g.get("location"))
            .and_then(|loc| {
                let lat = loc.get("lat").and_then(Value::as_f64)?;
                let lng = loc.get("lng").and_then(Value::as_f64)?;
                Some(Coordinate { lat, lng })
            });

        let review_count = ["user_ratings_total", "userRatingCount"]
            .iter()
            .find_map(|key| item.get(*key).and_then(Value::as_u64));

        let address = ["vicinity", "formatted_address"]
            .iter()
            .find_map(|key| string_field(item, key));

        let photo_reference = item
            .get("photos")
            .and_then(Value::as_array)
            .and_then(|photos| photos.first())
            .and_then(|photo| string_field(photo, "photo_reference"))
            .filter(|r| !r.is_empty());

        Self {
            name: string_field(item, "name"),
            place_id: string_field(item, "place_id"),
            location,
            rating: item
                .get("rating")
                .and_then(Value::as_f64)
                .filter(|r| (0.0..=5.0).contains(r)),
            review_count,
            address,
            photo_reference,
        }
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}
