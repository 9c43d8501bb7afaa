//! Conversion of raw places results into [`VenueRecord`]s for the reply layer.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::geo::distance_km;
use crate::types::{Coordinate, RawPlace};

const PHOTO_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/photo";
const PHOTO_MAX_WIDTH: u32 = 800;
const MAP_SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// A venue ready to be rendered as a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueRecord {
    pub name: Option<String>,
    /// Dedup key. Unique per physical venue when present.
    pub place_id: Option<String>,
    pub location: Option<Coordinate>,
    pub rating: Option<f64>,
    pub review_count: u64,
    pub address: String,
    pub photo_url: Option<String>,
    pub map_url: String,
    /// Distance from the searcher, rounded to two decimals.
    pub distance_km: Option<f64>,
}

/// Builds a [`VenueRecord`] from one raw result as seen from `origin`.
///
/// Never fails: absent fields stay absent, review count defaults to 0 and
/// address to the empty string. A photo URL is only produced when both a
/// photo reference and `photo_api_key` are available.
#[must_use]
pub fn normalize_place(
    raw: &RawPlace,
    origin: Coordinate,
    photo_api_key: Option<&str>,
) -> VenueRecord {
    let photo_url = raw
        .photo_reference
        .as_deref()
        .zip(photo_api_key.filter(|k| !k.is_empty()))
        .map(|(reference, key)| photo_url(reference, key));

    let distance = raw.location.and_then(|loc| {
        let d = distance_km(origin.lat, origin.lng, loc.lat, loc.lng);
        d.is_finite().then(|| round_2dp(d))
    });

    VenueRecord {
        name: raw.name.clone(),
        place_id: raw.place_id.clone(),
        location: raw.location,
        rating: raw.rating,
        review_count: raw.review_count.unwrap_or(0),
        address: raw.address.clone().unwrap_or_default(),
        photo_url,
        map_url: map_url(
            raw.name.as_deref().unwrap_or_default(),
            raw.place_id.as_deref().unwrap_or_default(),
        ),
        distance_km: distance,
    }
}

/// Photo endpoint URL for `reference`, sized to the card hero image.
#[must_use]
pub fn photo_url(reference: &str, api_key: &str) -> String {
    format!(
        "{PHOTO_BASE_URL}?maxwidth={PHOTO_MAX_WIDTH}&photo_reference={}&key={}",
        utf8_percent_encode(reference, NON_ALPHANUMERIC),
        utf8_percent_encode(api_key, NON_ALPHANUMERIC),
    )
}

/// Map search URL that opens the venue by name, pinned to its place id.
#[must_use]
pub fn map_url(name: &str, place_id: &str) -> String {
    format!(
        "{MAP_SEARCH_URL}?api=1&query={}&query_place_id={}",
        utf8_percent_encode(name, NON_ALPHANUMERIC),
        utf8_percent_encode(place_id, NON_ALPHANUMERIC),
    )
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
