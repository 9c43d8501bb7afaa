//! Terminal output for search outcomes.

use std::fmt::Write as _;

use eatnow_places::{SearchOutcome, VenueRecord};

pub(crate) fn outcome_json(outcome: &SearchOutcome) -> serde_json::Result<String> {
    serde_json::to_string_pretty(outcome)
}

pub(crate) fn outcome_table(outcome: &SearchOutcome) -> String {
    if outcome.venues.is_empty() {
        return format!(
            "No open venues found within {} m. Try a larger radius or a different keyword.\n",
            outcome.radius_m
        );
    }

    let mut out = format!(
        "{} venue(s) within {} m\n",
        outcome.venues.len(),
        outcome.radius_m
    );
    for (i, venue) in outcome.venues.iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {}", i + 1, venue_line(venue));
        let _ = writeln!(out, "    {}", venue.map_url);
    }
    out
}

fn venue_line(venue: &VenueRecord) -> String {
    let name = venue.name.as_deref().unwrap_or("(unnamed)");
    let distance = venue
        .distance_km
        .map_or_else(|| "? km".to_string(), |d| format!("{d:.2} km"));
    let rating = venue
        .rating
        .map_or_else(|| "-".to_string(), |r| format!("{r:.1}"));
    let mut line = format!(
        "{name}  {distance}  \u{2605} {rating} ({})",
        venue.review_count
    );
    if !venue.address.is_empty() {
        let _ = write!(line, "  {}", venue.address);
    }
    line
}
