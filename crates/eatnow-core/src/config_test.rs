use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("PLACES_API_KEY", "test-places-key");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "EATNOW_ENV"));
}

#[test]
fn build_app_config_fails_without_places_api_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "PLACES_API_KEY"),
        "expected MissingEnvVar(PLACES_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_api_key_as_missing() {
    let mut map = HashMap::new();
    map.insert("PLACES_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.places_api_key, "test-places-key");
    assert_eq!(
        cfg.places_photo_api_key.as_deref(),
        Some("test-places-key"),
        "photo key should fall back to the places key"
    );
    assert_eq!(
        cfg.places_base_url,
        "https://maps.googleapis.com/maps/api/place/"
    );
    assert_eq!(cfg.places_language, "zh-TW");
    assert_eq!(cfg.places_region, "tw");
    assert_eq!(cfg.places_request_timeout_secs, 10);
    assert_eq!(cfg.user_agent, "eatnow/0.1 (nearby-search)");
    assert_eq!(cfg.search_radii_m, vec![500, 1000, 2000, 3000]);
    assert_eq!(cfg.search_fetch_cap, 30);
    assert_eq!(cfg.cards_per_reply, 5);
    assert!(!cfg.search_parallel);
}

#[test]
fn blank_photo_key_disables_photos() {
    let mut map = full_env();
    map.insert("PLACES_PHOTO_API_KEY", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.places_photo_api_key.is_none());
}

#[test]
fn explicit_photo_key_overrides_places_key() {
    let mut map = full_env();
    map.insert("PLACES_PHOTO_API_KEY", "photo-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.places_photo_api_key.as_deref(), Some("photo-key"));
}

#[test]
fn request_timeout_invalid_is_rejected() {
    let mut map = full_env();
    map.insert("PLACES_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACES_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PLACES_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn radii_override_is_parsed_with_whitespace() {
    let mut map = full_env();
    map.insert("EATNOW_SEARCH_RADII_M", " 300, 800 ,1500 ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.search_radii_m, vec![300, 800, 1500]);
}

#[test]
fn radii_must_be_strictly_ascending() {
    let mut map = full_env();
    map.insert("EATNOW_SEARCH_RADII_M", "800,500");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "EATNOW_SEARCH_RADII_M"),
        "expected InvalidEnvVar(EATNOW_SEARCH_RADII_M), got: {result:?}"
    );

    map.insert("EATNOW_SEARCH_RADII_M", "500,500");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn radii_reject_zero_and_oversized_values() {
    assert!(parse_radii("0,500").is_err());
    assert!(parse_radii("500,50001").is_err());
    assert_eq!(parse_radii("50000").unwrap(), vec![MAX_RADIUS_M]);
}

#[test]
fn radii_reject_empty_list() {
    assert!(parse_radii("").is_err());
    assert!(parse_radii(" , ").is_err());
}

#[test]
fn cards_per_reply_is_clamped_into_allowed_range() {
    let mut map = full_env();
    map.insert("EATNOW_CARDS_PER_REPLY", "1");
    assert_eq!(
        build_app_config(lookup_from_map(&map))
            .unwrap()
            .cards_per_reply,
        3
    );

    map.insert("EATNOW_CARDS_PER_REPLY", "20");
    assert_eq!(
        build_app_config(lookup_from_map(&map))
            .unwrap()
            .cards_per_reply,
        9
    );

    map.insert("EATNOW_CARDS_PER_REPLY", "7");
    assert_eq!(
        build_app_config(lookup_from_map(&map))
            .unwrap()
            .cards_per_reply,
        7
    );
}

#[test]
fn fetch_cap_of_zero_is_rejected() {
    let mut map = full_env();
    map.insert("EATNOW_SEARCH_FETCH_CAP", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "EATNOW_SEARCH_FETCH_CAP")
    );
}

#[test]
fn parallel_flag_accepts_common_spellings() {
    let mut map = full_env();
    map.insert("EATNOW_SEARCH_PARALLEL", "TRUE");
    assert!(build_app_config(lookup_from_map(&map)).unwrap().search_parallel);

    map.insert("EATNOW_SEARCH_PARALLEL", "maybe");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "EATNOW_SEARCH_PARALLEL")
    );
}

#[test]
fn debug_output_redacts_api_keys() {
    let cfg = build_app_config(lookup_from_map(&full_env())).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("test-places-key"), "{rendered}");
    assert!(rendered.contains("[redacted]"));
}
