use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Largest search radius the places API accepts, in meters.
pub const MAX_RADIUS_M: u32 = 50_000;

const MIN_CARDS_PER_REPLY: usize = 3;
const MAX_CARDS_PER_REPLY: usize = 9;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Reads `PLACES_*` and `EATNOW_*` from the process environment as it is.
///
/// Does not touch `.env`; the CLI loads that itself before calling this.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation live here so tests can drive them from a plain
/// `HashMap` instead of the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got '{other}'"),
            }),
        }
    };

    let places_api_key = require("PLACES_API_KEY")?;
    let places_photo_api_key = match lookup("PLACES_PHOTO_API_KEY") {
        Ok(key) if key.trim().is_empty() => None,
        Ok(key) => Some(key),
        Err(_) => Some(places_api_key.clone()),
    };

    let env = parse_environment(&or_default("EATNOW_ENV", "development"))?;
    let log_level = or_default("EATNOW_LOG_LEVEL", "info");

    let places_base_url = or_default(
        "PLACES_BASE_URL",
        "https://maps.googleapis.com/maps/api/place/",
    );
    let places_language = or_default("PLACES_LANGUAGE", "zh-TW");
    let places_region = or_default("PLACES_REGION", "tw");
    let places_request_timeout_secs = parse_u64("PLACES_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("EATNOW_USER_AGENT", "eatnow/0.1 (nearby-search)");

    let search_radii_m = parse_radii(&or_default("EATNOW_SEARCH_RADII_M", "500,1000,2000,3000"))?;
    let search_fetch_cap = parse_usize("EATNOW_SEARCH_FETCH_CAP", "30")?;
    if search_fetch_cap == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "EATNOW_SEARCH_FETCH_CAP".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let cards_per_reply = parse_usize("EATNOW_CARDS_PER_REPLY", "5")?
        .clamp(MIN_CARDS_PER_REPLY, MAX_CARDS_PER_REPLY);
    let search_parallel = parse_bool("EATNOW_SEARCH_PARALLEL", "false")?;

    Ok(AppConfig {
        env,
        log_level,
        places_api_key,
        places_photo_api_key,
        places_base_url,
        places_language,
        places_region,
        places_request_timeout_secs,
        user_agent,
        search_radii_m,
        search_fetch_cap,
        cards_per_reply,
        search_parallel,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "EATNOW_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Parse a comma-separated, strictly ascending list of radii in meters.
fn parse_radii(raw: &str) -> Result<Vec<u32>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "EATNOW_SEARCH_RADII_M".to_string(),
        reason,
    };

    let mut radii = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let radius = part
            .parse::<u32>()
            .map_err(|e| invalid(format!("'{part}': {e}")))?;
        if radius == 0 || radius > MAX_RADIUS_M {
            return Err(invalid(format!(
                "{radius} is outside 1..={MAX_RADIUS_M} meters"
            )));
        }
        if radii.last().is_some_and(|&prev| prev >= radius) {
            return Err(invalid(format!("radii must be strictly ascending: {raw}")));
        }
        radii.push(radius);
    }

    if radii.is_empty() {
        return Err(invalid("at least one radius is required".to_string()));
    }
    Ok(radii)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
