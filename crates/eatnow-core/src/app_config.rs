#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub places_api_key: String,
    /// Key embedded in generated photo URLs. `None` disables photo URLs.
    pub places_photo_api_key: Option<String>,
    pub places_base_url: String,
    pub places_language: String,
    pub places_region: String,
    pub places_request_timeout_secs: u64,
    pub user_agent: String,
    /// Ascending auto-expansion radii in meters.
    pub search_radii_m: Vec<u32>,
    pub search_fetch_cap: usize,
    /// Default number of venues returned per search, already clamped to 3..=9.
    pub cards_per_reply: usize,
    pub search_parallel: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("places_api_key", &"[redacted]")
            .field(
                "places_photo_api_key",
                &self.places_photo_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("places_language", &self.places_language)
            .field("places_region", &self.places_region)
            .field(
                "places_request_timeout_secs",
                &self.places_request_timeout_secs,
            )
            .field("user_agent", &self.user_agent)
            .field("search_radii_m", &self.search_radii_m)
            .field("search_fetch_cap", &self.search_fetch_cap)
            .field("cards_per_reply", &self.cards_per_reply)
            .field("search_parallel", &self.search_parallel)
            .finish()
    }
}
