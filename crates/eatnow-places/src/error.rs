use thiserror::Error;

/// Errors from a single places API call.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus { endpoint: &'static str, status: u16 },

    /// The response body was not the expected JSON envelope.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid places base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl PlacesError {
    /// `true` for failures of one upstream call, which the tiered search
    /// treats as "this strategy found nothing" and moves on.
    #[must_use]
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::UnexpectedStatus { .. } | Self::Deserialize { .. }
        )
    }
}

/// Errors surfaced by [`crate::TieredSearch`] to its caller.
///
/// Upstream failures never appear here; an exhausted search is an empty
/// outcome, not an error.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The caller passed an unusable radius list.
    #[error("invalid search radii: {0}")]
    InvalidRadii(String),

    #[error("search cancelled by caller")]
    Cancelled,
}
