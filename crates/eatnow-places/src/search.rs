//! Tiered nearby search.
//!
//! For each radius (ascending) the strategies from [`strategies_for`] are
//! tried in priority order. The first strategy that yields at least one venue
//! ends the search: later strategies at that radius and all larger radii are
//! never queried. A failed upstream call counts as "no results" for that
//! strategy. The pool is then deduplicated by place id, ranked by distance
//! (then rating), and truncated to the requested limit.

use std::collections::HashSet;
use std::future::Future;

use eatnow_core::MAX_RADIUS_M;
use futures::future::join_all;
use serde::Serialize;

use crate::client::{PlacesClient, PlacesClientConfig};
use crate::error::{PlacesError, SearchError};
use crate::normalize::{normalize_place, VenueRecord};
use crate::strategy::{strategies_for, SearchStrategy};
use crate::types::{Coordinate, RawPlace};

/// Per-strategy fetch cap, independent of the caller's result limit.
pub const DEFAULT_FETCH_CAP: usize = 30;

/// How the strategies of one radius are issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StrategyMode {
    /// One call at a time, stopping at the first non-empty strategy.
    #[default]
    Sequential,
    /// All strategies of a radius at once; the highest-priority non-empty
    /// result wins and the rest are discarded.
    Parallel,
}

#[derive(Debug, Clone)]
pub struct SearchRequest<'a> {
    pub origin: Coordinate,
    /// Candidate radii in meters, strictly ascending. A single element pins
    /// the radius; several enable auto-expansion.
    pub radii_m: &'a [u32],
    pub limit: usize,
    pub keyword: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub venues: Vec<VenueRecord>,
    /// Radius that produced results, or the largest candidate if none did.
    pub radius_m: u32,
}

pub struct TieredSearch {
    client: PlacesClient,
    photo_api_key: Option<String>,
    fetch_cap: usize,
    mode: StrategyMode,
}

impl TieredSearch {
    #[must_use]
    pub fn new(client: PlacesClient, photo_api_key: Option<String>) -> Self {
        Self {
            client,
            photo_api_key,
            fetch_cap: DEFAULT_FETCH_CAP,
            mode: StrategyMode::Sequential,
        }
    }

    /// Builds the client and search settings from application config.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] if the HTTP client cannot be constructed.
    pub fn from_app_config(config: &eatnow_core::AppConfig) -> Result<Self, PlacesError> {
        let client = PlacesClient::new(&PlacesClientConfig::from_app_config(config))?;
        let mode = if config.search_parallel {
            StrategyMode::Parallel
        } else {
            StrategyMode::Sequential
        };
        Ok(Self::new(client, config.places_photo_api_key.clone())
            .with_fetch_cap(config.search_fetch_cap)
            .with_mode(mode))
    }

    #[must_use]
    pub fn with_fetch_cap(mut self, fetch_cap: usize) -> Self {
        self.fetch_cap = fetch_cap.max(1);
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: StrategyMode) -> Self {
        self.mode = mode;
        self
    }

    /// Runs the tiered search.
    ///
    /// An exhausted search is not an error: it returns no venues and the
    /// largest candidate radius.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidRadii`] if `request.radii_m` is empty,
    /// not strictly ascending, or contains a radius outside
    /// `1..=50_000` meters.
    pub async fn search(&self, request: &SearchRequest<'_>) -> Result<SearchOutcome, SearchError> {
        let largest = validate_radii(request.radii_m)?;
        let strategies = strategies_for(request.keyword);

        let mut pool = Vec::new();
        let mut radius_used = largest;
        for &radius_m in request.radii_m {
            pool = self
                .search_radius(&strategies, request.origin, radius_m)
                .await;
            if !pool.is_empty() {
                radius_used = radius_m;
                break;
            }
            tracing::debug!(radius_m, "no venues at radius");
        }

        let pool_size = pool.len();
        let mut venues = dedupe_by_place_id(pool);
        rank_venues(&mut venues);
        venues.truncate(request.limit);

        tracing::info!(
            radius_m = radius_used,
            keyword = request.keyword.unwrap_or("-"),
            pool_size,
            returned = venues.len(),
            "tiered search finished"
        );

        Ok(SearchOutcome {
            venues,
            radius_m: radius_used,
        })
    }

    /// Like [`TieredSearch::search`], but gives up as soon as `cancel`
    /// resolves. The in-flight upstream request is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Cancelled`] if `cancel` completes first, plus
    /// everything [`TieredSearch::search`] can return.
    pub async fn search_until<F>(
        &self,
        request: &SearchRequest<'_>,
        cancel: F,
    ) -> Result<SearchOutcome, SearchError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = cancel => {
                tracing::info!("tiered search cancelled by caller");
                Err(SearchError::Cancelled)
            }
            outcome = self.search(request) => outcome,
        }
    }

    async fn search_radius(
        &self,
        strategies: &[SearchStrategy],
        origin: Coordinate,
        radius_m: u32,
    ) -> Vec<VenueRecord> {
        match self.mode {
            StrategyMode::Sequential => {
                for strategy in strategies {
                    let result = self
                        .client
                        .run_strategy(strategy, origin, radius_m, self.fetch_cap)
                        .await;
                    if let Some(venues) = self.accept(strategy, radius_m, result, origin) {
                        return venues;
                    }
                }
                Vec::new()
            }
            StrategyMode::Parallel => {
                let results = join_all(strategies.iter().map(|strategy| {
                    self.client
                        .run_strategy(strategy, origin, radius_m, self.fetch_cap)
                }))
                .await;
                strategies
                    .iter()
                    .zip(results)
                    .find_map(|(strategy, result)| self.accept(strategy, radius_m, result, origin))
                    .unwrap_or_default()
            }
        }
    }

    /// Normalizes one strategy's results, or returns `None` if the strategy
    /// failed or came back empty.
    fn accept(
        &self,
        strategy: &SearchStrategy,
        radius_m: u32,
        result: Result<Vec<RawPlace>, PlacesError>,
        origin: Coordinate,
    ) -> Option<Vec<VenueRecord>> {
        match result {
            Ok(raw) if raw.is_empty() => {
                tracing::debug!(radius_m, strategy = %strategy, "strategy returned no results");
                None
            }
            Ok(raw) => {
                tracing::debug!(
                    radius_m,
                    strategy = %strategy,
                    results = raw.len(),
                    "strategy produced results"
                );
                let photo_key = self.photo_api_key.as_deref();
                Some(
                    raw.iter()
                        .map(|place| normalize_place(place, origin, photo_key))
                        .collect(),
                )
            }
            Err(err) => {
                tracing::debug!(
                    radius_m,
                    strategy = %strategy,
                    error = %err,
                    "strategy failed, trying next"
                );
                None
            }
        }
    }
}

/// Checks the radius precondition and returns the largest radius.
///
/// # Errors
///
/// Returns [`SearchError::InvalidRadii`] when the list is empty, not strictly
/// ascending, or holds a radius outside `1..=50_000`.
pub fn validate_radii(radii_m: &[u32]) -> Result<u32, SearchError> {
    if let Some(&bad) = radii_m.iter().find(|&&r| r == 0 || r > MAX_RADIUS_M) {
        return Err(SearchError::InvalidRadii(format!(
            "{bad} is outside 1..={MAX_RADIUS_M} meters"
        )));
    }
    if radii_m.windows(2).any(|w| w[0] >= w[1]) {
        return Err(SearchError::InvalidRadii(format!(
            "radii must be strictly ascending: {radii_m:?}"
        )));
    }
    radii_m
        .last()
        .copied()
        .ok_or_else(|| SearchError::InvalidRadii("no radius given".to_string()))
}

/// Drops repeated place ids, keeping the first occurrence in order.
/// Venues without a place id cannot be matched and are all kept.
#[must_use]
pub fn dedupe_by_place_id(venues: Vec<VenueRecord>) -> Vec<VenueRecord> {
    let mut seen = HashSet::new();
    venues
        .into_iter()
        .filter(|v| match &v.place_id {
            Some(id) => seen.insert(id.clone()),
            None => true,
        })
        .collect()
}

/// Stable sort: nearest first (unknown distance last), then highest rating
/// (unknown rating counts as 0).
pub fn rank_venues(venues: &mut [VenueRecord]) {
    venues.sort_by(|a, b| {
        let dist = |v: &VenueRecord| v.distance_km.unwrap_or(f64::INFINITY);
        let rating = |v: &VenueRecord| v.rating.unwrap_or(0.0);
        dist(a)
            .total_cmp(&dist(b))
            .then_with(|| rating(b).total_cmp(&rating(a)))
    });
}
