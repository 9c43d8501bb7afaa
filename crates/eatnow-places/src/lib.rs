pub mod client;
pub mod error;
pub mod geo;
pub mod normalize;
pub mod search;
pub mod strategy;
pub mod types;

pub use client::{PlacesClient, PlacesClientConfig};
pub use error::{PlacesError, SearchError};
pub use geo::distance_km;
pub use normalize::{normalize_place, VenueRecord};
pub use search::{SearchOutcome, SearchRequest, StrategyMode, TieredSearch};
pub use strategy::{strategies_for, ProximityQuery, SearchStrategy, TextQuery};
pub use types::{Coordinate, RawPlace};
