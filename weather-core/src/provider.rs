use crate::{
    error::{FetchError, SearchError},
    model::LocationSuggestion,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod nominatim;
pub mod wttr;

pub use nominatim::{GeocodingClient, GeocodingClientConfig};
pub use wttr::{WeatherClient, WeatherClientConfig};

/// Default number of suggestions requested per search.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Source of raw weather responses for a location string
/// (a place name or a `lat,lon` pair).
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Compact `condition|temperature|humidity|wind` text.
    async fn fetch_summary(&self, location: &str) -> Result<String, FetchError>;

    /// Structured multi-day JSON, unparsed.
    async fn fetch_detailed(&self, location: &str) -> Result<String, FetchError>;
}

/// Free-text place search backing autocomplete.
#[async_trait]
pub trait LocationSearch: Send + Sync + Debug {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<LocationSuggestion>, SearchError>;
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_untouched() {
        assert_eq!(truncate_body("Unknown location"), "Unknown location");
    }

    #[test]
    fn long_bodies_are_cut_on_char_boundary() {
        let body = "°".repeat(300);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }
}
