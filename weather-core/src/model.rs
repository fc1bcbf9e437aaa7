use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::detailed::DetailedWeather;

/// Placeholder shown for any summary field the service did not return.
pub const NOT_AVAILABLE: &str = "N/A";

/// City label used for GPS searches when the service reports no nearby area.
pub const CURRENT_LOCATION_LABEL: &str = "Current Location";

/// A latitude/longitude pair from the device location collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// The `lat,lon` form accepted by the weather service as a location.
    pub fn to_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// The compact current-conditions view of a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub city: String,
    pub condition: String,
    pub temperature: String,
    pub humidity: String,
    pub wind: String,
    /// Service weather code, empty when the detailed payload has none.
    pub weather_code: String,
}

/// How a search was initiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    City,
    Gps,
    /// Opened from a saved record, kept so saving it again is a no-op.
    Favorite(FavoriteLocation),
}

/// Everything a successful search produces: summary and detailed payload
/// resolved for the same location string.
#[derive(Debug, Clone)]
pub struct WeatherReport {
    /// Location string sent to the weather service.
    pub query: String,
    pub source: QuerySource,
    pub summary: WeatherSummary,
    pub detailed: DetailedWeather,
    pub fetched_at: DateTime<Utc>,
}

/// One candidate returned by the geocoding service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSuggestion {
    pub display_name: String,
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl LocationSuggestion {
    /// The text handed to a weather search when this suggestion is picked:
    /// the leading segment of the display name ("Rome, Lazio, Italy" -> "Rome").
    pub fn search_text(&self) -> String {
        match self.display_name.split(',').next().map(str::trim) {
            Some(first) if !first.is_empty() => first.to_string(),
            _ => self.display_name.trim().to_string(),
        }
    }
}

/// A persisted favorite location.
///
/// Field order here is the canonical encoding order; `serde_json` emits struct
/// fields in declaration order, so equal records always encode to equal bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteLocation {
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub coordinates: Option<String>,
    #[serde(rename = "isCurrentLocation", default)]
    pub is_current_location: bool,
}

impl FavoriteLocation {
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            coordinates: None,
            is_current_location: false,
        }
    }

    /// Build the favorite that "save" produces for a displayed result.
    /// A result opened from a favorite maps back to that same record.
    pub fn from_report(report: &WeatherReport) -> Self {
        let city = report.summary.city.clone();
        match &report.source {
            QuerySource::Gps => Self {
                name: city.clone(),
                display_name: city,
                coordinates: Some(report.query.clone()),
                is_current_location: true,
            },
            QuerySource::Favorite(favorite) => favorite.clone(),
            QuerySource::City => Self {
                name: city.clone(),
                display_name: city,
                coordinates: None,
                is_current_location: false,
            },
        }
    }

    /// Location string to search with; coordinates win over the name.
    pub fn query(&self) -> &str {
        self.coordinates.as_deref().unwrap_or(&self.name)
    }
}
