//! Error types shared across the core crate.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single weather request (summary or detailed leg).
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("weather service returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Failure of a geocoding search.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("geocoding service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed geocoding response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure reported by the device location collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Current position unavailable")]
    PositionUnavailable,

    #[error("Location request cancelled")]
    Cancelled,
}

/// Failure of the key-value persistence layer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("failed to encode record: {0}")]
    Encode(serde_json::Error),
}

/// Outcome of a failed weather resolution, as seen by the view.
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error(transparent)]
    Network(#[from] FetchError),

    #[error("malformed weather data: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("location unavailable: {0}")]
    LocationUnavailable(#[from] LocationError),

    #[error("request cancelled")]
    Cancelled,

    #[error("request superseded by a newer search")]
    Superseded,

    #[error("no location entered")]
    EmptyQuery,
}

impl WeatherError {
    /// User-facing message for the error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) | Self::Deserialization(_) => {
                "Weather search failed. Check the location name and try again.".to_string()
            }
            Self::LocationUnavailable(LocationError::PermissionDenied) => {
                "Location permission denied.".to_string()
            }
            Self::LocationUnavailable(_) => "Could not determine your current location.".to_string(),
            Self::Cancelled => "Search cancelled.".to_string(),
            Self::Superseded => "Search replaced by a newer one.".to_string(),
            Self::EmptyQuery => "Enter a city name to search.".to_string(),
        }
    }

    pub fn is_location_error(&self) -> bool {
        matches!(self, Self::LocationUnavailable(_))
    }
}
