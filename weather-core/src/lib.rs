//! Core library for the `weather` client.
//!
//! This crate defines:
//! - Parsing of the compact and structured weather responses
//! - Clients for the weather and geocoding services
//! - Persisted favorite locations
//! - Debounced autocomplete and the weather screen's view model
//!
//! It is used by `weather-cli`, but carries no presentation code and can back
//! any other front end.

pub mod autocomplete;
pub mod condition;
pub mod config;
pub mod detailed;
pub mod error;
pub mod favorites;
pub mod location;
pub mod model;
pub mod parse;
pub mod provider;
pub mod store;
pub mod view;

pub use autocomplete::{AutocompleteController, AutocompleteState};
pub use condition::{ConditionKind, moon_phase_symbol};
pub use config::Config;
pub use detailed::DetailedWeather;
pub use error::{FetchError, LocationError, SearchError, StoreError, WeatherError};
pub use favorites::FavoritesRepository;
pub use location::{DeviceLocator, FixedLocator};
pub use model::{
    Coordinates, FavoriteLocation, LocationSuggestion, QuerySource, WeatherReport, WeatherSummary,
};
pub use provider::{GeocodingClient, LocationSearch, WeatherClient, WeatherSource};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use view::{ViewError, ViewState, WeatherView};
