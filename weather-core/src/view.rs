//! The weather screen's view model.
//!
//! Every entry point (city name, device position, favorite) funnels into one
//! resolution routine that fetches both weather legs for the same location
//! string. Each resolution is tagged with a sequence number; only the latest
//! may publish, so a slow earlier response can never replace a newer one.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use chrono::Utc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    detailed::DetailedWeather,
    error::{LocationError, StoreError, WeatherError},
    favorites::FavoritesRepository,
    location::DeviceLocator,
    model::{
        CURRENT_LOCATION_LABEL, FavoriteLocation, LocationSuggestion, QuerySource, WeatherReport,
        WeatherSummary,
    },
    parse::parse_summary,
    provider::WeatherSource,
};

/// What the error banner shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    SearchFailed(String),
    LocationUnavailable(String),
}

impl From<&WeatherError> for ViewError {
    fn from(err: &WeatherError) -> Self {
        if err.is_location_error() {
            Self::LocationUnavailable(err.user_message())
        } else {
            Self::SearchFailed(err.user_message())
        }
    }
}

/// Observable output of the screen.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub loading: bool,
    pub error: Option<ViewError>,
    pub report: Option<WeatherReport>,
    /// Text shown in the search box.
    pub search_text: String,
}

#[derive(Debug)]
pub struct WeatherView {
    weather: Arc<dyn WeatherSource>,
    locator: Arc<dyn DeviceLocator>,
    favorites: Arc<FavoritesRepository>,
    latest: AtomicU64,
    state: watch::Sender<ViewState>,
    cancel: CancellationToken,
}

impl WeatherView {
    pub fn new(
        weather: Arc<dyn WeatherSource>,
        locator: Arc<dyn DeviceLocator>,
        favorites: Arc<FavoritesRepository>,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            weather,
            locator,
            favorites,
            latest: AtomicU64::new(0),
            state,
            cancel: CancellationToken::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn favorites(&self) -> &Arc<FavoritesRepository> {
        &self.favorites
    }

    /// Search by a typed place name.
    pub async fn search_city(&self, name: &str) -> Result<WeatherReport, WeatherError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WeatherError::EmptyQuery);
        }

        let seq = self.begin(Some(name));
        tracing::info!(seq, city = name, "searching city");
        self.resolve(seq, name, QuerySource::City, name).await
    }

    /// Search with a picked autocomplete suggestion.
    pub async fn select_suggestion(
        &self,
        suggestion: &LocationSuggestion,
    ) -> Result<WeatherReport, WeatherError> {
        self.search_city(&suggestion.search_text()).await
    }

    /// Search a saved favorite, preferring its coordinates over its name.
    pub async fn select_favorite(
        &self,
        favorite: &FavoriteLocation,
    ) -> Result<WeatherReport, WeatherError> {
        let seq = self.begin(Some(&favorite.display_name));
        tracing::info!(seq, name = %favorite.name, "searching favorite");
        let source = QuerySource::Favorite(favorite.clone());
        self.resolve(seq, favorite.query(), source, &favorite.display_name)
            .await
    }

    /// Search at the device's current position.
    pub async fn search_current_location(&self) -> Result<WeatherReport, WeatherError> {
        let seq = self.begin(None);

        let position = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(LocationError::Cancelled),
            pos = self.locator.current_position(&self.cancel) => pos,
        };

        let coords = match position {
            Ok(coords) => coords,
            Err(LocationError::Cancelled) => return self.finish(seq, Err(WeatherError::Cancelled)),
            Err(e) => {
                tracing::warn!(seq, error = %e, "device position unavailable");
                return self.finish(seq, Err(e.into()));
            }
        };

        tracing::info!(seq, lat = coords.latitude, lon = coords.longitude, "searching position");
        self.resolve(seq, &coords.to_query(), QuerySource::Gps, CURRENT_LOCATION_LABEL)
            .await
    }

    /// Save the displayed result as a favorite. Returns `None` when nothing
    /// is displayed.
    pub async fn save_favorite(&self) -> Result<Option<FavoriteLocation>, StoreError> {
        let Some(report) = self.state.borrow().report.clone() else {
            return Ok(None);
        };

        let favorite = FavoriteLocation::from_report(&report);
        self.favorites.save(&favorite).await?;
        Ok(Some(favorite))
    }

    pub async fn remove_favorite(&self, favorite: &FavoriteLocation) -> Result<(), StoreError> {
        self.favorites.remove(favorite).await
    }

    pub async fn is_favorite(&self, name: &str) -> Result<bool, StoreError> {
        self.favorites.is_favorite(name).await
    }

    /// Tear down: cancel in-flight work. Later searches resolve as cancelled.
    pub fn close(&self) {
        self.cancel.cancel();
        self.state.send_modify(|s| s.loading = false);
    }

    fn begin(&self, search_text: Option<&str>) -> u64 {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
            if let Some(text) = search_text {
                s.search_text = text.to_string();
            }
        });
        seq
    }

    async fn resolve(
        &self,
        seq: u64,
        query: &str,
        source: QuerySource,
        label: &str,
    ) -> Result<WeatherReport, WeatherError> {
        let fetch = async {
            let (summary_raw, detailed_raw) = tokio::try_join!(
                self.weather.fetch_summary(query),
                self.weather.fetch_detailed(query),
            )?;

            let detailed = DetailedWeather::from_json(&detailed_raw)?;
            let fields = parse_summary(&summary_raw);

            let city = match source {
                QuerySource::Gps => detailed.nearest_area_name().unwrap_or(label),
                QuerySource::City | QuerySource::Favorite(_) => label,
            }
            .to_string();

            let summary = WeatherSummary {
                city,
                condition: fields.condition,
                temperature: fields.temperature,
                humidity: fields.humidity,
                wind: fields.wind,
                weather_code: detailed.weather_code().to_string(),
            };

            Ok::<_, WeatherError>(WeatherReport {
                query: query.to_string(),
                source,
                summary,
                detailed,
                fetched_at: Utc::now(),
            })
        };

        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(WeatherError::Cancelled),
            result = fetch => result,
        };

        self.finish(seq, outcome)
    }

    /// Publish an outcome if it belongs to the latest request.
    fn finish(
        &self,
        seq: u64,
        outcome: Result<WeatherReport, WeatherError>,
    ) -> Result<WeatherReport, WeatherError> {
        let cancelled = matches!(outcome, Err(WeatherError::Cancelled));
        if !cancelled && self.latest.load(Ordering::SeqCst) != seq {
            tracing::warn!(seq, "discarding stale weather response");
            return Err(WeatherError::Superseded);
        }

        match &outcome {
            Ok(report) => {
                tracing::info!(seq, city = %report.summary.city, "weather resolved");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = None;
                    s.search_text = report.summary.city.clone();
                    s.report = Some(report.clone());
                });
            }
            Err(WeatherError::Cancelled) => {
                tracing::debug!(seq, "weather search cancelled");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.report = None;
                });
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, "weather search failed");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(ViewError::from(e));
                    s.report = None;
                });
            }
        }

        outcome
    }
}
