use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::Select;
use weather_core::{
    AutocompleteController, AutocompleteState, Config, DeviceLocator, FavoriteLocation,
    FavoritesRepository, FileStore, FixedLocator, GeocodingClient, LocationError, LocationSearch, WeatherClient,
    WeatherError, WeatherReport, WeatherView,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show weather for a city or place name.
    Show {
        /// Place name, e.g. "Rome" or "New York".
        city: String,

        /// Also save the result to favorites.
        #[arg(long)]
        save: bool,
    },

    /// Show weather at a coordinate, as a device position fix would.
    Here {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Also save the result to favorites.
        #[arg(long)]
        save: bool,
    },

    /// Look up matching places, pick one, and show its weather.
    Search {
        /// Partial place name.
        text: String,
    },

    /// Manage favorite locations.
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },

    /// Inspect or create the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// List saved locations.
    List,
    /// Look up a city and save it.
    Add { city: String },
    /// Remove a saved location by name.
    Remove { name: String },
    /// Pick a saved location and show its weather.
    Open,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration.
    Show,
    /// Print the configuration file path.
    Path,
    /// Write the default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Everything a command needs, built once from config.
struct App {
    config: Config,
    view: WeatherView,
}

impl App {
    fn build(config: Config, locator: Arc<dyn DeviceLocator>) -> anyhow::Result<Self> {
        let weather = WeatherClient::new(config.weather_client())?;
        let favorites_path = config.favorites_file_path()?;
        tracing::debug!(path = %favorites_path.display(), "favorites store");
        let favorites = FavoritesRepository::new(FileStore::new(favorites_path));

        let view = WeatherView::new(Arc::new(weather), locator, Arc::new(favorites));
        Ok(Self { config, view })
    }

    fn autocomplete(&self) -> anyhow::Result<AutocompleteController> {
        let geocoder: Arc<dyn LocationSearch> =
            Arc::new(GeocodingClient::new(self.config.geocoding_client())?);
        Ok(AutocompleteController::with_settings(
            geocoder,
            self.config.debounce(),
            self.config.geocoding.limit,
        ))
    }

    async fn show(&self, report: &WeatherReport, save: bool) -> anyhow::Result<()> {
        if save {
            if let Some(saved) = self.view.save_favorite().await? {
                println!("Saved {} to favorites", saved.display_name);
            }
        }

        let key = FavoriteLocation::from_report(report);
        let saved = self.view.is_favorite(&key.name).await?;
        output::print_report(report, saved);
        Ok(())
    }
}

fn no_locator() -> Arc<dyn DeviceLocator> {
    Arc::new(FixedLocator::failing(LocationError::PositionUnavailable))
}

fn to_user_error(err: WeatherError) -> anyhow::Error {
    tracing::debug!(error = ?err, "weather search failed");
    anyhow!(err.user_message())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Show { city, save } => {
                let app = App::build(config, no_locator())?;
                let report = app.view.search_city(&city).await.map_err(to_user_error)?;
                app.show(&report, save).await?;
            }
            Command::Here { lat, lon, save } => {
                let app = App::build(config, Arc::new(FixedLocator::at(lat, lon)))?;
                let report = app
                    .view
                    .search_current_location()
                    .await
                    .map_err(to_user_error)?;
                app.show(&report, save).await?;
            }
            Command::Search { text } => {
                let app = App::build(config, no_locator())?;
                search_interactive(&app, &text).await?;
            }
            Command::Favorites { action } => {
                let app = App::build(config, no_locator())?;
                run_favorites(&app, action).await?;
            }
            Command::Config { action } => match action {
                ConfigCommand::Show => {
                    let text = toml::to_string_pretty(&config)
                        .context("Failed to serialize configuration to TOML")?;
                    println!("{text}");
                    println!("# favorites: {}", config.favorites_file_path()?.display());
                }
                ConfigCommand::Path => {
                    println!("{}", Config::config_file_path()?.display());
                }
                ConfigCommand::Init { force } => {
                    let path = Config::config_file_path()?;
                    if path.exists() && !force {
                        println!("{} already exists (use --force to overwrite)", path.display());
                    } else {
                        let path = Config::default().save()?;
                        println!("Wrote {}", path.display());
                    }
                }
            },
        }

        Ok(())
    }
}

async fn search_interactive(app: &App, text: &str) -> anyhow::Result<()> {
    let autocomplete = app.autocomplete()?;
    let mut updates = autocomplete.subscribe();

    autocomplete.on_input(text);
    let settled = updates
        .wait_for(|s| matches!(s, AutocompleteState::Showing(_) | AutocompleteState::Idle))
        .await
        .context("Autocomplete stopped unexpectedly")?
        .clone();

    if settled.suggestions().is_empty() {
        if let Some(err) = autocomplete.last_error() {
            tracing::debug!(error = %err, "suggestion lookup failed");
        }
        println!("No matching locations for \"{text}\".");
        return Ok(());
    }

    let names: Vec<String> = settled
        .suggestions()
        .iter()
        .map(|s| s.display_name.clone())
        .collect();
    let picked = Select::new("Choose a location:", names).raw_prompt()?;

    let suggestion = autocomplete
        .select(picked.index)
        .ok_or_else(|| anyhow!("Selected suggestion is no longer available"))?;
    let report = app
        .view
        .select_suggestion(&suggestion)
        .await
        .map_err(to_user_error)?;
    app.show(&report, false).await
}

async fn run_favorites(app: &App, action: FavoritesCommand) -> anyhow::Result<()> {
    let favorites = app.view.favorites();

    match action {
        FavoritesCommand::List => {
            output::print_favorites(&favorites.list().await?);
        }
        FavoritesCommand::Add { city } => {
            app.view.search_city(&city).await.map_err(to_user_error)?;
            if let Some(saved) = app.view.save_favorite().await? {
                println!("Saved {} to favorites", saved.display_name);
            }
        }
        FavoritesCommand::Remove { name } => {
            if favorites.is_favorite(&name).await? {
                favorites.remove_named(&name).await?;
                println!("Removed {name} from favorites");
            } else {
                println!("{name} is not a saved location");
            }
        }
        FavoritesCommand::Open => {
            let list = favorites.list().await?;
            if list.is_empty() {
                println!("No saved locations yet. Use `weather favorites add <CITY>`.");
                return Ok(());
            }

            let labels: Vec<String> = list.iter().map(output::favorite_label).collect();
            let picked = Select::new("Open a saved location:", labels).raw_prompt()?;
            let favorite = list
                .get(picked.index)
                .ok_or_else(|| anyhow!("Selected location is no longer available"))?;

            let report = app
                .view
                .select_favorite(favorite)
                .await
                .map_err(to_user_error)?;
            app.show(&report, false).await?;
        }
    }

    Ok(())
}
