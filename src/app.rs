use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};
use glass_core::{AppError, Config, Coordinates, WeatherError};
use glass_prefs::{
    DemoModeStore, FavoritesRegistry, KeyValueStore, LayoutStore, SqliteStore, SystemPreferences,
    ThemeManager, UserPreferenceStore,
};
use glass_weather::format::{format_time, remove_trailing_numbers, weather_comment, weather_emoji, wind_direction};
use glass_weather::radar::coverage_status;
use glass_weather::{
    AirQualityReport, CoverageStatus, FixedLocationSource, LocationPoller, LocationState,
    RadarSettings, RadarState, RainForecast, ThreadRandom, WeatherClient, WeatherService,
};

/// How long to wait for the first position fix at startup.
const FIRST_FIX_TIMEOUT: Duration = Duration::from_secs(5);

/// Dashboard state: persisted stores, the weather service and location.
pub struct Dashboard {
    config: Arc<Config>,
    pub preferences: UserPreferenceStore,
    pub themes: ThemeManager,
    pub favorites: FavoritesRegistry,
    pub layout: LayoutStore,
    pub demo_mode: DemoModeStore,
    service: WeatherService,
    poller: Option<LocationPoller>,
}

/// One rendered pass over the enabled widgets.
#[derive(Debug, Clone)]
pub struct Summary {
    pub place: String,
    pub headline: String,
    pub details: Vec<String>,
    pub comment: &'static str,
    pub air_quality: Option<AirQualityReport>,
    /// `None` while the radar widget is disabled
    pub radar: Option<CoverageStatus>,
    pub rain: RainForecast,
}

impl Dashboard {
    /// Open storage from config and build every store.
    ///
    /// # Errors
    ///
    /// `AppError::Io` when the data directory cannot be created,
    /// `AppError::Persistence` when the database cannot be opened and
    /// `AppError::Weather` for an invalid API address.
    pub fn new(config: Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.data_dir)?;
        let store = SqliteStore::open(&config.storage_path())?;
        Self::with_store(config, Arc::new(store))
    }

    pub fn with_store(config: Config, kv: Arc<dyn KeyValueStore>) -> Result<Self, AppError> {
        let client = WeatherClient::from_config(&config.api)?;
        let radar_refresh = Duration::from_secs(u64::from(config.radar.refresh_minutes) * 60);

        Ok(Self {
            preferences: UserPreferenceStore::open_user(kv.clone(), SystemPreferences::detect()),
            themes: ThemeManager::open(kv.clone()),
            favorites: FavoritesRegistry::open(kv.clone()),
            layout: LayoutStore::open(kv.clone()),
            demo_mode: DemoModeStore::open(kv),
            service: WeatherService::with_radar_refresh(client, radar_refresh),
            poller: None,
            config: Arc::new(config),
        })
    }

    /// Start location polling when a fixed position is configured.
    pub fn initialize(&mut self) {
        let Some(source) = FixedLocationSource::from_config(&self.config.location) else {
            tracing::info!("No location configured; weather queries stay idle");
            return;
        };
        let interval = Duration::from_secs(self.config.location.poll_interval_secs);
        self.poller = Some(LocationPoller::spawn(Arc::new(source), interval));

        tracing::info!(
            "Dashboard initialized: theme={}, {} favorites, {}/{} widgets enabled",
            self.themes.current_theme().id,
            self.favorites.len(),
            self.layout.enabled_count(),
            self.layout.total_widgets()
        );
    }

    /// Wait briefly for the poller's first fix.
    pub async fn current_location(&self) -> Option<Coordinates> {
        let poller = self.poller.as_ref()?;
        let mut rx = poller.subscribe();
        let outcome = tokio::time::timeout(
            FIRST_FIX_TIMEOUT,
            rx.wait_for(|state| !matches!(state, LocationState::Pending)),
        )
        .await;
        let state = match outcome {
            Ok(Ok(state)) => state.clone(),
            Ok(Err(_)) => return None,
            Err(_) => {
                tracing::warn!("Timed out waiting for a location fix");
                return None;
            }
        };
        match state {
            LocationState::Located(position) => Some(position.coordinates()),
            LocationState::Failed(e) => {
                tracing::warn!("Location unavailable: {}", e);
                None
            }
            LocationState::Pending => None,
        }
    }

    /// Fetch and format what the dashboard shows for `at`.
    ///
    /// # Errors
    ///
    /// Returns the weather fetch error; air quality and city name failures
    /// are logged and left out of the summary.
    pub async fn summary(&self, at: Coordinates) -> Result<Summary, WeatherError> {
        let weather = self.service.weather(Some(at)).await?;
        let Some(weather) = weather.data() else {
            return Err(WeatherError::MissingCoordinates);
        };

        let place = match self.service.city_name(Some(at)).await {
            Ok(state) => state.data().map(|n| n.to_string()).unwrap_or_default(),
            Err(e) => {
                tracing::warn!("City name lookup failed: {}", e);
                String::new()
            }
        };

        let air_quality = if self.layout.is_widget_enabled("air-quality") {
            self.service
                .air_quality_report(Some(at))
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!("Air quality unavailable: {}", e.user_message());
                    None
                })
        } else {
            None
        };

        let radar = if self.layout.is_widget_enabled("weather-radar") {
            Some(self.radar_coverage(at).await)
        } else {
            None
        };

        let current = &weather.current;
        let description = weather
            .primary_condition()
            .map(|c| c.description.as_str())
            .unwrap_or_default();
        let emoji = weather_emoji(description, weather.is_night_at(Utc::now()));
        let headline = format!(
            "{} {}°F, {}",
            emoji,
            remove_trailing_numbers(&current.temp.to_string()),
            description
        );

        let mut details = vec![
            format!(
                "Feels like {}°F, humidity {}%",
                remove_trailing_numbers(&current.feels_like.to_string()),
                current.humidity
            ),
            format!(
                "Wind {} mph {}",
                remove_trailing_numbers(&current.wind_speed.to_string()),
                wind_direction(current.wind_deg)
            ),
        ];
        if let (Some(sunrise), Some(sunset)) = (current.sunrise, current.sunset) {
            details.push(format!(
                "Sunrise {}, sunset {}",
                format_time(sunrise, weather.timezone_offset),
                format_time(sunset, weather.timezone_offset)
            ));
        }

        let mut rng = ThreadRandom;
        let comment = weather_comment(current.temp, description, &mut rng);
        let rain = RainForecast::build(self.demo_mode.is_enabled(), &Local::now(), &mut rng);

        Ok(Summary {
            place,
            headline,
            details,
            comment,
            air_quality,
            radar,
            rain,
        })
    }

    async fn radar_coverage(&self, at: Coordinates) -> CoverageStatus {
        let state = RadarState::default();
        let animate = !self.preferences.get().should_reduce_motion();
        match self
            .service
            .radar(Some(at), &state, self.config.radar.zoom, animate, &RadarSettings::default())
            .await
        {
            Ok(data) => coverage_status(data.data(), &state),
            Err(e) => {
                tracing::warn!("Radar unavailable: {}", e.user_message());
                CoverageStatus::Unknown
            }
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stop background tasks.
    pub fn shutdown(&mut self) {
        tracing::info!("Shutting down dashboard");
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glass_prefs::MemoryStore;

    fn dashboard(config: Config) -> Dashboard {
        Dashboard::with_store(config, Arc::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_fresh_store_uses_defaults() {
        let dashboard = dashboard(Config::default());
        assert!(dashboard.favorites.is_empty());
        assert_eq!(dashboard.layout.enabled_count(), 7);
        assert!(!dashboard.demo_mode.is_enabled());
        assert_eq!(dashboard.preferences.get().refresh_interval, 10);
    }

    #[test]
    fn test_new_opens_sqlite_under_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: dir.path().join("nested"),
            ..Config::default()
        };

        let dashboard = Dashboard::new(config).unwrap();
        assert!(dashboard.config().storage_path().exists());
    }

    #[test]
    fn test_unusable_data_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();
        let config = Config {
            data_dir: blocker,
            ..Config::default()
        };

        let err = Dashboard::new(config).err().unwrap();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(err.user_message(), "A file operation failed. Please try again.");
    }

    #[test]
    fn test_invalid_api_address_is_weather_error() {
        let mut config = Config::default();
        config.api.api_base_url = "not a url".to_string();

        let err = Dashboard::with_store(config, Arc::new(MemoryStore::new())).err().unwrap();
        assert!(matches!(err, AppError::Weather(WeatherError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_no_configured_location_stays_idle() {
        let mut config = Config::default();
        config.location.latitude = None;
        config.location.longitude = None;

        let mut dashboard = dashboard(config);
        dashboard.initialize();
        assert!(dashboard.current_location().await.is_none());
        dashboard.shutdown();
    }

    #[tokio::test]
    async fn test_fixed_location_reports_first_fix() {
        let mut config = Config::default();
        config.location.latitude = Some(51.5072);
        config.location.longitude = Some(-0.1276);

        let mut dashboard = dashboard(config);
        dashboard.initialize();
        let here = dashboard.current_location().await.unwrap();
        assert_eq!(here.id().as_str(), "51.5072,-0.1276");
        dashboard.shutdown();
    }
}
