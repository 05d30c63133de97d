//! Session controller.
//!
//! Owns the per-session weather state and drives the dashboard: searches,
//! horizon switches, favourites, and the auto-refresh timer. Fetch failures
//! never escape as errors; they surface as alerts and leave the previous
//! render in place.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use skycast_core::alert::{Alert, AlertCenter, CONFIG_TIMEOUT_MS};
use skycast_core::config::{Config, RefreshConfig};
use skycast_store::FavoritesStore;
use skycast_weather::aggregate::{
    daily_summaries, hourly_view, weekly_summaries, DAILY_MAX_DAYS, WEEKLY_MAX_DAYS,
};
use skycast_weather::types::{Coord, ForecastResponse, OneCallResponse};
use skycast_weather::{WeatherClient, WeatherError};

use crate::view::{Dashboard, Horizon, PageLayout};

/// Weather state for the current session. Cleared when the session ends,
/// unlike favourites which persist.
#[derive(Debug, Default)]
pub struct SessionState {
    pub current_city: Option<String>,
    pub current_country: Option<String>,
    pub current_coords: Option<Coord>,
    /// City the cached forecast belongs to
    pub forecast_city: Option<String>,
    pub last_forecast: Option<ForecastResponse>,
    pub last_weekly: Option<OneCallResponse>,
}

pub struct Controller {
    config: Config,
    client: WeatherClient,
    favorites: FavoritesStore,
    pub alerts: AlertCenter,
    pub session: SessionState,
    pub dashboard: Dashboard,
}

impl Controller {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = WeatherClient::new(config.provider.clone())?;
        let favorites = FavoritesStore::new(config.config_dir.join("favorites.json"));
        Ok(Self::from_parts(config, client, favorites, PageLayout::default(), true))
    }

    /// Assemble a controller from pre-built parts. Tests inject a client
    /// pointed at a mock server and a store in a temp directory.
    pub fn from_parts(
        config: Config,
        client: WeatherClient,
        favorites: FavoritesStore,
        layout: PageLayout,
        has_alert_container: bool,
    ) -> Self {
        Self {
            config,
            client,
            favorites,
            alerts: AlertCenter::new(has_alert_container),
            session: SessionState::default(),
            dashboard: Dashboard::new(layout),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    /// Search by city name: fetch current conditions, then the 5-day
    /// forecast. The forecast is secondary; its failure leaves the
    /// conditions card in place.
    pub async fn search_city(&mut self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            self.alerts.show(Alert::warning("Please enter a city name"));
            return;
        }
        if !self.ensure_configured() {
            return;
        }

        let current = match self.client.current_by_city(city).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("city search failed: {}", e);
                self.alerts.show(Alert::danger(e.user_message()));
                return;
            }
        };

        self.apply_current(&current).await;

        match self.client.forecast_by_city(city).await {
            Ok(forecast) => {
                let days = daily_summaries(&forecast.list, DAILY_MAX_DAYS);
                self.session.forecast_city = Some(current.name.clone());
                self.session.last_forecast = Some(forecast);
                self.dashboard.render_daily(&days);
            }
            Err(e) => {
                tracing::warn!("forecast fetch failed: {}", e);
                self.alerts.show(Alert::danger("Failed to load 5-day forecast"));
            }
        }
    }

    /// Show current conditions for device coordinates.
    pub async fn use_location(&mut self, lat: f64, lon: f64) {
        if !self.ensure_configured() {
            return;
        }
        match self.client.current_by_coords(lat, lon).await {
            Ok(data) => self.apply_current(&data).await,
            Err(e) => {
                tracing::warn!("location lookup failed: {}", e);
                self.alerts.show(Alert::danger(e.user_message()));
            }
        }
    }

    /// Re-run the last lookup. City takes precedence over coordinates.
    pub async fn refresh(&mut self) {
        if let Some(city) = self.session.current_city.clone() {
            self.search_city(&city).await;
        } else if let Some(coords) = self.session.current_coords {
            self.use_location(coords.lat, coords.lon).await;
        } else {
            self.alerts.show(Alert::warning("Search for a city first"));
        }
    }

    /// Switch the visible forecast horizon, fetching whatever the cache is
    /// missing.
    pub async fn select_horizon(&mut self, horizon: Horizon) {
        match horizon {
            Horizon::Hourly => self.show_hourly().await,
            Horizon::Daily => self.show_daily().await,
            Horizon::Weekly => self.show_weekly().await,
        }
    }

    async fn show_hourly(&mut self) {
        let Some(city) = self.session.current_city.clone() else {
            self.alerts.show(Alert::warning("Search for a city first"));
            return;
        };
        let forecast = match self.forecast_for(&city, true).await {
            Ok(forecast) => forecast,
            Err(e) => {
                tracing::warn!("hourly fetch failed: {}", e);
                self.alerts.show(Alert::danger("Failed to load hourly forecast"));
                return;
            }
        };
        let samples = hourly_view(
            &forecast.list,
            Utc::now().timestamp(),
            self.config.forecast.hourly_window_hours,
        );
        self.dashboard.render_hourly(&samples);
    }

    async fn show_daily(&mut self) {
        // Any cached forecast is acceptable here, even from another city
        let forecast = if let Some(cached) = &self.session.last_forecast {
            cached.clone()
        } else {
            let Some(city) = self.session.current_city.clone() else {
                self.alerts.show(Alert::warning("Search for a city first"));
                return;
            };
            match self.forecast_for(&city, true).await {
                Ok(forecast) => forecast,
                Err(e) => {
                    tracing::warn!("5-day fetch failed: {}", e);
                    self.alerts.show(Alert::danger("Failed to load 5-day forecast"));
                    return;
                }
            }
        };
        let days = daily_summaries(&forecast.list, DAILY_MAX_DAYS);
        self.dashboard.render_daily(&days);
    }

    async fn show_weekly(&mut self) {
        let Some(coords) = self.locate_coords().await else {
            self.alerts.show(Alert::warning("Search for a city first"));
            return;
        };

        let weekly = if let Some(cached) = &self.session.last_weekly {
            cached.clone()
        } else {
            match self.client.weekly_by_coords(coords.lat, coords.lon).await {
                Ok(data) => {
                    self.session.last_weekly = Some(data.clone());
                    data
                }
                Err(e) => {
                    tracing::warn!("weekly fetch failed: {}", e);
                    self.alerts.show(Alert::danger("Failed to load weekly forecast"));
                    return;
                }
            }
        };
        let days = weekly_summaries(&weekly.daily, WEEKLY_MAX_DAYS);
        self.dashboard.render_weekly(&days);
    }

    /// Save the session's current location. Warns when nothing has been
    /// looked up yet.
    pub fn save_current_as_favorite(&mut self) {
        let (Some(city), country) = (
            self.session.current_city.clone(),
            self.session.current_country.clone().unwrap_or_default(),
        ) else {
            self.alerts.show(Alert::warning("Search for a city first"));
            return;
        };

        let (lat, lon) = match self.session.current_coords {
            Some(c) => (Some(c.lat), Some(c.lon)),
            None => (None, None),
        };
        if self.favorites.save(lat, lon, &city, &country) {
            self.alerts.show(Alert::success(format!("Saved {city} to favourites")));
        } else {
            self.alerts.show(Alert::info(format!("{city} is already saved")));
        }
    }

    async fn apply_current(&mut self, data: &skycast_weather::types::CurrentConditions) {
        self.session.current_city = Some(data.name.clone());
        self.session.current_country = data.country().map(str::to_string);
        self.session.current_coords = data.coord;

        // AQI is decoration on the card; failures degrade to no badge
        let aqi = match data.coord {
            Some(c) => self.client.air_quality(c.lat, c.lon).await.unwrap_or_else(|e| {
                tracing::debug!("air quality lookup failed: {}", e);
                None
            }),
            None => None,
        };

        self.dashboard.render_current(data, aqi, Utc::now());
        if let Some(c) = data.coord {
            self.dashboard.render_map(c.lat, c.lon, &data.name);
        }
    }

    /// Cached forecast for `city`, fetching on miss. With `require_match`
    /// the cache only counts when it belongs to the same city
    /// (case-insensitive).
    async fn forecast_for(
        &mut self,
        city: &str,
        require_match: bool,
    ) -> Result<ForecastResponse, WeatherError> {
        if let Some(cached) = &self.session.last_forecast {
            let matches = self
                .session
                .forecast_city
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(city));
            if matches || !require_match {
                return Ok(cached.clone());
            }
        }

        let forecast = self.client.forecast_by_city(city).await?;
        self.session.forecast_city = Some(city.to_string());
        self.session.last_forecast = Some(forecast.clone());
        Ok(forecast)
    }

    /// Best known coordinates: the session's, then the cached forecast
    /// city's, then a fresh lookup by city name.
    async fn locate_coords(&mut self) -> Option<Coord> {
        if let Some(coords) = self.session.current_coords {
            return Some(coords);
        }
        if let Some(coord) = self
            .session
            .last_forecast
            .as_ref()
            .and_then(|f| f.city.as_ref())
            .and_then(|c| c.coord)
        {
            return Some(coord);
        }
        let city = self.session.current_city.clone()?;
        match self.client.current_by_city(&city).await {
            Ok(data) => {
                self.session.current_coords = data.coord;
                data.coord
            }
            Err(e) => {
                tracing::warn!("coordinate lookup failed: {}", e);
                None
            }
        }
    }

    fn ensure_configured(&mut self) -> bool {
        if self.client.provider().is_configured() {
            return true;
        }
        self.alerts.show(
            Alert::warning(
                "Weather API key not configured. Add your OpenWeather key to continue.",
            )
            .with_timeout(CONFIG_TIMEOUT_MS),
        );
        false
    }
}

/// Controller plus its auto-refresh timer.
pub struct App {
    controller: Arc<Mutex<Controller>>,
    refresh_task: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            refresh_task: None,
        }
    }

    pub fn controller(&self) -> Arc<Mutex<Controller>> {
        Arc::clone(&self.controller)
    }

    pub fn auto_refresh_enabled(&self) -> bool {
        self.refresh_task.is_some()
    }

    /// Enable or disable periodic refresh. Re-enabling replaces the running
    /// timer; an interval of 0 falls back to the default.
    pub async fn set_auto_refresh(&mut self, enabled: bool, interval_minutes: u32) {
        if let Some(task) = self.refresh_task.take() {
            task.abort();
        }

        if !enabled {
            let mut controller = self.controller.lock().await;
            controller.alerts.show(Alert::info("Auto-refresh disabled").with_timeout(2_000));
            return;
        }

        let minutes = if interval_minutes == 0 {
            RefreshConfig::default().interval_minutes
        } else {
            interval_minutes
        };

        let controller = Arc::clone(&self.controller);
        self.refresh_task = Some(tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(Duration::from_secs(u64::from(minutes) * 60));
            // the first tick completes immediately; refresh only on elapsed
            // intervals
            ticker.tick().await;
            loop {
                ticker.tick().await;
                controller.lock().await.refresh().await;
            }
        }));

        let mut controller = self.controller.lock().await;
        controller
            .alerts
            .show(Alert::info(format!("Auto-refresh enabled ({minutes} min)")).with_timeout(3_000));
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(task) = self.refresh_task.take() {
            task.abort();
        }
    }
}
