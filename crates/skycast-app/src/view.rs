//! Dashboard view models.
//!
//! Pure presentation state: the controller writes into a [`Dashboard`] and a
//! frontend reads it back out. Every render targets one named region of the
//! page layout; rendering into a region the layout does not carry is a
//! silent no-op, so the same controller drives full and partial pages.

use chrono::{DateTime, Utc};
use skycast_weather::types::{Aqi, CurrentConditions, ForecastSample};
use skycast_weather::DaySummary;

/// Provider icon image, 2x resolution.
pub fn icon_url(icon: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon}@2x.png")
}

/// Which forecast horizon is on screen. At most one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    Hourly,
    Daily,
    Weekly,
}

/// Regions the current page actually has. Partial pages (a favourites list,
/// the contact page) carry only some of them.
#[derive(Debug, Clone, Copy)]
pub struct PageLayout {
    pub has_weather_card: bool,
    pub has_hourly: bool,
    pub has_daily: bool,
    pub has_weekly: bool,
    pub has_map: bool,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            has_weather_card: true,
            has_hourly: true,
            has_daily: true,
            has_weekly: true,
            has_map: true,
        }
    }
}

impl PageLayout {
    /// A page with none of the dashboard regions.
    pub fn empty() -> Self {
        Self {
            has_weather_card: false,
            has_hourly: false,
            has_daily: false,
            has_weekly: false,
            has_map: false,
        }
    }
}

/// The main current-conditions card.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherCard {
    /// "City, CC" when the country is known, bare city name otherwise
    pub city_label: String,
    pub description: Option<String>,
    /// Rounded for display
    pub temp: i64,
    pub feels_like: Option<i64>,
    pub humidity: Option<u8>,
    pub wind_speed: Option<f64>,
    pub aqi_label: Option<String>,
    pub icon_url: Option<String>,
    /// "HH:MM" UTC
    pub last_updated: String,
}

/// One tile in a forecast strip, any horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCard {
    /// "HH:MM" for hourly tiles, short weekday name for day tiles
    pub label: String,
    pub icon_url: Option<String>,
    pub description: Option<String>,
    /// Rounded display temperature: the sample temperature for hourly
    /// tiles, the daily maximum for day tiles
    pub primary_temp: i64,
    /// Daily minimum; absent on hourly tiles
    pub secondary_temp: Option<i64>,
    pub precipitation_pct: Option<u8>,
}

/// Map centered on the current location.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub lat: f64,
    pub lon: f64,
    pub zoom: u8,
    pub marker_label: String,
}

const MAP_ZOOM: u8 = 10;

/// Horizon selector button state. Exactly one is active while a horizon is
/// visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonStates {
    pub hourly_active: bool,
    pub daily_active: bool,
    pub weekly_active: bool,
}

/// Render target for the whole dashboard page.
#[derive(Debug, Default)]
pub struct Dashboard {
    layout: PageLayout,
    weather_card: Option<WeatherCard>,
    map: Option<MapView>,
    hourly: Vec<ForecastCard>,
    daily: Vec<ForecastCard>,
    weekly: Vec<ForecastCard>,
    visible_horizon: Option<Horizon>,
    buttons: ButtonStates,
}

impl Dashboard {
    pub fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn weather_card(&self) -> Option<&WeatherCard> {
        self.weather_card.as_ref()
    }

    pub fn map(&self) -> Option<&MapView> {
        self.map.as_ref()
    }

    pub fn hourly_cards(&self) -> &[ForecastCard] {
        &self.hourly
    }

    pub fn daily_cards(&self) -> &[ForecastCard] {
        &self.daily
    }

    pub fn weekly_cards(&self) -> &[ForecastCard] {
        &self.weekly
    }

    pub fn visible_horizon(&self) -> Option<Horizon> {
        self.visible_horizon
    }

    pub fn buttons(&self) -> ButtonStates {
        self.buttons
    }

    /// Replace the current-conditions card. No-op without a card region.
    pub fn render_current(&mut self, data: &CurrentConditions, aqi: Option<Aqi>, now: DateTime<Utc>) {
        if !self.layout.has_weather_card {
            return;
        }

        let city_label = match data.country() {
            Some(country) => format!("{}, {}", data.name, country),
            None => data.name.clone(),
        };

        self.weather_card = Some(WeatherCard {
            city_label,
            description: data.condition().and_then(|c| c.description.clone()),
            temp: data.main.temp.round() as i64,
            feels_like: data.main.feels_like.map(|t| t.round() as i64),
            humidity: data.main.humidity,
            wind_speed: data.wind.as_ref().and_then(|w| w.speed),
            aqi_label: aqi.map(|a| a.to_string()),
            icon_url: data.condition().and_then(|c| c.icon.as_deref()).map(icon_url),
            last_updated: now.format("%H:%M").to_string(),
        });
    }

    /// Recenter the map. No-op without a map region.
    pub fn render_map(&mut self, lat: f64, lon: f64, marker_label: &str) {
        if !self.layout.has_map {
            return;
        }
        self.map = Some(MapView {
            lat,
            lon,
            zoom: MAP_ZOOM,
            marker_label: marker_label.to_string(),
        });
    }

    /// Replace the hourly strip and make it the visible horizon.
    pub fn render_hourly(&mut self, samples: &[ForecastSample]) {
        if !self.layout.has_hourly {
            return;
        }
        self.hourly.clear();
        self.hourly.extend(samples.iter().map(hourly_card));
        self.set_horizon(Horizon::Hourly);
    }

    /// Replace the 5-day strip and make it the visible horizon.
    pub fn render_daily(&mut self, days: &[DaySummary]) {
        if !self.layout.has_daily {
            return;
        }
        self.daily.clear();
        self.daily.extend(days.iter().map(day_card));
        self.set_horizon(Horizon::Daily);
    }

    /// Replace the weekly strip and make it the visible horizon.
    pub fn render_weekly(&mut self, days: &[DaySummary]) {
        if !self.layout.has_weekly {
            return;
        }
        self.weekly.clear();
        self.weekly.extend(days.iter().map(day_card));
        self.set_horizon(Horizon::Weekly);
    }

    fn set_horizon(&mut self, horizon: Horizon) {
        self.visible_horizon = Some(horizon);
        self.buttons = ButtonStates {
            hourly_active: horizon == Horizon::Hourly,
            daily_active: horizon == Horizon::Daily,
            weekly_active: horizon == Horizon::Weekly,
        };
    }
}

fn hourly_card(sample: &ForecastSample) -> ForecastCard {
    let label = DateTime::<Utc>::from_timestamp(sample.dt, 0)
        .unwrap_or_default()
        .format("%H:%M")
        .to_string();
    ForecastCard {
        label,
        icon_url: sample.icon().map(icon_url),
        description: sample.description().map(str::to_string),
        primary_temp: sample.main.temp.round() as i64,
        secondary_temp: None,
        precipitation_pct: sample.pop.map(|p| (p * 100.0).round().clamp(0.0, 255.0) as u8),
    }
}

fn day_card(day: &DaySummary) -> ForecastCard {
    ForecastCard {
        label: day.label.clone(),
        icon_url: day.icon.as_deref().map(icon_url),
        description: day.description.clone(),
        primary_temp: day.max_temp.round() as i64,
        secondary_temp: Some(day.min_temp.round() as i64),
        precipitation_pct: day.precipitation_pct,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::TimeZone;
    use skycast_weather::types::{Condition, Coord, Sys, Thermals, Wind};

    fn current() -> CurrentConditions {
        CurrentConditions {
            name: "Paris".to_string(),
            sys: Some(Sys {
                country: Some("FR".to_string()),
            }),
            main: Thermals {
                temp: 21.6,
                feels_like: Some(20.2),
                temp_min: None,
                temp_max: None,
                humidity: Some(60),
            },
            weather: vec![Condition {
                icon: Some("01d".to_string()),
                description: Some("clear sky".to_string()),
            }],
            wind: Some(Wind { speed: Some(3.2) }),
            coord: Some(Coord { lat: 48.85, lon: 2.35 }),
        }
    }

    fn sample(dt: i64, temp: f64) -> ForecastSample {
        ForecastSample {
            dt,
            main: Thermals {
                temp,
                feels_like: None,
                temp_min: None,
                temp_max: None,
                humidity: None,
            },
            weather: vec![Condition {
                icon: Some("02d".to_string()),
                description: Some("few clouds".to_string()),
            }],
            pop: Some(0.25),
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_render_current_card_fields() {
        let mut dash = Dashboard::new(PageLayout::default());
        dash.render_current(&current(), Some(Aqi(2)), noon());

        let card = dash.weather_card().unwrap();
        assert_eq!(card.city_label, "Paris, FR");
        assert_eq!(card.temp, 22);
        assert_eq!(card.feels_like, Some(20));
        assert_eq!(card.aqi_label.as_deref(), Some("2 (Fair)"));
        assert_eq!(
            card.icon_url.as_deref(),
            Some("https://openweathermap.org/img/wn/01d@2x.png")
        );
        assert_eq!(card.last_updated, "12:30");
    }

    #[test]
    fn test_render_current_without_country() {
        let mut data = current();
        data.sys = None;
        let mut dash = Dashboard::new(PageLayout::default());
        dash.render_current(&data, None, noon());
        assert_eq!(dash.weather_card().unwrap().city_label, "Paris");
    }

    #[test]
    fn test_missing_regions_are_noops() {
        let mut dash = Dashboard::new(PageLayout::empty());
        dash.render_current(&current(), None, noon());
        dash.render_map(48.85, 2.35, "Paris");
        dash.render_hourly(&[sample(0, 10.0)]);
        dash.render_daily(&[]);
        dash.render_weekly(&[]);

        assert!(dash.weather_card().is_none());
        assert!(dash.map().is_none());
        assert!(dash.hourly_cards().is_empty());
        assert!(dash.visible_horizon().is_none());
        assert_eq!(dash.buttons(), ButtonStates::default());
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut dash = Dashboard::new(PageLayout::default());
        let samples = vec![sample(1_710_504_000, 10.4), sample(1_710_514_800, 11.6)];

        dash.render_hourly(&samples);
        let first: Vec<ForecastCard> = dash.hourly_cards().to_vec();
        dash.render_hourly(&samples);

        assert_eq!(dash.hourly_cards(), first.as_slice());
        assert_eq!(dash.hourly_cards().len(), 2);
    }

    #[test]
    fn test_hourly_card_labels_and_rounding() {
        let mut dash = Dashboard::new(PageLayout::default());
        // 2024-03-15T12:00:00Z
        dash.render_hourly(&[sample(1_710_504_000, 10.5)]);

        let card = &dash.hourly_cards()[0];
        assert_eq!(card.label, "12:00");
        assert_eq!(card.primary_temp, 11);
        assert_eq!(card.secondary_temp, None);
        assert_eq!(card.precipitation_pct, Some(25));
    }

    #[test]
    fn test_horizons_are_mutually_exclusive() {
        let mut dash = Dashboard::new(PageLayout::default());

        dash.render_hourly(&[sample(0, 10.0)]);
        assert_eq!(dash.visible_horizon(), Some(Horizon::Hourly));
        assert!(dash.buttons().hourly_active);
        assert!(!dash.buttons().daily_active);

        dash.render_weekly(&[]);
        assert_eq!(dash.visible_horizon(), Some(Horizon::Weekly));
        assert!(!dash.buttons().hourly_active);
        assert!(dash.buttons().weekly_active);
    }

    #[test]
    fn test_day_card_uses_max_and_min() {
        let day = DaySummary {
            date: chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            label: "Fri".to_string(),
            icon: Some("10d".to_string()),
            description: Some("light rain".to_string()),
            min_temp: 5.4,
            max_temp: 12.6,
            precipitation_pct: Some(42),
        };
        let mut dash = Dashboard::new(PageLayout::default());
        dash.render_daily(std::slice::from_ref(&day));

        let card = &dash.daily_cards()[0];
        assert_eq!(card.label, "Fri");
        assert_eq!(card.primary_temp, 13);
        assert_eq!(card.secondary_temp, Some(5));
        assert_eq!(card.precipitation_pct, Some(42));
    }

    #[test]
    fn test_map_defaults() {
        let mut dash = Dashboard::new(PageLayout::default());
        dash.render_map(48.85, 2.35, "Paris");
        let map = dash.map().unwrap();
        assert_eq!(map.zoom, 10);
        assert_eq!(map.marker_label, "Paris");
    }
}
