//! Provider payload types.
//!
//! Deserialized with every optional field modelled as `Option`: the provider
//! omits `feels_like`, `pop` and the `weather` array entries often enough
//! that nothing here may be assumed present.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Geographic coordinates as returned by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

/// One entry of the provider's `weather` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub icon: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wind {
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sys {
    pub country: Option<String>,
}

/// The provider's `main` block, shared by current conditions and forecast
/// samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thermals {
    pub temp: f64,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity: Option<u8>,
}

/// Current conditions response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub name: String,
    pub sys: Option<Sys>,
    pub main: Thermals,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub wind: Option<Wind>,
    pub coord: Option<Coord>,
}

impl CurrentConditions {
    pub fn country(&self) -> Option<&str> {
        self.sys.as_ref().and_then(|s| s.country.as_deref())
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

/// One 3-hourly forecast data point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Unix timestamp, seconds
    pub dt: i64,
    pub main: Thermals,
    #[serde(default)]
    pub weather: Vec<Condition>,
    /// Precipitation probability, 0..1
    pub pop: Option<f64>,
}

impl ForecastSample {
    /// UTC calendar date of the sample.
    pub fn utc_date(&self) -> NaiveDate {
        DateTime::<Utc>::from_timestamp(self.dt, 0)
            .unwrap_or_default()
            .date_naive()
    }

    /// UTC hour of the sample (0..=23).
    pub fn utc_hour(&self) -> u32 {
        use chrono::Timelike;
        DateTime::<Utc>::from_timestamp(self.dt, 0)
            .unwrap_or_default()
            .hour()
    }

    pub fn icon(&self) -> Option<&str> {
        self.weather.first().and_then(|c| c.icon.as_deref())
    }

    pub fn description(&self) -> Option<&str> {
        self.weather.first().and_then(|c| c.description.as_deref())
    }

    /// Lower bound this sample contributes to a day's minimum: `temp_min`
    /// when present, the plain temperature otherwise.
    pub fn min_or_temp(&self) -> f64 {
        self.main.temp_min.unwrap_or(self.main.temp)
    }

    /// Upper bound this sample contributes to a day's maximum.
    pub fn max_or_temp(&self) -> f64 {
        self.main.temp_max.unwrap_or(self.main.temp)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastCity {
    pub name: String,
    pub coord: Option<Coord>,
}

/// 5-day / 3-hour forecast response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastSample>,
    pub city: Option<ForecastCity>,
}

/// Air Quality Index, 1 (Good) to 5 (Very Poor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aqi(pub u8);

impl Aqi {
    pub fn label(&self) -> &'static str {
        match self.0 {
            1 => "Good",
            2 => "Fair",
            3 => "Moderate",
            4 => "Poor",
            5 => "Very Poor",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for Aqi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.0, self.label())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirPollutionResponse {
    #[serde(default)]
    pub list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirPollutionEntry {
    pub main: AqiMain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AqiMain {
    pub aqi: u8,
}

/// Daily min/max from the one-call endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTemp {
    pub min: f64,
    pub max: f64,
}

/// One pre-aggregated daily record from the one-call endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRecord {
    pub dt: i64,
    pub temp: DailyTemp,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub pop: Option<f64>,
}

impl DailyRecord {
    pub fn icon(&self) -> Option<&str> {
        self.weather.first().and_then(|c| c.icon.as_deref())
    }

    pub fn description(&self) -> Option<&str> {
        self.weather.first().and_then(|c| c.description.as_deref())
    }
}

/// One-call response, daily records only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneCallResponse {
    #[serde(default)]
    pub daily: Vec<DailyRecord>,
}
