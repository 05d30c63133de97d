//! Key/endpoint resolution.
//!
//! Every request is resolved to a single plan up front: either a
//! fully-formed provider URL (direct key or URL template) or a proxy
//! dispatch that keeps the key server-side. Call sites never branch on the
//! configuration themselves.

use skycast_core::config::ProviderConfig;

use crate::error::WeatherError;
use crate::types::Coord;

/// Canonical provider API base.
pub const DEFAULT_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

/// Logical provider resources, also used as the proxy `resource` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Weather,
    Forecast,
    AirPollution,
    OneCall,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Weather => "weather",
            Resource::Forecast => "forecast",
            Resource::AirPollution => "air_pollution",
            Resource::OneCall => "onecall",
        }
    }
}

/// Request parameters: a city name, coordinates, or both.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    pub city: Option<String>,
    pub coords: Option<Coord>,
}

impl RequestParams {
    pub fn city(city: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            coords: None,
        }
    }

    pub fn coords(lat: f64, lon: f64) -> Self {
        Self {
            city: None,
            coords: Some(Coord { lat, lon }),
        }
    }
}

/// Resolved request plan, consumed uniformly by the fetch wrapper.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPlan {
    /// Fully-formed provider URL
    Direct(String),
    /// Dispatch through the configured proxy
    Proxy {
        resource: Resource,
        params: Vec<(&'static str, String)>,
    },
}

/// Resolve a request against the provider configuration.
///
/// A configured proxy takes precedence for every resource. Otherwise the
/// configured value is used as a URL template or as a literal key; an
/// unusable configuration fails here, before any request is attempted.
pub fn resolve(
    provider: &ProviderConfig,
    api_base: &str,
    resource: Resource,
    params: &RequestParams,
) -> Result<RequestPlan, WeatherError> {
    if provider.proxy_base().is_some() {
        return Ok(RequestPlan::Proxy {
            resource,
            params: proxy_params(provider, resource, params),
        });
    }

    if provider.key_is_url() {
        return resolve_template(provider, params);
    }

    if !provider.has_valid_api_key() {
        return Err(WeatherError::MissingApiKey);
    }

    Ok(RequestPlan::Direct(direct_url(provider, api_base, resource, params)?))
}

fn proxy_params(
    provider: &ProviderConfig,
    resource: Resource,
    params: &RequestParams,
) -> Vec<(&'static str, String)> {
    let mut out = Vec::new();
    if let Some(city) = &params.city {
        out.push(("q", city.clone()));
    }
    if let Some(coords) = params.coords {
        out.push(("lat", coords.lat.to_string()));
        out.push(("lon", coords.lon.to_string()));
    }
    // The air-pollution endpoint takes no units
    if resource != Resource::AirPollution {
        out.push(("units", provider.units.clone()));
    }
    out
}

/// Resolve a URL-template configuration value.
///
/// Substitutes `{city}`, `{lat}` and `{lon}` for present parameters. A
/// remaining `{API key}` placeholder, or a template that never carried an
/// `appid`, is a fatal configuration error.
fn resolve_template(
    provider: &ProviderConfig,
    params: &RequestParams,
) -> Result<RequestPlan, WeatherError> {
    let mut tpl = provider.api_key.clone();

    if let Some(city) = &params.city {
        tpl = tpl.replace("{city}", &urlencoding::encode(city));
    }
    if let Some(coords) = params.coords {
        tpl = tpl.replace("{lat}", &coords.lat.to_string());
        tpl = tpl.replace("{lon}", &coords.lon.to_string());
    }

    if has_api_key_placeholder(&tpl) {
        return Err(WeatherError::Config(
            "URL template contains an {API key} placeholder - supply a real API key".to_string(),
        ));
    }

    if !tpl.to_ascii_lowercase().contains("appid=") {
        return Err(WeatherError::Config(
            "URL template has no appid parameter - configuration is incomplete".to_string(),
        ));
    }

    if !tpl.to_ascii_lowercase().contains("units=") {
        tpl.push(if tpl.contains('?') { '&' } else { '?' });
        tpl.push_str("units=");
        tpl.push_str(&provider.units);
    }

    Ok(RequestPlan::Direct(tpl))
}

/// True if the string still contains a `{... API key ...}` style placeholder.
fn has_api_key_placeholder(tpl: &str) -> bool {
    let mut rest = tpl;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            return false;
        };
        let inner = rest[open + 1..open + close].trim().to_ascii_lowercase();
        if inner == "api key" || inner == "api_key" {
            return true;
        }
        rest = &rest[open + close + 1..];
    }
    false
}

/// Build the canonical provider URL for a literal API key.
fn direct_url(
    provider: &ProviderConfig,
    api_base: &str,
    resource: Resource,
    params: &RequestParams,
) -> Result<String, WeatherError> {
    let key = urlencoding::encode(&provider.api_key).into_owned();
    let units = &provider.units;

    match resource {
        Resource::Weather => {
            if let Some(city) = &params.city {
                Ok(format!(
                    "{}/weather?q={}&units={}&appid={}",
                    api_base,
                    urlencoding::encode(city),
                    units,
                    key
                ))
            } else if let Some(c) = params.coords {
                Ok(format!(
                    "{}/weather?lat={}&lon={}&units={}&appid={}",
                    api_base, c.lat, c.lon, units, key
                ))
            } else {
                Err(WeatherError::Config(
                    "City or coordinates required for current conditions".to_string(),
                ))
            }
        }
        Resource::Forecast => {
            let city = params.city.as_ref().ok_or_else(|| {
                WeatherError::Config("City required for forecast".to_string())
            })?;
            Ok(format!(
                "{}/forecast?q={}&units={}&appid={}",
                api_base,
                urlencoding::encode(city),
                units,
                key
            ))
        }
        Resource::AirPollution => {
            let c = params.coords.ok_or_else(|| {
                WeatherError::Config("Coordinates required for air quality".to_string())
            })?;
            Ok(format!(
                "{}/air_pollution?lat={}&lon={}&appid={}",
                api_base, c.lat, c.lon, key
            ))
        }
        Resource::OneCall => {
            let c = params.coords.ok_or_else(|| {
                WeatherError::Config("Coordinates required for the weekly forecast".to_string())
            })?;
            Ok(format!(
                "{}/onecall?lat={}&lon={}&exclude=minutely,hourly,alerts&units={}&appid={}",
                api_base, c.lat, c.lon, units, key
            ))
        }
    }
}
