//! Weather provider HTTP client.
//!
//! Thin fetch wrapper around the resolved request plans: one GET per call,
//! no retry, non-success responses normalized into a single provider error
//! carrying the upstream message when one is present.

use std::time::Duration;

use skycast_core::config::ProviderConfig;

use crate::endpoint::{self, RequestParams, RequestPlan, Resource, DEFAULT_API_BASE};
use crate::error::WeatherError;
use crate::types::{
    AirPollutionResponse, Aqi, CurrentConditions, ForecastResponse, OneCallResponse,
};

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    provider: ProviderConfig,
    api_base: String,
}

impl WeatherClient {
    pub fn new(provider: ProviderConfig) -> Result<Self, WeatherError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            provider,
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Override the canonical provider base (tests point this at a mock
    /// server).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    /// Current conditions by city name.
    pub async fn current_by_city(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        self.request(Resource::Weather, &RequestParams::city(city)).await
    }

    /// Current conditions by coordinates.
    pub async fn current_by_coords(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentConditions, WeatherError> {
        self.request(Resource::Weather, &RequestParams::coords(lat, lon)).await
    }

    /// 5-day / 3-hour forecast by city name.
    pub async fn forecast_by_city(&self, city: &str) -> Result<ForecastResponse, WeatherError> {
        self.request(Resource::Forecast, &RequestParams::city(city)).await
    }

    /// Air Quality Index for coordinates.
    ///
    /// Best-effort: an unconfigured key without a proxy, or a response with
    /// no pollution entries, yields `None` rather than an error — AQI never
    /// fails the primary action.
    pub async fn air_quality(&self, lat: f64, lon: f64) -> Result<Option<Aqi>, WeatherError> {
        if self.provider.proxy_base().is_none() && !self.provider.has_valid_api_key() {
            return Ok(None);
        }

        let data: AirPollutionResponse = self
            .request(Resource::AirPollution, &RequestParams::coords(lat, lon))
            .await?;
        Ok(data.list.first().map(|entry| Aqi(entry.main.aqi)))
    }

    /// Pre-aggregated daily forecast by coordinates.
    pub async fn weekly_by_coords(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<OneCallResponse, WeatherError> {
        self.request(Resource::OneCall, &RequestParams::coords(lat, lon)).await
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        resource: Resource,
        params: &RequestParams,
    ) -> Result<T, WeatherError> {
        let plan = endpoint::resolve(&self.provider, &self.api_base, resource, params)?;
        let url = self.plan_url(plan);
        self.fetch_json(&url).await
    }

    fn plan_url(&self, plan: RequestPlan) -> String {
        match plan {
            RequestPlan::Direct(url) => url,
            RequestPlan::Proxy { resource, params } => {
                // proxy_base is Some whenever a Proxy plan was resolved
                let base = self.provider.proxy_base().unwrap_or_default();
                let mut url = format!("{}?resource={}", base, resource.as_str());
                for (key, value) in params {
                    url.push('&');
                    url.push_str(key);
                    url.push('=');
                    url.push_str(&urlencoding::encode(&value));
                }
                url
            }
        }
    }

    /// Single GET with uniform failure normalization.
    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, WeatherError> {
        tracing::debug!("fetching {}", url);
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Failed fetching weather")
                        .to_string()
                });
            tracing::warn!("provider request failed: {} - {}", status, message);
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(key: &str) -> ProviderConfig {
        ProviderConfig {
            api_key: key.to_string(),
            ..ProviderConfig::default()
        }
    }

    fn current_body() -> serde_json::Value {
        serde_json::json!({
            "name": "Paris",
            "sys": {"country": "FR"},
            "main": {"temp": 21.4, "feels_like": 20.9, "humidity": 60},
            "weather": [{"icon": "01d", "description": "clear sky"}],
            "wind": {"speed": 3.2},
            "coord": {"lat": 48.85, "lon": 2.35}
        })
    }

    #[tokio::test]
    async fn test_current_by_city() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Paris"))
            .and(query_param("appid", "testkey"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&server)
            .await;

        let client = WeatherClient::new(provider("testkey"))
            .unwrap()
            .with_api_base(server.uri());

        let data = client.current_by_city("Paris").await.unwrap();
        assert_eq!(data.name, "Paris");
        assert_eq!(data.coord.unwrap().lat, 48.85);
    }

    #[tokio::test]
    async fn test_error_body_message_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
            )
            .mount(&server)
            .await;

        let client = WeatherClient::new(provider("testkey"))
            .unwrap()
            .with_api_base(server.uri());

        let err = client.current_by_city("Atlantis").await.unwrap_err();
        match err {
            WeatherError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "city not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_without_body_falls_back_to_status_text() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = WeatherClient::new(provider("testkey"))
            .unwrap()
            .with_api_base(server.uri());

        let err = client.forecast_by_city("Paris").await.unwrap_err();
        match err {
            WeatherError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_proxy_dispatch() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/openweather"))
            .and(query_param("resource", "forecast"))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "list": [], "city": {"name": "Paris", "coord": {"lat": 48.85, "lon": 2.35}}
            })))
            .mount(&server)
            .await;

        // Placeholder key: the proxy carries the real one
        let mut p = provider("YOUR_API_KEY");
        p.proxy_url = Some(format!("{}/api/openweather", server.uri()));

        let client = WeatherClient::new(p).unwrap();
        let data = client.forecast_by_city("Paris").await.unwrap();
        assert_eq!(data.city.unwrap().name, "Paris");
    }

    #[tokio::test]
    async fn test_air_quality_unconfigured_is_none() {
        let client = WeatherClient::new(provider("")).unwrap();
        let aqi = client.air_quality(48.85, 2.35).await.unwrap();
        assert!(aqi.is_none());
    }

    #[tokio::test]
    async fn test_air_quality_reads_first_entry() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/air_pollution"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "list": [{"main": {"aqi": 3}}]
            })))
            .mount(&server)
            .await;

        let client = WeatherClient::new(provider("testkey"))
            .unwrap()
            .with_api_base(server.uri());

        let aqi = client.air_quality(48.85, 2.35).await.unwrap();
        assert_eq!(aqi, Some(Aqi(3)));
    }

    #[tokio::test]
    async fn test_air_quality_empty_list_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/air_pollution"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"list": []})))
            .mount(&server)
            .await;

        let client = WeatherClient::new(provider("testkey"))
            .unwrap()
            .with_api_base(server.uri());

        assert!(client.air_quality(0.0, 0.0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_weekly_by_coords() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/onecall"))
            .and(query_param("exclude", "minutely,hourly,alerts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "daily": [
                    {"dt": 1710504000, "temp": {"min": 5.2, "max": 12.8}, "pop": 0.42}
                ]
            })))
            .mount(&server)
            .await;

        let client = WeatherClient::new(provider("testkey"))
            .unwrap()
            .with_api_base(server.uri());

        let data = client.weekly_by_coords(48.85, 2.35).await.unwrap();
        assert_eq!(data.daily.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let client = WeatherClient::new(provider("YOUR_API_KEY")).unwrap();
        let err = client.current_by_city("Paris").await.unwrap_err();
        assert!(matches!(err, WeatherError::MissingApiKey));
    }
}
