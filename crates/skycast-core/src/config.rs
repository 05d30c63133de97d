use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Weather provider settings (API key / template / proxy)
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Auto-refresh settings
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Forecast view settings
    #[serde(default)]
    pub forecast: ForecastConfig,
}

/// Well-known proxy path used when `use_default_proxy` is set without an
/// explicit URL.
pub const DEFAULT_PROXY_PATH: &str = "/.netlify/functions/openweather-proxy";

/// Key values that are obviously unconfigured copies of documentation.
const PLACEHOLDER_PATTERNS: [&str; 3] = ["YOUR_", "REPLACE_ME", "CHANGE_ME"];

/// Weather provider configuration.
///
/// `api_key` holds either a literal provider API key or a full URL template
/// (with `{city}` / `{lat}` / `{lon}` placeholders) that already embeds one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Literal API key, or a URL template embedding one
    pub api_key: String,

    /// Explicit proxy endpoint fronting the provider (takes precedence over
    /// direct requests so the key never leaves the server)
    pub proxy_url: Option<String>,

    /// Use the well-known default proxy path when no explicit URL is set
    #[serde(default)]
    pub use_default_proxy: bool,

    /// Units passed through to the provider
    #[serde(default = "default_units")]
    pub units: String,
}

fn default_units() -> String {
    "metric".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            proxy_url: None,
            use_default_proxy: false,
            units: default_units(),
        }
    }
}

impl ProviderConfig {
    /// The proxy base to use, if any. An explicit URL wins over the default
    /// well-known path.
    pub fn proxy_base(&self) -> Option<String> {
        if let Some(url) = &self.proxy_url {
            if !url.is_empty() {
                return Some(url.clone());
            }
        }
        if self.use_default_proxy {
            return Some(DEFAULT_PROXY_PATH.to_string());
        }
        None
    }

    /// Whether `api_key` looks like a URL rather than a bare key.
    pub fn key_is_url(&self) -> bool {
        let lower = self.api_key.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }

    /// Check the configured value is usable as an API key: non-empty, not a
    /// documentation placeholder, and if URL-shaped it must already embed a
    /// real `appid` value.
    pub fn has_valid_api_key(&self) -> bool {
        if self.api_key.is_empty() {
            return false;
        }
        if self.key_is_url() {
            return url_embeds_key(&self.api_key);
        }
        !is_placeholder(&self.api_key)
    }

    /// Requests are possible when either a real key or a proxy is configured.
    pub fn is_configured(&self) -> bool {
        self.has_valid_api_key() || self.proxy_base().is_some()
    }
}

/// Case-insensitive check against the known placeholder patterns.
pub fn is_placeholder(value: &str) -> bool {
    let upper = value.to_ascii_uppercase();
    PLACEHOLDER_PATTERNS.iter().any(|p| upper.contains(p))
}

/// A URL-shaped key is valid only if it carries an `appid` query value that
/// is itself neither empty, a `{...}` placeholder, nor a documentation
/// placeholder.
fn url_embeds_key(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    let Some(pos) = lower.find("appid=") else {
        return false;
    };
    let value = &url[pos + "appid=".len()..];
    let value = value.split('&').next().unwrap_or("");
    !value.is_empty() && !value.starts_with('{') && !is_placeholder(value)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Auto-refresh interval in minutes
    pub interval_minutes: u32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Window for the hourly view, in hours from now
    pub hourly_window_hours: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            hourly_window_hours: 12,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skycast");

        Self {
            config_dir,
            provider: ProviderConfig {
                // Read from environment when present, placeholder otherwise
                api_key: std::env::var("OPENWEATHER_API_KEY").unwrap_or_default(),
                proxy_url: std::env::var("OPENWEATHER_PROXY_URL").ok(),
                use_default_proxy: false,
                units: default_units(),
            },
            refresh: RefreshConfig::default(),
            forecast: ForecastConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| crate::error::ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        if !validation.warnings.is_empty() {
            for warning in &validation.warnings {
                tracing::warn!("Config warning: {}", warning);
            }
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        // Validate proxy URL when explicitly configured
        if let Some(proxy) = &self.provider.proxy_url {
            if proxy.starts_with('/') {
                result.add_warning(
                    "provider.proxy_url",
                    "Proxy path is relative; requests will fail unless a full URL is configured",
                );
            } else {
                self.validate_url(proxy, "provider.proxy_url", &mut result);
            }
        }

        // Missing or placeholder key is a warning, not an error: a proxy may
        // still be configured, and the error surfaces per-request otherwise
        if !self.provider.is_configured() {
            result.add_warning(
                "provider.api_key",
                "Weather API key not configured - set OPENWEATHER_API_KEY or configure a proxy",
            );
        }

        if self.refresh.interval_minutes == 0 {
            result.add_warning(
                "refresh.interval_minutes",
                "Auto-refresh disabled (0 minutes)",
            );
        } else if self.refresh.interval_minutes > 1440 {
            result.add_warning(
                "refresh.interval_minutes",
                "Auto-refresh interval is more than 24 hours",
            );
        }

        if self.forecast.hourly_window_hours == 0 {
            result.add_error(
                "forecast.hourly_window_hours",
                "Hourly window must be greater than 0",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(
                    field_name,
                    format!("Invalid URL: {}", e),
                );
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skycast");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_with_key(key: &str) -> ProviderConfig {
        ProviderConfig {
            api_key: key.to_string(),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn test_empty_key_is_invalid() {
        assert!(!provider_with_key("").has_valid_api_key());
    }

    #[test]
    fn test_placeholder_keys_are_invalid() {
        assert!(!provider_with_key("YOUR_API_KEY").has_valid_api_key());
        assert!(!provider_with_key("replace_me_please").has_valid_api_key());
        assert!(!provider_with_key("change_me").has_valid_api_key());
    }

    #[test]
    fn test_literal_key_is_valid() {
        assert!(provider_with_key("abcdef0123456789").has_valid_api_key());
    }

    #[test]
    fn test_url_key_requires_embedded_appid() {
        assert!(!provider_with_key("https://api.example.com/weather").has_valid_api_key());
        assert!(!provider_with_key("https://api.example.com/weather?appid={API key}")
            .has_valid_api_key());
        assert!(!provider_with_key("https://api.example.com/weather?appid=YOUR_KEY")
            .has_valid_api_key());
        assert!(provider_with_key("https://api.example.com/weather?appid=realkey123")
            .has_valid_api_key());
    }

    #[test]
    fn test_proxy_precedence() {
        let mut provider = provider_with_key("");
        assert!(provider.proxy_base().is_none());

        provider.use_default_proxy = true;
        assert_eq!(provider.proxy_base().as_deref(), Some(DEFAULT_PROXY_PATH));

        provider.proxy_url = Some("https://example.com/api/openweather".to_string());
        assert_eq!(
            provider.proxy_base().as_deref(),
            Some("https://example.com/api/openweather")
        );
    }

    #[test]
    fn test_is_configured_with_proxy_only() {
        let mut provider = provider_with_key("YOUR_API_KEY");
        assert!(!provider.is_configured());
        provider.proxy_url = Some("https://example.com/proxy".to_string());
        assert!(provider.is_configured());
    }

    #[test]
    fn test_relative_proxy_path_is_warning() {
        let mut config = Config::default();
        config.provider.proxy_url = Some(DEFAULT_PROXY_PATH.to_string());
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "provider.proxy_url"));
    }

    #[test]
    fn test_invalid_proxy_scheme() {
        let mut config = Config::default();
        config.provider.proxy_url = Some("ftp://example.com/proxy".to_string());
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_hourly_window_is_error() {
        let mut config = Config::default();
        config.forecast.hourly_window_hours = 0;
        let result = config.validate();
        assert!(!result.is_valid());
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
