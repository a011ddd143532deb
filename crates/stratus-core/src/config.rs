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

    /// Weather API settings
    pub api: ApiConfig,

    /// Local cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Location acquisition settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Display/presentation settings
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the current-weather endpoint
    pub base_url: String,

    /// API credential (optional, can be set via OPENWEATHER_API_KEY)
    pub api_key: Option<String>,

    /// Unit system sent with every request ("metric", "imperial", "standard")
    #[serde(default = "default_units")]
    pub units: String,

    /// HTTP client timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            api_key: std::env::var("OPENWEATHER_API_KEY").ok(),
            units: default_units(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Namespace for the local key-value store (becomes the database file name)
    #[serde(default = "default_cache_namespace")]
    pub namespace: String,

    /// Key the serialized weather payload is stored under
    #[serde(default = "default_cache_key")]
    pub key: String,
}

fn default_cache_namespace() -> String {
    "weather".to_string()
}

fn default_cache_key() -> String {
    "weatherResponseData".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: default_cache_namespace(),
            key: default_cache_key(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Seconds to wait for a location fix before giving up
    #[serde(default = "default_fix_timeout_secs")]
    pub fix_timeout_secs: u64,

    /// Fixed coordinate used when no platform positioning service exists
    #[serde(default)]
    pub fallback: Option<FallbackLocation>,
}

fn default_fix_timeout_secs() -> u64 {
    30
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            fix_timeout_secs: default_fix_timeout_secs(),
            fallback: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FallbackLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Two-letter region code driving the temperature unit symbol.
    /// When unset, detected from the process locale.
    #[serde(default)]
    pub region: Option<String>,
}

impl DisplayConfig {
    /// Region to present for: configured value, else the locale's territory,
    /// else empty (which selects Celsius downstream).
    pub fn effective_region(&self) -> String {
        if let Some(region) = &self.region {
            return region.clone();
        }
        std::env::var("LC_ALL")
            .or_else(|_| std::env::var("LANG"))
            .ok()
            .and_then(|locale| region_from_locale(&locale))
            .unwrap_or_default()
    }
}

/// Extract the territory from a POSIX locale string ("en_US.UTF-8" -> "US").
fn region_from_locale(locale: &str) -> Option<String> {
    let tag = locale.split('.').next()?;
    let region = tag.split(['_', '-']).nth(1)?;
    if region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(region.to_ascii_uppercase())
    } else {
        None
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stratus");

        Self {
            config_dir,
            api: ApiConfig::default(),
            cache: CacheConfig::default(),
            location: LocationConfig::default(),
            display: DisplayConfig::default(),
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
            .context("Failed to parse config file")?;

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

        self.validate_url(&self.api.base_url, "api.base_url", &mut result);

        if self.api_key().is_none() {
            result.add_warning(
                "api.api_key",
                "No API key configured - weather requests will be rejected",
            );
        }

        if self.api.http_timeout_secs == 0 {
            result.add_error("api.http_timeout_secs", "HTTP timeout must be greater than 0");
        }

        match self.api.units.as_str() {
            "metric" | "imperial" | "standard" => {}
            other => {
                result.add_warning(
                    "api.units",
                    format!("Unrecognized unit system: {}", other),
                );
            }
        }

        if self.cache.namespace.is_empty() {
            result.add_error("cache.namespace", "Cache namespace must not be empty");
        }

        if self.cache.key.is_empty() {
            result.add_error("cache.key", "Cache key must not be empty");
        }

        if self.location.fix_timeout_secs == 0 {
            result.add_warning(
                "location.fix_timeout_secs",
                "Location fix timeout disabled (0 seconds) - acquisition may hang",
            );
        }

        if let Some(fallback) = &self.location.fallback {
            if !(-90.0..=90.0).contains(&fallback.latitude) {
                result.add_error("location.fallback.latitude", "Latitude must be in [-90, 90]");
            }
            if !(-180.0..=180.0).contains(&fallback.longitude) {
                result.add_error(
                    "location.fallback.longitude",
                    "Longitude must be in [-180, 180]",
                );
            }
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
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Effective API credential: config value, falling back to the environment.
    pub fn api_key(&self) -> Option<String> {
        self.api
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENWEATHER_API_KEY").ok())
            .filter(|key| !key.is_empty())
    }

    /// Path of the cache database derived from the configured namespace.
    pub fn cache_db_path(&self) -> PathBuf {
        self.config_dir.join(format!("{}.db", self.cache.namespace))
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
            .join("stratus");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_default_config_has_no_errors() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        config.api.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "api.base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.api.base_url = "ftp://api.example.com/weather".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_empty_cache_key_is_error() {
        let mut config = Config::default();
        config.cache.key = String::new();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "cache.key"));
    }

    #[test]
    fn test_zero_http_timeout_is_error() {
        let mut config = Config::default();
        config.api.http_timeout_secs = 0;
        let result = config.validate();
        assert!(!result.is_valid());
    }

    #[test]
    fn test_out_of_range_fallback_coordinate() {
        let mut config = Config::default();
        config.location.fallback = Some(FallbackLocation {
            latitude: 123.0,
            longitude: 0.0,
        });
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "location.fallback.latitude"));
    }

    #[test]
    fn test_unknown_units_is_warning() {
        let mut config = Config::default();
        config.api.units = "kelvinish".to_string();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "api.units"));
    }

    #[test]
    fn test_region_from_locale() {
        assert_eq!(region_from_locale("en_US.UTF-8"), Some("US".to_string()));
        assert_eq!(region_from_locale("fr_FR"), Some("FR".to_string()));
        assert_eq!(region_from_locale("en-GB"), Some("GB".to_string()));
        assert_eq!(region_from_locale("C"), None);
        assert_eq!(region_from_locale("POSIX"), None);
    }

    #[test]
    fn test_configured_region_wins() {
        let display = DisplayConfig {
            region: Some("MM".to_string()),
        };
        assert_eq!(display.effective_region(), "MM");
    }

    #[test]
    fn test_cache_db_path_uses_namespace() {
        let config = Config::default();
        assert!(config.cache_db_path().ends_with("weather.db"));
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
