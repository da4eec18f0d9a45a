use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;
use weatherlist_weather::format::{DEFAULT_DATE_FORMAT, DEFAULT_UTC_OFFSET_MINUTES};
use weatherlist_weather::provider::DEFAULT_TIMEOUT_SECS;
use weatherlist_weather::{TemperatureUnit, DEFAULT_ICON_BASE_URL};

use crate::error::ConfigError;

/// Prefix for environment overrides, e.g. `WEATHERLIST__ICONS__BASE_URL`
const ENV_PREFIX: &str = "WEATHERLIST";

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

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
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
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Forecast dataset and display settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Icon host settings
    #[serde(default)]
    pub icons: IconConfig,

    /// List presentation
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Bundled forecast dataset
    #[serde(default = "default_bundle_path")]
    pub bundle_path: PathBuf,

    /// Unit selected at startup
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,

    /// chrono format string for row dates
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Offset from UTC used when formatting dates
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

fn default_bundle_path() -> PathBuf {
    PathBuf::from("assets").join("weather.json")
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_utc_offset_minutes() -> i32 {
    DEFAULT_UTC_OFFSET_MINUTES
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            bundle_path: default_bundle_path(),
            temperature_unit: TemperatureUnit::default(),
            date_format: default_date_format(),
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconConfig {
    /// Icon host; icons are requested from `{base_url}/img/wn/{icon}@2x.png`
    #[serde(default = "default_icon_base_url")]
    pub base_url: String,

    /// Per-request timeout
    #[serde(default = "default_icon_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_icon_base_url() -> String {
    DEFAULT_ICON_BASE_URL.to_string()
}

fn default_icon_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            base_url: default_icon_base_url(),
            timeout_secs: default_icon_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Number of reusable list cells
    #[serde(default = "default_visible_rows")]
    pub visible_rows: usize,
}

fn default_visible_rows() -> usize {
    8
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            visible_rows: default_visible_rows(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("weatherlist")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            weather: WeatherConfig::default(),
            icons: IconConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the user config directory, creating a default
    /// file if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, layering `WEATHERLIST__*` environment
    /// variables on top
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::load_layered(path, env_source())
    }

    fn load_layered(path: &Path, env: ::config::Environment) -> Result<Self> {
        if !path.exists() {
            Self::default().save_to(path)?;
            tracing::info!("Created default config at {}", path.display());
        }

        let settings = ::config::Config::builder()
            .add_source(
                ::config::File::from(path.to_path_buf()).format(::config::FileFormat::Toml),
            )
            .add_source(env)
            .build()
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

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
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.icons.base_url, "icons.base_url", &mut result);

        if self.icons.timeout_secs == 0 {
            result.add_error("icons.timeout_secs", "Icon timeout must be greater than 0");
        } else if self.icons.timeout_secs > 120 {
            result.add_warning("icons.timeout_secs", "Icon timeout is unusually long (>120s)");
        }

        if self.ui.visible_rows == 0 {
            result.add_error("ui.visible_rows", "At least one list cell is required");
        } else if self.ui.visible_rows > 200 {
            result.add_warning("ui.visible_rows", "Cell pool is unusually large (>200)");
        }

        if self.weather.date_format.trim().is_empty() {
            result.add_error("weather.date_format", "Date format must not be empty");
        } else if chrono::format::StrftimeItems::new(&self.weather.date_format)
            .any(|item| matches!(item, chrono::format::Item::Error))
        {
            result.add_error(
                "weather.date_format",
                format!("Invalid date format: {}", self.weather.date_format),
            );
        }

        // chrono accepts offsets strictly within one day
        if self.weather.utc_offset_minutes.abs() >= 24 * 60 {
            result.add_error(
                "weather.utc_offset_minutes",
                "UTC offset must be within +/-24 hours",
            );
        }

        if !self.weather.bundle_path.exists() {
            result.add_warning(
                "weather.bundle_path",
                format!(
                    "Forecast bundle not found: {}",
                    self.weather.bundle_path.display()
                ),
            );
        } else if !self.weather.bundle_path.is_file() {
            result.add_error(
                "weather.bundle_path",
                format!(
                    "Forecast bundle is not a file: {}",
                    self.weather.bundle_path.display()
                ),
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

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound("user config directory".to_string()))?
            .join("weatherlist");

        Ok(config_dir.join("config.toml"))
    }
}

fn env_source() -> ::config::Environment {
    ::config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        // Default config should be valid (only warnings, no errors)
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_invalid_icon_url() {
        let mut config = Config::default();
        config.icons.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "icons.base_url"));
    }

    #[test]
    fn test_invalid_icon_url_scheme() {
        let mut config = Config::default();
        config.icons.base_url = "ftp://openweathermap.org".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_timeout_and_cells() {
        let mut config = Config::default();
        config.icons.timeout_secs = 0;
        config.ui.visible_rows = 0;
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "icons.timeout_secs"));
        assert!(result.errors.iter().any(|e| e.field == "ui.visible_rows"));
    }

    #[test]
    fn test_bad_date_settings() {
        let mut config = Config::default();
        config.weather.date_format = "%Y-%Q".to_string();
        config.weather.utc_offset_minutes = 25 * 60;
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "weather.date_format"));
        assert!(result.errors.iter().any(|e| e.field == "weather.utc_offset_minutes"));
    }

    #[test]
    fn test_missing_bundle_is_warning() {
        let mut config = Config::default();
        config.weather.bundle_path = PathBuf::from("/nonexistent/weather.json");
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.bundle_path"));
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.ui.visible_rows, 8);
        assert_eq!(config.icons.base_url, DEFAULT_ICON_BASE_URL);
    }

    #[test]
    fn test_load_from_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[weather]\ntemperature_unit = \"imperial\"\n\n[ui]\nvisible_rows = 3\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.weather.temperature_unit, TemperatureUnit::Imperial);
        assert_eq!(config.ui.visible_rows, 3);
        assert_eq!(config.weather.utc_offset_minutes, DEFAULT_UTC_OFFSET_MINUTES);
        assert_eq!(config.icons.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_env_overrides_apply_on_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let env = || {
            env_source().source(Some(
                [(
                    "WEATHERLIST__ICONS__BASE_URL".to_string(),
                    "http://localhost:9000".to_string(),
                )]
                .into_iter()
                .collect(),
            ))
        };

        let first = Config::load_layered(&path, env()).unwrap();
        assert!(path.exists());
        assert_eq!(first.icons.base_url, "http://localhost:9000");

        let second = Config::load_layered(&path, env()).unwrap();
        assert_eq!(second.icons.base_url, "http://localhost:9000");

        // The file itself keeps the defaults
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains(DEFAULT_ICON_BASE_URL));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui\nvisible_rows = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.icons.base_url = "http://localhost:9000".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.icons.base_url, "http://localhost:9000");
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
