//! Forecast backend: reads the bundled dataset for the list.

use std::path::Path;

use weatherlist_weather::WeatherJson;

/// Error type for forecast loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForecastError {
    Bundle(String),
    Parse(String),
    InvalidSetting(String),
}

impl std::fmt::Display for ForecastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastError::Bundle(s) => write!(f, "Forecast bundle error: {}", s),
            ForecastError::Parse(s) => write!(f, "Forecast parse error: {}", s),
            ForecastError::InvalidSetting(s) => write!(f, "Forecast setting error: {}", s),
        }
    }
}

impl std::error::Error for ForecastError {}

impl From<weatherlist_weather::WeatherError> for ForecastError {
    fn from(e: weatherlist_weather::WeatherError) -> Self {
        use weatherlist_weather::WeatherError;
        match e {
            WeatherError::Bundle { .. } => ForecastError::Bundle(e.to_string()),
            WeatherError::Parse(s) => ForecastError::Parse(s),
            WeatherError::InvalidSetting(s) => ForecastError::InvalidSetting(s),
        }
    }
}

/// Load the forecast bundle at `path`
pub fn load_forecast(path: &Path) -> Result<WeatherJson, ForecastError> {
    let forecast = weatherlist_weather::load_forecast(path)?;
    tracing::info!(
        "Loaded forecast for {} ({} entries)",
        forecast.city.name,
        forecast.weather_forecast.len()
    );
    Ok(forecast)
}
