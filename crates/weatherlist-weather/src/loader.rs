//! Loading the bundled forecast dataset.

use std::path::Path;

use crate::types::{WeatherError, WeatherJson};

/// Parse a forecast document
pub fn parse_forecast(json: &str) -> Result<WeatherJson, WeatherError> {
    serde_json::from_str(json).map_err(|e| WeatherError::Parse(e.to_string()))
}

/// Read and parse the forecast bundle at `path`
pub fn load_forecast(path: &Path) -> Result<WeatherJson, WeatherError> {
    let contents = std::fs::read_to_string(path).map_err(|source| WeatherError::Bundle {
        path: path.display().to_string(),
        source,
    })?;

    let forecast = parse_forecast(&contents)?;
    tracing::debug!(
        "Loaded {} forecast entries for {} from {}",
        forecast.weather_forecast.len(),
        forecast.city.name,
        path.display()
    );
    Ok(forecast)
}
