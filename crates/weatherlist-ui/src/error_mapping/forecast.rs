use crate::services::forecast_service::ForecastError;
use weatherlist_core::{AppError, ConfigError, WeatherError};

impl From<ForecastError> for AppError {
    fn from(e: ForecastError) -> Self {
        match e {
            ForecastError::Bundle(s) => AppError::Weather(WeatherError::BundleUnavailable(s)),
            ForecastError::Parse(s) => AppError::Weather(WeatherError::InvalidData(s)),
            ForecastError::InvalidSetting(s) => AppError::Config(ConfigError::Invalid(s)),
        }
    }
}
