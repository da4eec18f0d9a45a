pub mod forecast_service;
pub mod icon_service;

pub use forecast_service::{load_forecast, ForecastError};
pub use icon_service::{create_source, request_icon, IconServiceError, IconServiceMessage};
