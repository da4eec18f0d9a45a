//! Headless forecast list for WeatherList
//!
//! `WeatherListModel` owns a fixed pool of reusable cells, renders forecast
//! entries into them and receives icon downloads back on the owning thread.

pub mod bridge;
mod error_mapping;
pub mod models;
pub mod services;

pub use models::forecast_detail::ForecastDetail;
pub use models::weather_list_model::{CellView, WeatherListModel, WeatherListServices};
