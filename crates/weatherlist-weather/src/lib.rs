//! Forecast data and icon handling for WeatherList
//!
//! Loads the bundled forecast dataset, converts temperatures for display and
//! keeps an in-memory cache of downloaded forecast icons.

pub mod types;
pub mod format;
pub mod icon;
pub mod icon_cache;
pub mod loader;
pub mod provider;
pub mod row;
pub mod unit;

pub use types::*;
pub use format::ForecastDateFormatter;
pub use icon::{icon_url, IconImage, DEFAULT_ICON_BASE_URL};
pub use icon_cache::{IconCache, IconOutcome};
pub use loader::{load_forecast, parse_forecast};
pub use provider::{HttpIconSource, IconSource};
pub use row::{RowSlots, RowToken};
pub use unit::{TemperatureUnit, UnitSelection};
