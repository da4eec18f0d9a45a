use serde::{Deserialize, Deserializer, Serialize};

/// Parsed forecast bundle: one city and its ordered forecast entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherJson {
    pub city: City,
    #[serde(rename = "list", alias = "weather_forecast")]
    pub weather_forecast: Vec<ForecastEntry>,
}

/// City the forecast belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub coord: Option<Coordinate>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub population: Option<u64>,
    /// Shift in seconds from UTC
    #[serde(default)]
    pub timezone: Option<i32>,
    #[serde(default)]
    pub sunrise: Option<i64>,
    #[serde(default)]
    pub sunset: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// One timestamped forecast reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Unix timestamp (seconds)
    pub dt: i64,
    pub main: MainInfo,
    #[serde(deserialize_with = "first_condition")]
    pub weather: WeatherInfo,
    #[serde(default)]
    pub clouds: Option<Clouds>,
    #[serde(default)]
    pub wind: Option<Wind>,
    #[serde(default)]
    pub visibility: Option<u32>,
    /// Probability of precipitation, 0.0..=1.0
    #[serde(default)]
    pub pop: Option<f64>,
    #[serde(default)]
    pub dt_txt: Option<String>,
}

/// Temperature and atmosphere readings. Temperatures are Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainInfo {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub temp_max: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub sea_level: Option<f64>,
    #[serde(default)]
    pub grnd_level: Option<f64>,
    #[serde(default)]
    pub humidity: Option<u8>,
    #[serde(default)]
    pub temp_kf: Option<f64>,
}

/// Weather condition text and icon identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInfo {
    #[serde(default)]
    pub id: Option<i32>,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    pub all: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: Option<u16>,
    #[serde(default)]
    pub gust: Option<f64>,
}

/// The dataset ships `weather` as an array of conditions; only the first is shown.
fn first_condition<'de, D>(deserializer: D) -> Result<WeatherInfo, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(WeatherInfo),
        Many(Vec<WeatherInfo>),
    }

    match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(info) => Ok(info),
        OneOrMany::Many(list) => list.into_iter().next().ok_or_else(|| {
            serde::de::Error::invalid_length(0, &"at least one weather condition")
        }),
    }
}

/// Forecast bundle errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Failed to read forecast bundle {path}: {source}")]
    Bundle {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

/// Icon fetch errors. Never surfaced to the list; a failed icon is simply absent.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("Invalid icon URL: {0}")]
    InvalidUrl(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Icon request returned status {0}")]
    Status(u16),
    #[error("Icon decode error: {0}")]
    Decode(#[from] image::ImageError),
}
