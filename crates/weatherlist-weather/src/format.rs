//! Row date formatting in a fixed UTC offset.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::types::WeatherError;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Korea Standard Time, UTC+09:00
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 9 * 60;

/// Formats forecast timestamps for list rows
#[derive(Debug, Clone)]
pub struct ForecastDateFormatter {
    pattern: String,
    offset: FixedOffset,
}

impl ForecastDateFormatter {
    pub fn new(pattern: impl Into<String>, utc_offset_minutes: i32) -> Result<Self, WeatherError> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(WeatherError::InvalidSetting(format!(
                "Invalid date format: {}",
                pattern
            )));
        }

        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                WeatherError::InvalidSetting(format!(
                    "UTC offset out of range: {} minutes",
                    utc_offset_minutes
                ))
            })?;

        Ok(Self { pattern, offset })
    }

    /// Format a Unix timestamp (seconds). Out-of-range timestamps render empty.
    pub fn format(&self, timestamp: i64) -> String {
        DateTime::<Utc>::from_timestamp(timestamp, 0)
            .map(|t| t.with_timezone(&self.offset).format(&self.pattern).to_string())
            .unwrap_or_default()
    }
}

impl Default for ForecastDateFormatter {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_DATE_FORMAT.to_string(),
            offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60).unwrap_or(Utc.fix()),
        }
    }
}
