//! Temperature display units.
//!
//! Forecast temperatures are stored in Celsius. `TemperatureUnit` decides how
//! they are shown; `UnitSelection` holds the unit currently chosen by the user
//! and notifies subscribers when it changes.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Metric,
    Imperial,
}

impl TemperatureUnit {
    /// Unit suffix shown next to temperatures and on the toggle control
    pub fn label(self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }

    /// Convert a Celsius reading into this unit
    pub fn convert(self, celsius: f64) -> f64 {
        match self {
            Self::Metric => celsius,
            Self::Imperial => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    /// The other unit
    pub fn toggled(self) -> Self {
        match self {
            Self::Metric => Self::Imperial,
            Self::Imperial => Self::Metric,
        }
    }

    /// Converted value with one decimal and the unit label, e.g. `21.5°C`
    pub fn format(self, celsius: f64) -> String {
        format!("{:.1}{}", self.convert(celsius), self.label())
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Process-wide unit selection.
///
/// Changing the unit goes through `set` or `toggle`; subscribers see the change
/// through their `watch::Receiver` and re-render on their own schedule.
#[derive(Debug)]
pub struct UnitSelection {
    tx: watch::Sender<TemperatureUnit>,
}

impl UnitSelection {
    pub fn new(initial: TemperatureUnit) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> TemperatureUnit {
        *self.tx.borrow()
    }

    /// Select `unit`. Returns true and notifies subscribers only if it differs
    /// from the current selection.
    pub fn set(&self, unit: TemperatureUnit) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == unit {
                false
            } else {
                *current = unit;
                true
            }
        });
        if changed {
            tracing::info!("Temperature unit changed to {}", unit);
        }
        changed
    }

    /// Flip to the other unit and return it
    pub fn toggle(&self) -> TemperatureUnit {
        let next = self.current().toggled();
        self.set(next);
        next
    }

    pub fn subscribe(&self) -> watch::Receiver<TemperatureUnit> {
        self.tx.subscribe()
    }
}

impl Default for UnitSelection {
    fn default() -> Self {
        Self::new(TemperatureUnit::default())
    }
}
