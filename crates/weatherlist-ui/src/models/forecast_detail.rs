use weatherlist_weather::{City, ForecastDateFormatter, ForecastEntry, TemperatureUnit};

/// Everything the detail screen needs for one selected forecast entry
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDetail {
    pub entry: ForecastEntry,
    pub city: City,
    pub unit: TemperatureUnit,
}

impl ForecastDetail {
    pub fn temperature(&self) -> String {
        self.unit.format(self.entry.main.temp)
    }

    pub fn feels_like(&self) -> Option<String> {
        self.entry.main.feels_like.map(|t| self.unit.format(t))
    }

    /// `min / max`, when both are known
    pub fn temperature_range(&self) -> Option<String> {
        let min = self.entry.main.temp_min?;
        let max = self.entry.main.temp_max?;
        Some(format!("{} / {}", self.unit.format(min), self.unit.format(max)))
    }

    pub fn humidity(&self) -> Option<String> {
        self.entry.main.humidity.map(|h| format!("{}%", h))
    }

    pub fn pressure(&self) -> Option<String> {
        self.entry.main.pressure.map(|p| format!("{:.0} hPa", p))
    }

    pub fn wind(&self) -> Option<String> {
        self.entry.wind.map(|w| match w.deg {
            Some(deg) => format!("{:.1} m/s, {}°", w.speed, deg),
            None => format!("{:.1} m/s", w.speed),
        })
    }

    pub fn precipitation_chance(&self) -> Option<String> {
        self.entry.pop.map(|p| format!("{:.0}%", p * 100.0))
    }

    pub fn sunrise(&self, formatter: &ForecastDateFormatter) -> Option<String> {
        self.city.sunrise.map(|t| formatter.format(t))
    }

    pub fn sunset(&self, formatter: &ForecastDateFormatter) -> Option<String> {
        self.city.sunset.map(|t| formatter.format(t))
    }

    /// Labelled lines for display, skipping readings the dataset lacks
    pub fn lines(&self, formatter: &ForecastDateFormatter) -> Vec<(&'static str, String)> {
        let mut lines = vec![
            ("City", self.city.name.clone()),
            ("Time", formatter.format(self.entry.dt)),
            (
                "Weather",
                format!("{} ({})", self.entry.weather.main, self.entry.weather.description),
            ),
            ("Temperature", self.temperature()),
        ];

        let optional = [
            ("Feels like", self.feels_like()),
            ("Min / Max", self.temperature_range()),
            ("Humidity", self.humidity()),
            ("Pressure", self.pressure()),
            ("Wind", self.wind()),
            ("Precipitation", self.precipitation_chance()),
            ("Sunrise", self.sunrise(formatter)),
            ("Sunset", self.sunset(formatter)),
        ];
        lines.extend(
            optional
                .into_iter()
                .filter_map(|(label, value)| value.map(|v| (label, v))),
        );

        if let Some(coord) = self.city.coord {
            lines.push(("Location", format!("{:.4}, {:.4}", coord.lat, coord.lon)));
        }

        lines
    }
}
