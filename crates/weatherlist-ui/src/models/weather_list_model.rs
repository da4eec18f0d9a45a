//! Headless forecast list: reusable cells, icon loading and unit display.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use weatherlist_core::{AppError, Config};
use weatherlist_weather::{
    icon_url, ForecastDateFormatter, ForecastEntry, IconCache, IconImage, IconSource, RowSlots,
    TemperatureUnit, UnitSelection, WeatherJson,
};

use crate::models::forecast_detail::ForecastDetail;
use crate::services::forecast_service::{self, ForecastError};
use crate::services::icon_service::{self, IconServiceMessage};

/// Shared collaborators of a list model
#[derive(Debug)]
pub struct WeatherListServices<S: IconSource> {
    pub cache: Arc<IconCache>,
    pub source: Arc<S>,
    pub units: Arc<UnitSelection>,
    pub runtime: Handle,
    pub bundle_path: PathBuf,
    pub icon_base_url: String,
    pub formatter: ForecastDateFormatter,
    pub visible_rows: usize,
}

impl<S: IconSource> WeatherListServices<S> {
    pub fn from_config(config: &Config, source: S, runtime: Handle) -> Result<Self, ForecastError> {
        let formatter = ForecastDateFormatter::new(
            config.weather.date_format.clone(),
            config.weather.utc_offset_minutes,
        )?;

        Ok(Self {
            cache: Arc::new(IconCache::new()),
            source: Arc::new(source),
            units: Arc::new(UnitSelection::new(config.weather.temperature_unit)),
            runtime,
            bundle_path: config.weather.bundle_path.clone(),
            icon_base_url: config.icons.base_url.clone(),
            formatter,
            visible_rows: config.ui.visible_rows,
        })
    }
}

/// What one list cell currently shows
#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    /// Forecast index this cell displays
    pub row: usize,
    pub date: String,
    pub weather_main: String,
    pub description: String,
    pub temperature: String,
    pub icon_url: String,
    /// `None` until the icon is available
    pub icon: Option<Arc<IconImage>>,
}

/// Headless forecast list.
///
/// Cells are reusable slots: binding a cell to a forecast row supersedes
/// whatever it showed before, including an icon download still in flight.
pub struct WeatherListModel<S: IconSource> {
    services: WeatherListServices<S>,
    forecast: Option<WeatherJson>,
    title: String,
    error_message: Option<&'static str>,
    cells: Vec<Option<CellView>>,
    slots: Arc<RowSlots>,
    tx: Sender<IconServiceMessage>,
    rx: Receiver<IconServiceMessage>,
    unit_rx: watch::Receiver<TemperatureUnit>,
}

impl<S: IconSource> WeatherListModel<S> {
    pub fn new(services: WeatherListServices<S>) -> Self {
        let (tx, rx) = mpsc::channel();
        let unit_rx = services.units.subscribe();
        let cells = (0..services.visible_rows).map(|_| None).collect();

        Self {
            services,
            forecast: None,
            title: String::new(),
            error_message: None,
            cells,
            slots: Arc::new(RowSlots::new()),
            tx,
            rx,
            unit_rx,
        }
    }

    /// Reload the forecast bundle and redraw every bound cell.
    /// On failure the list is emptied and `error_message` is set.
    pub fn refresh(&mut self) -> usize {
        match forecast_service::load_forecast(&self.services.bundle_path) {
            Ok(forecast) => {
                self.title = forecast.city.name.clone();
                self.forecast = Some(forecast);
                self.error_message = None;
            }
            Err(e) => {
                tracing::error!("Failed to load forecast: {}", e);
                let app_err: AppError = e.into();
                self.error_message = Some(app_err.user_message());
                self.forecast = None;
                self.title.clear();
            }
        }

        for cell in 0..self.cells.len() {
            if let Some(row) = self.cells[cell].as_ref().map(|view| view.row) {
                self.bind_cell(cell, row);
            }
        }

        self.row_count()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error_message
    }

    pub fn row_count(&self) -> usize {
        self.forecast
            .as_ref()
            .map(|f| f.weather_forecast.len())
            .unwrap_or(0)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.services.units.current()
    }

    /// Text for the unit toggle control
    pub fn unit_label(&self) -> &'static str {
        self.unit().label()
    }

    pub fn formatter(&self) -> &ForecastDateFormatter {
        &self.services.formatter
    }

    pub fn icon_cache(&self) -> &IconCache {
        &self.services.cache
    }

    /// Show forecast `row` in `cell`.
    ///
    /// The icon comes from the cache when present; otherwise a download is
    /// started and the cell shows no icon until `process_messages` applies it.
    /// Binding to a row that doesn't exist clears the cell.
    pub fn bind_cell(&mut self, cell: usize, row: usize) -> Option<&CellView> {
        if cell >= self.cells.len() {
            tracing::warn!("Cell {} out of range ({} cells)", cell, self.cells.len());
            return None;
        }

        let unit = self.services.units.current();
        let mut view = match self
            .forecast
            .as_ref()
            .and_then(|f| f.weather_forecast.get(row))
        {
            Some(entry) => render_cell(
                row,
                entry,
                unit,
                &self.services.formatter,
                &self.services.icon_base_url,
            ),
            None => {
                self.cells[cell] = None;
                self.slots.release(cell);
                return None;
            }
        };

        let token = self.slots.bind(cell, view.icon_url.clone());
        match self.services.cache.lookup(&view.icon_url) {
            Some(image) => view.icon = Some(image),
            None => icon_service::request_icon(
                &self.tx,
                &self.services.runtime,
                self.services.cache.clone(),
                self.services.source.clone(),
                self.slots.clone(),
                token,
            ),
        }

        self.cells[cell] = Some(view);
        self.cells[cell].as_ref()
    }

    pub fn cell(&self, cell: usize) -> Option<&CellView> {
        self.cells.get(cell).and_then(Option::as_ref)
    }

    /// Cells that currently show a row, as `(cell, view)`
    pub fn bound_cells(&self) -> impl Iterator<Item = (usize, &CellView)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, view)| view.as_ref().map(|v| (i, v)))
    }

    /// Bound cells still waiting for their icon
    pub fn pending_icons(&self) -> usize {
        self.bound_cells().filter(|(_, v)| v.icon.is_none()).count()
    }

    /// Flip the temperature unit. Cells redraw on the next `process_messages`.
    pub fn toggle_unit(&self) -> TemperatureUnit {
        self.services.units.toggle()
    }

    pub fn set_unit(&self, unit: TemperatureUnit) -> bool {
        self.services.units.set(unit)
    }

    /// Apply finished icon downloads and redraw after a unit change.
    /// Returns the number of cell updates.
    pub fn process_messages(&mut self) -> usize {
        let mut updates = 0;
        while let Ok(msg) = self.rx.try_recv() {
            if self.apply(msg) {
                updates += 1;
            }
        }

        if self.unit_rx.has_changed().unwrap_or(false) {
            let unit = *self.unit_rx.borrow_and_update();
            updates += self.redraw_temperatures(unit);
        }

        updates
    }

    /// Block up to `timeout` for the next icon, then process everything queued
    pub fn wait_for_messages(&mut self, timeout: Duration) -> usize {
        let first = match self.rx.recv_timeout(timeout) {
            Ok(msg) => usize::from(self.apply(msg)),
            Err(_) => 0,
        };
        first + self.process_messages()
    }

    /// Payload for the detail screen of forecast `row`
    pub fn select_row(&self, row: usize) -> Option<ForecastDetail> {
        let forecast = self.forecast.as_ref()?;
        let entry = forecast.weather_forecast.get(row)?;
        Some(ForecastDetail {
            entry: entry.clone(),
            city: forecast.city.clone(),
            unit: self.unit(),
        })
    }

    fn apply(&mut self, msg: IconServiceMessage) -> bool {
        match msg {
            IconServiceMessage::IconReady { token, image } => {
                // The cell may have been rebound after the download sent this
                if !self.slots.is_current(&token) {
                    tracing::trace!("Dropping icon for recycled cell {}", token.row);
                    return false;
                }
                match self.cells.get_mut(token.row).and_then(Option::as_mut) {
                    Some(view) if view.icon_url == token.url => {
                        view.icon = Some(image);
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    fn redraw_temperatures(&mut self, unit: TemperatureUnit) -> usize {
        let Some(forecast) = self.forecast.as_ref() else {
            return 0;
        };

        let mut updates = 0;
        for view in self.cells.iter_mut().flatten() {
            if let Some(entry) = forecast.weather_forecast.get(view.row) {
                view.temperature = unit.format(entry.main.temp);
                updates += 1;
            }
        }
        updates
    }
}

fn render_cell(
    row: usize,
    entry: &ForecastEntry,
    unit: TemperatureUnit,
    formatter: &ForecastDateFormatter,
    icon_base_url: &str,
) -> CellView {
    CellView {
        row,
        date: formatter.format(entry.dt),
        weather_main: entry.weather.main.clone(),
        description: entry.weather.description.clone(),
        temperature: unit.format(entry.main.temp),
        icon_url: icon_url(icon_base_url, &entry.weather.icon),
        icon: None,
    }
}
