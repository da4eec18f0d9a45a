use std::time::{Duration, Instant};

use anyhow::Result;
use weatherlist_ui::WeatherListModel;
use weatherlist_weather::IconSource;

const ICON_WAIT: Duration = Duration::from_secs(5);

fn main() -> Result<()> {
    // Initialize core
    weatherlist_core::init()?;

    let mut app = weatherlist_core::App::new()?;
    app.initialize()?;

    let services = weatherlist_ui::bridge::initialize_list_services(app.config())?;
    let mut model = WeatherListModel::new(services);

    let rows = model.refresh();
    if let Some(message) = model.error_message() {
        println!("{}", message);
    }

    for cell in 0..rows.min(model.cell_count()) {
        model.bind_cell(cell, cell);
    }

    let deadline = Instant::now() + ICON_WAIT;
    while model.pending_icons() > 0 {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            tracing::warn!("{} icons still loading; showing without them", model.pending_icons());
            break;
        }
        model.wait_for_messages(remaining);
    }

    print_list(&model);

    model.toggle_unit();
    model.process_messages();
    print_list(&model);

    if let Some(detail) = model.select_row(0) {
        println!("\nDetail");
        for (label, value) in detail.lines(model.formatter()) {
            println!("  {:<14}{}", label, value);
        }
    }

    app.shutdown()?;

    Ok(())
}

fn print_list<S: IconSource>(model: &WeatherListModel<S>) {
    println!("\n{} [{}]", model.title(), model.unit_label());
    for (_, cell) in model.bound_cells() {
        let icon = cell
            .icon
            .as_ref()
            .map(|i| format!("{}x{}", i.width, i.height))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {}  {:<8} {:<20} {:>8}  icon {}",
            cell.date, cell.weather_main, cell.description, cell.temperature, icon
        );
    }
}
