use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use weatherlist_core::{AppError, Config};
use weatherlist_weather::HttpIconSource;

use crate::models::weather_list_model::WeatherListServices;
use crate::services::icon_service;

// Static tokio runtime that lives for the duration of the application
static RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();

/// Initialize the tokio runtime (call once at application startup)
pub fn get_or_init_runtime() -> Result<tokio::runtime::Handle> {
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime.handle().clone());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("weatherlist-tokio")
        .build()
        .context("Failed to create tokio runtime")?;

    // Another thread may have won the race; its runtime is kept and ours dropped
    let _ = RUNTIME.set(runtime);
    RUNTIME
        .get()
        .map(|r| r.handle().clone())
        .context("Tokio runtime unavailable")
}

/// Build the list services from config: runtime, HTTP icon source, cache and
/// unit selection
pub fn initialize_list_services(config: &Config) -> Result<WeatherListServices<HttpIconSource>> {
    let runtime = get_or_init_runtime()?;

    let source = icon_service::create_source(Duration::from_secs(config.icons.timeout_secs))
        .map_err(|e| {
            let app_err = AppError::from(e);
            tracing::error!("{} ({})", app_err, app_err.user_message());
            anyhow::Error::new(app_err)
        })?;

    let services = WeatherListServices::from_config(config, source, runtime).map_err(|e| {
        let app_err = AppError::from(e);
        tracing::error!("{} ({})", app_err, app_err.user_message());
        anyhow::Error::new(app_err)
    })?;

    tracing::info!(
        "List services initialized ({} cells, icons from {})",
        services.visible_rows,
        services.icon_base_url
    );
    Ok(services)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_is_created_once() {
        let first = get_or_init_runtime().unwrap();
        let second = get_or_init_runtime().unwrap();
        let answer = first.block_on(async { second.spawn(async { 42 }).await });
        assert_eq!(answer.unwrap(), 42);
        assert!(RUNTIME.get().is_some());
    }

    #[test]
    fn invalid_offset_fails_initialization() {
        let mut config = Config::default();
        config.weather.utc_offset_minutes = 48 * 60;
        assert!(initialize_list_services(&config).is_err());
    }

    #[test]
    fn invalid_date_format_fails_initialization() {
        let mut config = Config::default();
        config.weather.date_format = "%Y-%Q".to_string();
        let err = initialize_list_services(&config).unwrap_err();
        assert!(err.to_string().contains("%Y-%Q"));
    }

    #[test]
    fn default_config_initializes() {
        let services = initialize_list_services(&Config::default()).unwrap();
        assert_eq!(services.visible_rows, 8);
        assert!(services.cache.is_empty());
    }
}
