use anyhow::Result;
use std::sync::Arc;

use crate::Config;

/// Application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
}

impl App {
    /// Create an application from the user's config file
    pub fn new() -> Result<Self> {
        let (config, _) = Config::load_validated()?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn initialize(&mut self) -> Result<()> {
        tracing::info!(
            "Initializing application (bundle: {}, icons: {}, unit: {:?})",
            self.config.weather.bundle_path.display(),
            self.config.icons.base_url,
            self.config.weather.temperature_unit
        );
        Ok(())
    }

    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }
}
