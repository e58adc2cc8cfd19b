use super::{
    data::DataConfig,
    engine::EngineConfig,
    traits::ConfigSection,
};
use crate::error::AnalyticsError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Environment variables with this prefix override file values, e.g.
/// `EQUITY_ANALYTICS__ENGINE__DECIMATION_CAP=500`.
pub const ENV_PREFIX: &str = "EQUITY_ANALYTICS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub data: DataConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        self.engine.validate().map_err(|e| {
            AnalyticsError::Configuration(format!("[{}] {}", EngineConfig::section_name(), e))
        })?;
        self.data.validate().map_err(|e| {
            AnalyticsError::Configuration(format!("[{}] {}", DataConfig::section_name(), e))
        })?;
        Ok(())
    }

    /// Read a TOML or JSON file (by extension) layered with environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AnalyticsError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AnalyticsError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), AnalyticsError> {
        let config = AppConfig::load(path)?;
        *self.write_lock()? = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), AnalyticsError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| AnalyticsError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| AnalyticsError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        match self.config.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Apply `f` to a copy and keep it only if it still validates.
    pub fn update<F>(&self, f: F) -> Result<(), AnalyticsError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut guard = self.write_lock()?;
        let mut candidate = guard.clone();
        f(&mut candidate);
        candidate.validate()?;
        *guard = candidate;
        Ok(())
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<'_, AppConfig>, AnalyticsError> {
        self.config
            .write()
            .map_err(|_| AnalyticsError::Configuration("Config lock poisoned".to_string()))
    }
}
