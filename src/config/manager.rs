use super::{
    backtesting::BacktestingConfig,
    evolution::EvolutionConfig,
    search_space::SearchSpaceConfig,
    traits::ConfigSection,
};
use crate::engines::generation::EvolutionConfig as EngineEvolutionConfig;
use crate::error::CrossgaError;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Environment variable prefix; `CROSSGA__EVOLUTION__SEED=7` overrides
/// `evolution.seed`.
pub const ENV_PREFIX: &str = "CROSSGA";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub search_space: SearchSpaceConfig,
    pub backtesting: BacktestingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), CrossgaError> {
        self.evolution.validate()?;
        self.search_space.validate()?;
        self.backtesting.validate()?;
        Ok(())
    }

    /// Layer an optional TOML document under the given environment source.
    pub fn from_sources(toml: Option<&str>, env: Environment) -> Result<Self, CrossgaError> {
        let mut builder = Config::builder();
        if let Some(contents) = toml {
            builder = builder.add_source(File::from_str(contents, FileFormat::Toml));
        }
        let config: AppConfig = builder.add_source(env).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Environment overrides using [`ENV_PREFIX`] and `__` as the section
    /// separator.
    pub fn env_overrides() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
    }

    /// Driver input for this configuration.
    pub fn to_engine_config(&self) -> EngineEvolutionConfig {
        EngineEvolutionConfig {
            population_size: self.evolution.population_size,
            generations: self.evolution.generations,
            bounds: self.search_space.bounds(),
            mutation_rate: self.evolution.mutation_rate,
            initial_capital: self.backtesting.initial_capital,
            seed: self.evolution.seed,
            parallel: self.evolution.parallel,
            cache_moving_averages: self.evolution.cache_moving_averages,
            deadline: self
                .evolution
                .deadline_secs
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok()),
        }
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

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CrossgaError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CrossgaError::Configuration(format!("Failed to read config: {}", e)))?;

        let config = AppConfig::from_sources(Some(&contents), AppConfig::env_overrides())?;
        log::debug!("Loaded configuration: {:?}", config);

        *self.write() = config;
        Ok(())
    }

    /// Defaults plus environment overrides, without a file.
    pub fn load_from_env(&self) -> Result<(), CrossgaError> {
        let config = AppConfig::from_sources(None, AppConfig::env_overrides())?;
        *self.write() = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CrossgaError> {
        let toml_str = toml::to_string_pretty(&self.get())
            .map_err(|e| CrossgaError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| CrossgaError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Apply `f` and keep the result only if it validates.
    pub fn update<F>(&self, f: F) -> Result<(), CrossgaError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        candidate.validate()?;
        *self.write() = candidate;
        Ok(())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, AppConfig> {
        self.config.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
