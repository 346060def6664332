use crate::error::ConfigError;
use crate::translate::google::DEFAULT_ENDPOINT;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub translation: TranslationConfig,
    pub pipeline: PipelineConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    /// Skip translation and score the text as typed.
    None,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub provider: Provider,
    pub endpoint: String,
    pub target_language: String,
    /// Unset means requests may wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Google,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            target_language: "en".to_string(),
            timeout_secs: None,
        }
    }
}

impl TranslationConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub workers: usize,
    pub shutdown_grace_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            shutdown_grace_ms: 500,
        }
    }
}

impl PipelineConfig {
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
    pub help_icon: Option<PathBuf>,
    /// Icon edge in source pixels; two pixels stack into one terminal cell.
    pub icon_size: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            help_icon: None,
            icon_size: 8,
        }
    }
}

impl UiConfig {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sentiview").join("config.toml"))
    }

    /// Load and validate a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;

        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.workers == 0 {
            return Err(ConfigError::Invalid(
                "pipeline.workers must be at least 1".to_string(),
            ));
        }
        if self.ui.tick_rate_ms == 0 {
            return Err(ConfigError::Invalid(
                "ui.tick_rate_ms must be at least 1".to_string(),
            ));
        }
        if !(2..=64).contains(&self.ui.icon_size) {
            return Err(ConfigError::Invalid(
                "ui.icon_size must be between 2 and 64".to_string(),
            ));
        }
        if self.translation.provider == Provider::Google {
            if self.translation.endpoint.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "translation.endpoint must not be empty".to_string(),
                ));
            }
            if self.translation.target_language.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "translation.target_language must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
