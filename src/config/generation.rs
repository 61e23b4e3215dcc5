use serde::Deserialize;
use std::path::Path;

use crate::world::generation::GeneratorOptions;
use crate::world::noise::NoiseBackend;

/// Startup configuration for the generator and the CLI request defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_size")]
    pub size: String,
    #[serde(default = "default_region_count")]
    pub region_count: u32,
    #[serde(default = "default_noise")]
    pub noise: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_theme() -> String {
    "fantasy".to_string()
}
fn default_size() -> String {
    "small".to_string()
}
fn default_region_count() -> u32 {
    7
}
fn default_noise() -> String {
    "coherent".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            theme: default_theme(),
            size: default_size(),
            region_count: default_region_count(),
            noise: default_noise(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl GenerationConfig {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content, path)
    }

    /// Load from `path` when it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, String> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self, String> {
        let config: GenerationConfig =
            toml::from_str(content).map_err(|e| format!("{}: {}", source_path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();

        if !(1..=64).contains(&self.region_count) {
            errors.push(format!(
                "region_count must be 1-64, got {}. Example: region_count = 7",
                self.region_count
            ));
        }

        if NoiseBackend::parse(&self.noise).is_none() {
            errors.push(format!(
                "noise must be \"coherent\" or \"hashed\", got '{}'. Example: noise = \"coherent\"",
                self.noise
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            errors.push(format!(
                "log_level must be one of {:?}, got '{}'. Example: log_level = \"info\"",
                valid_levels, self.log_level
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.log_format.as_str()) {
            errors.push(format!(
                "log_format must be one of {:?}, got '{}'. Example: log_format = \"text\"",
                valid_formats, self.log_format
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }

    /// Generator options for this config. Falls back to hashed noise when
    /// coherent noise is not compiled in.
    pub fn generator_options(&self) -> GeneratorOptions {
        let backend = NoiseBackend::parse(&self.noise).unwrap_or_default();
        GeneratorOptions {
            noise_backend: backend.resolve(),
            region_count: self.region_count,
        }
    }
}
