//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rstreemap/rstreemap.toml`
//! 3. Explicit config file passed on the command line
//! 4. Environment variables: `RSTREEMAP_*` prefix, `__` as section separator

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{Rect, DEFAULT_GROWTH_FRACTION};

/// Size of the area the treemap is drawn into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        // 1024x768 screen minus a 30px status line
        Self {
            width: 1024,
            height: 738,
        }
    }
}

impl ViewportConfig {
    /// Viewport anchored at the origin.
    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

/// Raw viewport for intermediate parsing (None → not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawViewportConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub viewport: RawViewportConfig,
    pub growth_fraction: Option<f64>,
    pub separator: Option<String>,
    pub palette_seed: Option<u64>,
    pub dataset: Option<PathBuf>,
}

/// Unified configuration for rstreemap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Treemap drawing area
    pub viewport: ViewportConfig,
    /// Fraction a leaf grows or shrinks by per step (default: 0.01)
    pub growth_fraction: f64,
    /// Separator between labels in the status line (default: platform path separator)
    pub separator: String,
    /// Seed for the hashed color palette
    pub palette_seed: u64,
    /// Dataset used when a command is given no path
    pub dataset: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            growth_fraction: DEFAULT_GROWTH_FRACTION,
            separator: std::path::MAIN_SEPARATOR.to_string(),
            palette_seed: 0,
            dataset: None,
        }
    }
}

/// Get the XDG config directory for rstreemap.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rstreemap").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rstreemap.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            viewport: ViewportConfig {
                width: overlay.viewport.width.unwrap_or(self.viewport.width),
                height: overlay.viewport.height.unwrap_or(self.viewport.height),
            },
            growth_fraction: overlay.growth_fraction.unwrap_or(self.growth_fraction),
            separator: overlay
                .separator
                .clone()
                .unwrap_or_else(|| self.separator.clone()),
            palette_seed: overlay.palette_seed.unwrap_or(self.palette_seed),
            dataset: overlay.dataset.clone().or_else(|| self.dataset.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given by the user; it must exist
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        current = current.overlay_file(explicit)?;
        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;
        Ok(current)
    }

    /// Apply an explicit config file on top of `self`, skipping the global one.
    pub fn overlay_file(self, path: Option<&Path>) -> Result<Self, ApplicationError> {
        match path {
            None => Ok(self),
            Some(path) => {
                debug!("loading config {}", path.display());
                Ok(self.merge_with(&load_raw_settings(path)?))
            }
        }
    }

    /// Apply RSTREEMAP_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("RSTREEMAP").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get::<u32>("viewport.width") {
            settings.viewport.width = val;
        }
        if let Ok(val) = config.get::<u32>("viewport.height") {
            settings.viewport.height = val;
        }
        if let Ok(val) = config.get::<f64>("growth_fraction") {
            settings.growth_fraction = val;
        }
        if let Ok(val) = config.get_string("separator") {
            settings.separator = val;
        }
        if let Ok(val) = config.get::<u64>("palette_seed") {
            settings.palette_seed = val;
        }
        if let Ok(val) = config.get_string("dataset") {
            settings.dataset = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Expand `~`, `$VAR` and `${VAR}` in the dataset path.
    fn expand_paths(&mut self) {
        if let Some(dataset) = &self.dataset {
            let raw = dataset.to_string_lossy().to_string();
            let expanded = shellexpand::full(&raw)
                .map(|s| s.into_owned())
                .unwrap_or(raw);
            self.dataset = Some(PathBuf::from(expanded));
        }
    }

    /// Reject values no session can work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ApplicationError::Config {
                message: format!(
                    "viewport {}x{} has no area",
                    self.viewport.width, self.viewport.height
                ),
            });
        }
        let fraction = self.growth_fraction;
        if !(fraction.is_finite() && fraction > 0.0 && fraction <= 1.0) {
            return Err(ApplicationError::Config {
                message: format!("growth_fraction {} outside (0, 1]", fraction),
            });
        }
        Ok(())
    }

    /// Render as TOML (for `config show`-style output).
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_validating_then_ok() {
        let settings = Settings::default();

        assert!(settings.validate().is_ok());
        assert_eq!(settings.viewport.rect(), Rect::new(0, 0, 1024, 738));
        assert_eq!(settings.growth_fraction, 0.01);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_kept() {
        let raw: RawSettings = toml::from_str("[viewport]\nwidth = 640\n").unwrap();

        let merged = Settings::default().merge_with(&raw);

        assert_eq!(merged.viewport.width, 640);
        assert_eq!(merged.viewport.height, 738);
        assert_eq!(merged.growth_fraction, 0.01);
    }

    #[test]
    fn given_zero_viewport_when_validating_then_config_error() {
        let mut settings = Settings::default();
        settings.viewport.height = 0;

        assert!(matches!(
            settings.validate(),
            Err(ApplicationError::Config { .. })
        ));
    }
}
