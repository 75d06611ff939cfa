//! Configuration management for the virtual gamepad overlay
//!
//! Handles loading and saving of the YAML configuration file. Every field
//! has a default, so an empty file (or no file at all) is a valid setup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::layout::DEFAULT_STORAGE_KEY;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OverlayConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub visuals: VisualConfig,
    #[serde(default)]
    pub joystick: JoystickConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
}

/// Layout persistence configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LayoutConfig {
    /// Key the whole layout blob is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_layout_backend")]
    pub backend: LayoutBackend,
    /// Directory (file backend) or database path (sled backend)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Layout store backend
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayoutBackend {
    Memory,
    File,
    Sled,
}

/// Control feedback
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VisualConfig {
    #[serde(default = "default_idle_opacity")]
    pub idle_opacity: f32,
    #[serde(default = "default_active_opacity")]
    pub active_opacity: f32,
}

/// Joystick gesture settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JoystickConfig {
    /// Knob travel diameter in pixels
    #[serde(default = "default_knob_size")]
    pub knob_size: f32,
    /// Radial deadzone in [0, 1), 0 disables it
    #[serde(default)]
    pub deadzone: f32,
}

/// Headless surface viewport used by the CLI
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SurfaceConfig {
    #[serde(default = "default_surface_width")]
    pub width: f32,
    #[serde(default = "default_surface_height")]
    pub height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            backend: default_layout_backend(),
            path: None,
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            idle_opacity: default_idle_opacity(),
            active_opacity: default_active_opacity(),
        }
    }
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            knob_size: default_knob_size(),
            deadzone: 0.0,
        }
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: default_surface_width(),
            height: default_surface_height(),
        }
    }
}

impl OverlayConfig {
    /// Load configuration from a YAML file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: OverlayConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load the file if it exists, defaults otherwise
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if fs::try_exists(path).await.unwrap_or(false) {
            Self::load(path).await
        } else {
            info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.layout.storage_key.trim().is_empty() {
            anyhow::bail!("layout.storage_key must not be empty");
        }
        if !(0.0..1.0).contains(&self.joystick.deadzone) {
            anyhow::bail!(
                "joystick.deadzone must be in [0, 1), got {}",
                self.joystick.deadzone
            );
        }
        if self.joystick.knob_size <= 0.0 {
            anyhow::bail!("joystick.knob_size must be positive");
        }
        for (name, value) in [
            ("idle_opacity", self.visuals.idle_opacity),
            ("active_opacity", self.visuals.active_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                warn!("visuals.{} = {} is outside [0, 1]", name, value);
            }
        }
        Ok(())
    }
}

// Default value functions
fn default_storage_key() -> String { DEFAULT_STORAGE_KEY.to_string() }
fn default_layout_backend() -> LayoutBackend { LayoutBackend::File }
fn default_idle_opacity() -> f32 { 0.5 }
fn default_active_opacity() -> f32 { 0.9 }
fn default_knob_size() -> f32 { 80.0 }
fn default_surface_width() -> f32 { 1280.0 }
fn default_surface_height() -> f32 { 720.0 }

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config: OverlayConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, OverlayConfig::default());
        assert_eq!(config.layout.storage_key, "moonlight-virtual-layout");
        assert_eq!(config.visuals.idle_opacity, 0.5);
        assert_eq!(config.visuals.active_opacity, 0.9);
        assert_eq!(config.joystick.knob_size, 80.0);
    }

    #[test]
    fn test_partial_sections() {
        let yaml = r#"
layout:
  backend: sled
  path: /tmp/layouts
joystick:
  deadzone: 0.1
"#;
        let config: OverlayConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.layout.backend, LayoutBackend::Sled);
        assert_eq!(config.layout.path, Some(PathBuf::from("/tmp/layouts")));
        assert_eq!(config.layout.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.joystick.deadzone, 0.1);
        assert_eq!(config.joystick.knob_size, 80.0);
    }

    #[tokio::test]
    async fn test_load_save_and_validate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");

        let missing = OverlayConfig::load_or_default(&path).await.unwrap();
        assert_eq!(missing, OverlayConfig::default());

        let mut config = OverlayConfig::default();
        config.layout.backend = LayoutBackend::Memory;
        config.save(&path).await.unwrap();
        assert_eq!(OverlayConfig::load(&path).await.unwrap(), config);

        tokio::fs::write(&path, "joystick:\n  deadzone: 1.5\n").await.unwrap();
        assert!(OverlayConfig::load(&path).await.is_err());

        tokio::fs::write(&path, "layout: [").await.unwrap();
        assert!(OverlayConfig::load_or_default(&path).await.is_err());
    }
}
