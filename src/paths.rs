//! Application path management for portable and installed modes.
//!
//! ## Mode Detection
//!
//! - **Portable mode**: If a `.portable` marker file exists next to the
//!   executable, the config and the stored layout live in the same
//!   directory.
//! - **Installed mode** (default): Data is stored under the platform data
//!   directory (`%APPDATA%\Virtual Gamepad`, `~/.local/share/Virtual Gamepad`).

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Application name used for directories in installed mode
const APP_NAME: &str = "Virtual Gamepad";

/// Application paths for config and layout storage.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Path to the configuration file
    pub config: PathBuf,
    /// Default layout storage location (file directory or sled database)
    pub layout_dir: PathBuf,
    /// Whether running in portable mode (config next to exe)
    pub is_portable: bool,
}

impl AppPaths {
    /// Detect the appropriate paths based on environment.
    ///
    /// Called before logging is initialized, so nothing is logged here.
    pub fn detect() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));

        let data_dir = dirs::data_dir().unwrap_or_else(|| exe_dir.clone());
        Self::resolve(&exe_dir, &data_dir)
    }

    /// Paths for an executable in `exe_dir` with `data_dir` as the
    /// platform data directory
    pub fn resolve(exe_dir: &Path, data_dir: &Path) -> Self {
        if exe_dir.join(".portable").exists() {
            Self {
                config: exe_dir.join("config.yaml"),
                layout_dir: exe_dir.join(".layout"),
                is_portable: true,
            }
        } else {
            let app_data = data_dir.join(APP_NAME);
            Self {
                config: app_data.join("config.yaml"),
                layout_dir: app_data.join("layout"),
                is_portable: false,
            }
        }
    }

    /// Get the base directory (for displaying in logs)
    pub fn base_dir(&self) -> PathBuf {
        self.config
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Ensure the config directory exists.
    ///
    /// Layout stores create their own location when opened.
    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        let base = self.base_dir();
        if !base.exists() {
            debug!("Creating config directory: {}", base.display());
            std::fs::create_dir_all(&base)
                .with_context(|| format!("Failed to create {}", base.display()))?;
        }
        Ok(())
    }

    /// Log the detected paths
    pub fn log_paths(&self) {
        info!(
            "Mode: {}",
            if self.is_portable { "portable" } else { "installed" }
        );
        info!("Config: {}", self.config.display());
        info!("Layout: {}", self.layout_dir.display());
    }
}
