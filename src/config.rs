//! Application configuration
//!
//! Named-field configuration with explicit defaults and builder-style
//! overrides, plus an environment overlay for quick experiments without
//! recompiling.

use crate::error::StartupError;
use crate::world::Cell;

pub const ENV_GRID_WIDTH: &str = "PIXELSAND_GRID_WIDTH";
pub const ENV_GRID_HEIGHT: &str = "PIXELSAND_GRID_HEIGHT";
pub const ENV_VSYNC: &str = "PIXELSAND_VSYNC";

/// Configuration for a [`crate::PixelSandApp`]
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub grid_width: u32,
    pub grid_height: u32,
    pub window_width: u32,
    pub window_height: u32,
    pub vsync: bool,
    /// Material written by the pointer while the primary button is held
    pub brush: Cell,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "PixelSandCompute".to_string(),
            grid_width: 1920,
            grid_height: 1080,
            window_width: 1920,
            window_height: 1080,
            vsync: true,
            brush: Cell::Stone,
        }
    }
}

impl AppConfig {
    /// Sets the world size; the window keeps its own size.
    pub fn with_grid_size(mut self, width: u32, height: u32) -> Self {
        self.grid_width = width;
        self.grid_height = height;
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_brush(mut self, brush: Cell) -> Self {
        self.brush = brush;
        self
    }

    /// Default configuration with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Applies overrides from a key lookup
    ///
    /// Values that fail to parse are logged and ignored, leaving the
    /// previous setting in place.
    ///
    /// # Arguments
    /// * `lookup` - Returns the raw value for an override key, if set
    pub fn overlay<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(width) = parse_override::<u32>(&lookup, ENV_GRID_WIDTH) {
            self.grid_width = width;
        }
        if let Some(height) = parse_override::<u32>(&lookup, ENV_GRID_HEIGHT) {
            self.grid_height = height;
        }
        if let Some(vsync) = parse_override::<bool>(&lookup, ENV_VSYNC) {
            self.vsync = vsync;
        }
        self
    }

    /// Rejects configurations that cannot produce a usable world.
    pub fn validate(&self) -> Result<(), StartupError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(StartupError::Config(format!(
                "grid must be non-empty, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(StartupError::Config(format!(
                "window must be non-empty, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        Ok(())
    }

    pub(crate) fn present_mode(&self) -> wgpu::PresentMode {
        present_mode_for(self.vsync)
    }
}

/// Presentation mode for a vsync setting; the driver picks the concrete mode
pub(crate) fn present_mode_for(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

/// Inverse of [`present_mode_for`]; only `AutoVsync` counts as vsync on
pub(crate) fn is_vsync(mode: wgpu::PresentMode) -> bool {
    mode == wgpu::PresentMode::AutoVsync
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_window_and_grid() {
        let config = AppConfig::default();
        assert_eq!((config.grid_width, config.grid_height), (1920, 1080));
        assert_eq!((config.window_width, config.window_height), (1920, 1080));
        assert_eq!(config.brush, Cell::Stone);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = AppConfig::default()
            .with_grid_size(64, 48)
            .with_window_size(640, 480)
            .with_title("Test")
            .with_vsync(false)
            .with_brush(Cell::Dirt);
        assert_eq!((config.grid_width, config.grid_height), (64, 48));
        assert_eq!((config.window_width, config.window_height), (640, 480));
        assert_eq!(config.title, "Test");
        assert_eq!(config.present_mode(), wgpu::PresentMode::AutoNoVsync);
        assert_eq!(config.brush, Cell::Dirt);
    }

    #[test]
    fn test_overlay_parses_and_ignores_garbage() {
        let config = AppConfig::default().overlay(lookup_from(&[
            (ENV_GRID_WIDTH, "320"),
            (ENV_GRID_HEIGHT, "tall"),
            (ENV_VSYNC, "false"),
        ]));
        assert_eq!(config.grid_width, 320);
        assert_eq!(config.grid_height, 1080);
        assert!(!config.vsync);
    }

    #[test]
    fn test_vsync_toggle_round_trips_through_present_mode() {
        for vsync in [true, false] {
            assert_eq!(is_vsync(present_mode_for(vsync)), vsync);
        }
        assert!(!is_vsync(wgpu::PresentMode::Immediate));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let config = AppConfig::default().with_grid_size(0, 10);
        assert!(matches!(config.validate(), Err(StartupError::Config(_))));
    }
}
