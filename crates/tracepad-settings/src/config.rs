//! Configuration and settings management for Tracepad
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in the platform config directory.
//!
//! Configuration is organized into logical sections:
//! - Canvas settings (logical size, pixel ratio, background color)
//! - Brush settings (ink color and stamp geometry)
//! - Guide settings (waypoint spacing, capacity and markers)
//! - History settings
//! - View settings (zoom limits, zoom levels, ink opacity)
//! - Render settings (frame rate)
//!
//! Every section falls back to its defaults when missing from the file, and
//! so does every field within a section.

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracepad_core::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, FRAME_RATE, HISTORY_CAPACITY, MARKER_RADIUS, MAX_ZOOM, MIN_ZOOM,
    WAYPOINT_CAPACITY, WAYPOINT_MIN_SPACING, ZOOM_LEVELS,
};
use tracepad_core::Rgba;

/// Canvas settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Logical canvas width
    pub width: f64,
    /// Logical canvas height
    pub height: f64,
    /// Pixels per logical unit for every layer
    pub device_pixel_ratio: f64,
    /// Color the display is cleared to before compositing
    pub clear_color: Rgba,
    /// Draw the faint reference circle onto a new canvas
    pub template_guide: bool,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            device_pixel_ratio: 1.0,
            clear_color: Rgba::WHITE,
            template_guide: true,
        }
    }
}

/// Brush settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    pub color: Rgba,
    pub dot_radius: f64,
    pub ring_radius: f64,
    pub ring_width: f64,
    /// Color of committed extrapolation curves
    pub curve_color: Rgba,
    /// Line width of committed extrapolation curves
    pub curve_width: f64,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: Rgba::RED,
            dot_radius: 2.0,
            ring_radius: 8.0,
            ring_width: 2.0,
            curve_color: Rgba::GREEN,
            curve_width: 3.0,
        }
    }
}

/// Waypoint guide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideSettings {
    /// A waypoint is accepted only when strictly farther than this from the
    /// previous one
    pub min_spacing: f64,
    /// Maximum waypoints per curve
    pub capacity: usize,
    pub marker_radius: f64,
    pub marker_color: Rgba,
}

impl Default for GuideSettings {
    fn default() -> Self {
        Self {
            min_spacing: WAYPOINT_MIN_SPACING,
            capacity: WAYPOINT_CAPACITY,
            marker_radius: MARKER_RADIUS,
            marker_color: Rgba::GREEN,
        }
    }
}

/// Undo history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Snapshots retained, including the initial state
    pub capacity: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            capacity: HISTORY_CAPACITY,
        }
    }
}

/// View settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Levels visited by zoom cycling, in order
    pub zoom_levels: Vec<f64>,
    /// Ink opacity in percent
    pub opacity: u8,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_levels: ZOOM_LEVELS.to_vec(),
            opacity: 100,
        }
    }
}

/// Render loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Frames per second
    pub frame_rate: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            frame_rate: FRAME_RATE,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub canvas: CanvasSettings,
    pub brush: BrushSettings,
    pub guides: GuideSettings,
    pub history: HistorySettings,
    pub view: ViewSettings,
    pub render: RenderSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config file location: `<config dir>/tracepad/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("tracepad").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("No config directory on this platform".to_string())
            })
    }

    /// Loads the config at [`Config::default_path`], falling back to the
    /// defaults when the file is missing or unreadable.
    pub fn load_or_default() -> Self {
        let path = match Self::default_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!("Using default config: {}", e);
                return Self::default();
            }
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = Format::of(path)?;

        let content = match format {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let canvas = &self.canvas;
        positive("canvas.width", canvas.width)?;
        positive("canvas.height", canvas.height)?;
        positive("canvas.device_pixel_ratio", canvas.device_pixel_ratio)?;

        let brush = &self.brush;
        non_negative("brush.dot_radius", brush.dot_radius)?;
        non_negative("brush.ring_radius", brush.ring_radius)?;
        non_negative("brush.ring_width", brush.ring_width)?;
        positive("brush.curve_width", brush.curve_width)?;

        non_negative("guides.min_spacing", self.guides.min_spacing)?;
        non_negative("guides.marker_radius", self.guides.marker_radius)?;
        if self.guides.capacity < 2 {
            return Err(ConfigError::out_of_range(
                "guides.capacity",
                self.guides.capacity,
            ));
        }

        if self.history.capacity == 0 {
            return Err(ConfigError::out_of_range("history.capacity", 0));
        }

        let view = &self.view;
        positive("view.min_zoom", view.min_zoom)?;
        positive("view.max_zoom", view.max_zoom)?;
        if view.max_zoom < view.min_zoom {
            return Err(ConfigError::out_of_range("view.max_zoom", view.max_zoom));
        }
        if view.zoom_levels.is_empty() {
            return Err(ConfigError::out_of_range("view.zoom_levels", "[]"));
        }
        for &level in &view.zoom_levels {
            if !(level >= view.min_zoom && level <= view.max_zoom) {
                return Err(ConfigError::out_of_range("view.zoom_levels", level));
            }
        }
        if view.opacity > 100 {
            return Err(ConfigError::out_of_range("view.opacity", view.opacity));
        }

        if self.render.frame_rate == 0 {
            return Err(ConfigError::out_of_range("render.frame_rate", 0));
        }

        Ok(())
    }
}

fn positive(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(key, value))
    }
}

fn non_negative(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(key, value))
    }
}
