//! Tracepad Settings Crate
//!
//! Handles application configuration: canvas, brush, guide, history, view
//! and render settings, persisted as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{
    BrushSettings, CanvasSettings, Config, GuideSettings, HistorySettings, RenderSettings,
    ViewSettings,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
