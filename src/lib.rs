//! # Tracepad
//!
//! A layered tracing canvas. A reference image sits on the background layer
//! while the user draws on a transparent ink layer above it, either with a
//! free brush or by placing waypoints that are joined into a smooth curve.
//! The page can be rotated, zoomed and panned, and committed ink can be
//! undone.
//!
//! ## Architecture
//!
//! Tracepad is organized as a workspace with multiple crates:
//!
//! 1. **tracepad-core** - Points, colors, errors and canvas constants
//! 2. **tracepad-canvas** - Surfaces, view transform, stroke engine, history,
//!    compositor and render loop
//! 3. **tracepad-settings** - Configuration files and validation
//! 4. **tracepad** - Scripted command-line driver that integrates all crates

pub mod script;

pub use tracepad_canvas::{
    BrushStyle, DrawMode, GuideStyle, LayerId, PointerEvent, PointerKind, RenderLoop,
    RestoreOutcome, Session, SessionOptions, ViewTransform,
};
pub use tracepad_core::{Error, Point, Result, Rgba};
pub use tracepad_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging on stderr with:
/// - RUST_LOG environment variable support, INFO by default
/// - Pretty console formatting, or one JSON object per line when `json` is set
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .json()
            .with_current_span(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_thread_names(true)
            .with_line_number(true)
            .pretty();
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

/// Builds session options from a loaded configuration.
pub fn session_options(config: &Config) -> SessionOptions {
    SessionOptions {
        width: config.canvas.width,
        height: config.canvas.height,
        device_pixel_ratio: config.canvas.device_pixel_ratio,
        clear_color: config.canvas.clear_color,
        template_guide: config.canvas.template_guide,
        brush: BrushStyle {
            color: config.brush.color,
            dot_radius: config.brush.dot_radius,
            ring_radius: config.brush.ring_radius,
            ring_width: config.brush.ring_width,
            curve_color: config.brush.curve_color,
            curve_width: config.brush.curve_width,
        },
        guides: GuideStyle {
            color: config.guides.marker_color,
            marker_radius: config.guides.marker_radius,
            ..GuideStyle::default()
        },
        waypoint_spacing: config.guides.min_spacing,
        waypoint_capacity: config.guides.capacity,
        history_capacity: config.history.capacity,
        min_zoom: config.view.min_zoom,
        max_zoom: config.view.max_zoom,
        zoom_levels: config.view.zoom_levels.clone(),
        opacity: config.view.opacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_default_session() {
        assert_eq!(session_options(&Config::default()), SessionOptions::default());
    }

    #[test]
    fn test_json_logging_installs_once() {
        assert!(init_logging(true).is_ok());
        tracing::info!(frames = 1, "json logging smoke line");
        assert!(init_logging(false).is_err());
    }

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
        assert!(BUILD_DATE.ends_with("UTC"));
    }
}
