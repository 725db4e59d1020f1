//! Stroke engine: the drawing-mode state machine.
//!
//! Consumes device pointer positions, maps them through the view transform
//! and mutates the layers:
//! - **free brush** stamps onto `strokes` on every sample while the pointer
//!   is held, and asks for a commit on release
//! - **extrapolation** collects spaced waypoints, marking each on `guides`;
//!   the curve is only drawn by [`StrokeEngine::commit_extrapolation`]
//! - **pan** drags the view by raw device deltas

use serde::{Deserialize, Serialize};
use tracepad_core::constants::{MARKER_ARM_OVERHANG, MARKER_RADIUS};
use tracepad_core::{Point, Rgba};

use crate::layers::Layers;
use crate::transform::ViewTransform;
use crate::waypoints::{CurveSegment, Rejection, SmoothCurve, WaypointBuffer};

/// Active input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DrawMode {
    FreeBrush,
    #[default]
    Extrapolation,
    Pan,
}

impl std::fmt::Display for DrawMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FreeBrush => write!(f, "free-brush"),
            Self::Extrapolation => write!(f, "extrapolation"),
            Self::Pan => write!(f, "pan"),
        }
    }
}

/// Ink appearance for brush stamps and committed curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushStyle {
    pub color: Rgba,
    pub dot_radius: f64,
    pub ring_radius: f64,
    pub ring_width: f64,
    /// Committed curves use their own color, independent of `color`.
    pub curve_color: Rgba,
    pub curve_width: f64,
}

impl Default for BrushStyle {
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

/// Appearance of waypoint markers on the guides layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideStyle {
    pub color: Rgba,
    pub marker_radius: f64,
    pub line_width: f64,
}

impl Default for GuideStyle {
    fn default() -> Self {
        Self {
            color: Rgba::GREEN,
            marker_radius: MARKER_RADIUS,
            line_width: 2.0,
        }
    }
}

/// What a single engine call did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeOutcome {
    /// Nothing changed.
    Ignored,
    /// Input was dropped because it mapped to a non-finite point.
    Rejected,
    /// Ink was stamped onto `strokes`; the stroke is still open.
    Stamped,
    /// A stroke or curve was finished; the caller records a snapshot.
    Commit,
    WaypointAccepted,
    WaypointRejected(Rejection),
    Panned,
}

/// Drawing-mode state machine.
#[derive(Debug, Clone)]
pub struct StrokeEngine {
    mode: DrawMode,
    mode_before_pan: DrawMode,
    pressed: bool,
    stroke_open: bool,
    last_device: Option<(f64, f64)>,
    waypoints: WaypointBuffer,
    brush: BrushStyle,
    guide_style: GuideStyle,
}

impl StrokeEngine {
    pub fn new(brush: BrushStyle, guide_style: GuideStyle, waypoints: WaypointBuffer) -> Self {
        Self {
            mode: DrawMode::default(),
            mode_before_pan: DrawMode::default(),
            pressed: false,
            stroke_open: false,
            last_device: None,
            waypoints,
            brush,
            guide_style,
        }
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn brush(&self) -> &BrushStyle {
        &self.brush
    }

    pub fn waypoints(&self) -> &WaypointBuffer {
        &self.waypoints
    }

    /// True while a free-brush stroke has ink that is not yet committed.
    pub fn stroke_open(&self) -> bool {
        self.stroke_open
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.brush.color = color;
    }

    /// Switches mode. An open free-brush stroke is finished first, in which
    /// case [`StrokeOutcome::Commit`] is returned.
    pub fn set_mode(&mut self, mode: DrawMode) -> StrokeOutcome {
        let outcome = self.finish_stroke();
        if mode == DrawMode::Pan && self.mode != DrawMode::Pan {
            self.mode_before_pan = self.mode;
        }
        self.mode = mode;
        self.pressed = false;
        self.last_device = None;
        tracing::debug!(mode = %mode, "Mode changed");
        outcome
    }

    /// Enters pan mode, or returns to the mode that was active before it.
    pub fn toggle_move(&mut self) -> StrokeOutcome {
        if self.mode == DrawMode::Pan {
            self.set_mode(self.mode_before_pan)
        } else {
            self.set_mode(DrawMode::Pan)
        }
    }

    /// Finishes an open free-brush stroke without changing mode.
    pub fn end_stroke(&mut self) -> StrokeOutcome {
        self.last_device = None;
        self.finish_stroke()
    }

    fn finish_stroke(&mut self) -> StrokeOutcome {
        self.pressed = false;
        if std::mem::take(&mut self.stroke_open) {
            StrokeOutcome::Commit
        } else {
            StrokeOutcome::Ignored
        }
    }

    fn logical(view: &ViewTransform, x: f64, y: f64) -> Option<Point> {
        let point = view.to_logical(x, y);
        if point.is_finite() {
            Some(point)
        } else {
            tracing::debug!(x, y, "Rejected pointer position");
            None
        }
    }

    pub fn pointer_down(
        &mut self,
        x: f64,
        y: f64,
        layers: &mut Layers,
        view: &mut ViewTransform,
    ) -> StrokeOutcome {
        if !(x.is_finite() && y.is_finite()) {
            tracing::debug!(x, y, "Rejected pointer down");
            return StrokeOutcome::Rejected;
        }
        self.pressed = true;
        match self.mode {
            DrawMode::FreeBrush => match Self::logical(view, x, y) {
                Some(p) => self.stamp(p, layers),
                None => StrokeOutcome::Rejected,
            },
            DrawMode::Extrapolation => match Self::logical(view, x, y) {
                Some(p) => self.add_waypoint(p, layers),
                None => StrokeOutcome::Rejected,
            },
            DrawMode::Pan => {
                self.last_device = Some((x, y));
                StrokeOutcome::Ignored
            }
        }
    }

    pub fn pointer_move(
        &mut self,
        x: f64,
        y: f64,
        layers: &mut Layers,
        view: &mut ViewTransform,
    ) -> StrokeOutcome {
        if !self.pressed {
            return StrokeOutcome::Ignored;
        }
        if !(x.is_finite() && y.is_finite()) {
            tracing::debug!(x, y, "Rejected pointer move");
            return StrokeOutcome::Rejected;
        }
        match self.mode {
            DrawMode::FreeBrush => match Self::logical(view, x, y) {
                Some(p) => self.stamp(p, layers),
                None => StrokeOutcome::Rejected,
            },
            DrawMode::Extrapolation => match Self::logical(view, x, y) {
                Some(p) => self.add_waypoint(p, layers),
                None => StrokeOutcome::Rejected,
            },
            DrawMode::Pan => {
                let Some((last_x, last_y)) = self.last_device.replace((x, y)) else {
                    return StrokeOutcome::Ignored;
                };
                view.pan_by(x - last_x, y - last_y);
                StrokeOutcome::Panned
            }
        }
    }

    /// Releases the pointer. Only a free-brush stroke that drew something
    /// yields a commit.
    pub fn pointer_up(&mut self) -> StrokeOutcome {
        self.last_device = None;
        match self.mode {
            DrawMode::FreeBrush => self.finish_stroke(),
            DrawMode::Extrapolation | DrawMode::Pan => {
                self.pressed = false;
                StrokeOutcome::Ignored
            }
        }
    }

    fn stamp(&mut self, p: Point, layers: &mut Layers) -> StrokeOutcome {
        let brush = self.brush;
        layers
            .strokes
            .stroke_circle(p, brush.ring_radius, brush.color, brush.ring_width);
        layers.strokes.fill_circle(p, brush.dot_radius, brush.color);
        self.stroke_open = true;
        StrokeOutcome::Stamped
    }

    /// Offers a logical point to the waypoint buffer and marks it on the
    /// guides layer when accepted.
    pub fn add_waypoint(&mut self, p: Point, layers: &mut Layers) -> StrokeOutcome {
        match self.waypoints.add(p) {
            Ok(()) => {
                let style = self.guide_style;
                layers
                    .guides
                    .stroke_circle(p, style.marker_radius, style.color, style.line_width);
                layers.guides.stroke_crosshair(
                    p,
                    style.marker_radius + MARKER_ARM_OVERHANG,
                    style.color,
                    style.line_width,
                );
                tracing::trace!(point = %p, count = self.waypoints.len(), "Waypoint accepted");
                StrokeOutcome::WaypointAccepted
            }
            Err(reason) => StrokeOutcome::WaypointRejected(reason),
        }
    }

    /// Drops all waypoints and their markers.
    pub fn clear_waypoints(&mut self, layers: &mut Layers) {
        self.waypoints.clear();
        layers.guides.clear();
    }

    /// Draws the smoothed curve through the waypoints onto `strokes`, then
    /// clears the waypoints and markers. No-op with fewer than two waypoints.
    pub fn commit_extrapolation(&mut self, layers: &mut Layers) -> StrokeOutcome {
        let Some(curve) = SmoothCurve::through(self.waypoints.points()) else {
            tracing::debug!(
                count = self.waypoints.len(),
                "Not enough waypoints to extrapolate"
            );
            return StrokeOutcome::Ignored;
        };
        let strokes = &mut layers.strokes;
        strokes.begin_path(curve.start);
        for segment in &curve.segments {
            match *segment {
                CurveSegment::Quadratic { control, end } => {
                    strokes.quadratic_curve_segment(control, end)
                }
                CurveSegment::Line { end } => strokes.line_segment(end),
            }
        }
        strokes.stroke_path(self.brush.curve_color, self.brush.curve_width);
        self.clear_waypoints(layers);
        StrokeOutcome::Commit
    }
}
