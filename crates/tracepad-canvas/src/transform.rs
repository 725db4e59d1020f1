//! View transform and pointer coordinate mapping.
//!
//! Handles conversion between device coordinates (pointer positions relative to
//! the displayed canvas' top-left corner) and canvas-logical coordinates (the
//! fixed-size space all drawing happens in). Manages rotation, zoom and pan.
//!
//! The forward map used for ink when compositing is
//!
//! ```text
//! display = center + pan + zoom * R(angle) * (logical - center)
//! device  = display / (logical_size / display_size)      // per axis
//! ```
//!
//! and [`ViewTransform::to_logical`] is its exact algebraic inverse:
//!
//! ```text
//! logical = R(-angle) * ((display - center - pan) / zoom) + center
//! ```

use tiny_skia::Transform;
use tracepad_core::constants::{CANVAS_HEIGHT, CANVAS_WIDTH, MAX_ZOOM, MIN_ZOOM};
use tracepad_core::Point;

/// Rotation, zoom and pan of the page relative to the display.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransform {
    angle: f64,
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    width: f64,
    height: f64,
    display_width: f64,
    display_height: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT)
    }
}

impl ViewTransform {
    /// Creates an identity view for a logical canvas of the given size.
    /// The displayed size starts equal to the logical size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            angle: 0.0,
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            width,
            height,
            display_width: width,
            display_height: height,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }

    /// Sets the zoom bounds. `min` is raised to a small positive value so the
    /// inverse transform never divides by zero.
    pub fn with_zoom_limits(mut self, min: f64, max: f64) -> Self {
        self.min_zoom = if min.is_finite() && min > 0.0 { min } else { MIN_ZOOM };
        self.max_zoom = if max.is_finite() && max >= self.min_zoom {
            max
        } else {
            self.min_zoom.max(MAX_ZOOM)
        };
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
        self
    }

    /// Current rotation in degrees, normalised into `[0, 360)`.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Current zoom factor (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current pan offset in device units.
    pub fn pan(&self) -> (f64, f64) {
        (self.pan_x, self.pan_y)
    }

    /// Logical canvas size.
    pub fn logical_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Size at which the host currently displays the canvas.
    pub fn display_size(&self) -> (f64, f64) {
        (self.display_width, self.display_height)
    }

    /// Center of the logical canvas, the pivot for zoom and rotation.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Sets the rotation. Non-finite angles are ignored.
    pub fn set_angle(&mut self, degrees: f64) {
        if degrees.is_finite() {
            self.angle = degrees.rem_euclid(360.0);
        }
    }

    /// Rotates by a delta in degrees.
    pub fn rotate_by(&mut self, delta: f64) {
        self.set_angle(self.angle + delta);
    }

    /// Sets the zoom level, clamped to the configured bounds. Non-finite
    /// values are ignored. Returns the zoom now in effect.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
        self.zoom
    }

    /// Advances to the level after the current one in `levels`, wrapping.
    /// When the current zoom is not one of the levels, jumps to the first.
    pub fn cycle_zoom(&mut self, levels: &[f64]) -> f64 {
        let Some(first) = levels.first() else {
            return self.zoom;
        };
        let next = levels
            .iter()
            .position(|level| (level - self.zoom).abs() < 1e-9)
            .map(|i| levels[(i + 1) % levels.len()])
            .unwrap_or(*first);
        self.set_zoom(next)
    }

    /// Adds a device-space delta to the pan offset.
    ///
    /// Deltas are not passed through the rotate/zoom inverse, so dragging by
    /// the same device distance always moves the view by the same amount.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.pan_x += dx;
            self.pan_y += dy;
        }
    }

    /// Sets the pan offset.
    pub fn set_pan(&mut self, x: f64, y: f64) {
        if x.is_finite() && y.is_finite() {
            self.pan_x = x;
            self.pan_y = y;
        }
    }

    /// Resets zoom to 1.0 and pan to the origin. Rotation is kept.
    pub fn reset_view(&mut self) {
        self.zoom = 1.0_f64.clamp(self.min_zoom, self.max_zoom);
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Records the size the host displays the canvas at. Non-positive or
    /// non-finite sizes are ignored.
    pub fn set_display_size(&mut self, width: f64, height: f64) {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            self.display_width = width;
            self.display_height = height;
        }
    }

    fn display_ratio(&self) -> (f64, f64) {
        (
            self.width / self.display_width,
            self.height / self.display_height,
        )
    }

    /// Maps a device pointer position to canvas-logical coordinates.
    ///
    /// NaN input propagates to a NaN point; callers must check
    /// [`Point::is_finite`] before drawing.
    pub fn to_logical(&self, device_x: f64, device_y: f64) -> Point {
        let (sx, sy) = self.display_ratio();
        let center = self.center();
        let unpanned = Point::new(
            (device_x * sx - center.x - self.pan_x) / self.zoom,
            (device_y * sy - center.y - self.pan_y) / self.zoom,
        );
        unpanned.rotated_around(&Point::default(), -self.angle) + center
    }

    /// Maps a logical point to the device position it is displayed at.
    pub fn to_device(&self, logical: &Point) -> Point {
        let (sx, sy) = self.display_ratio();
        let center = self.center();
        let turned = (*logical - center).rotated_around(&Point::default(), self.angle);
        Point::new(
            (center.x + self.pan_x + turned.x * self.zoom) / sx,
            (center.y + self.pan_y + turned.y * self.zoom) / sy,
        )
    }

    /// Logical-to-display transform for the background: pan and zoom about
    /// the canvas center, no rotation.
    pub fn view_transform(&self) -> Transform {
        let center = self.center();
        Transform::from_translate(
            (center.x + self.pan_x) as f32,
            (center.y + self.pan_y) as f32,
        )
        .pre_scale(self.zoom as f32, self.zoom as f32)
        .pre_translate(-center.x as f32, -center.y as f32)
    }

    /// Logical-to-display transform for ink layers: the view transform with
    /// the page rotation nested inside it.
    pub fn page_transform(&self) -> Transform {
        let center = self.center();
        Transform::from_translate(
            (center.x + self.pan_x) as f32,
            (center.y + self.pan_y) as f32,
        )
        .pre_scale(self.zoom as f32, self.zoom as f32)
        .pre_concat(Transform::from_rotate(self.angle as f32))
        .pre_translate(-center.x as f32, -center.y as f32)
    }
}
