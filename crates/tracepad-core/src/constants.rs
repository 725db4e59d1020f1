//! Canvas and interaction constants.
//!
//! These are the defaults the settings crate starts from; a session can be
//! configured with different values.

/// Logical canvas width.
pub const CANVAS_WIDTH: f64 = 800.0;

/// Logical canvas height.
pub const CANVAS_HEIGHT: f64 = 600.0;

/// Minimum distance between two accepted waypoints (strictly greater than).
pub const WAYPOINT_MIN_SPACING: f64 = 12.0;

/// Maximum number of waypoints held in the extrapolation buffer.
pub const WAYPOINT_CAPACITY: usize = 18;

/// Maximum number of history snapshots retained.
pub const HISTORY_CAPACITY: usize = 30;

/// Lowest zoom factor the view accepts. Keeps the inverse transform finite.
pub const MIN_ZOOM: f64 = 0.25;

/// Highest zoom factor the view accepts.
pub const MAX_ZOOM: f64 = 8.0;

/// Zoom levels visited by "cycle zoom", in order.
pub const ZOOM_LEVELS: [f64; 5] = [1.0, 1.5, 2.0, 3.0, 0.5];

/// Radius of the guide marker circle drawn at each accepted waypoint.
pub const MARKER_RADIUS: f64 = 10.0;

/// How far the marker crosshair arms extend past the marker circle.
pub const MARKER_ARM_OVERHANG: f64 = 3.0;

/// Inset of the template reference circle from the shorter canvas edge.
pub const TEMPLATE_INSET: f64 = 10.0;

/// Target compositor frame rate.
pub const FRAME_RATE: u32 = 60;
