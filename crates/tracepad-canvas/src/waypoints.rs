//! Waypoint buffer and midpoint smoothing.
//!
//! Sparse clicked points are collected into a bounded buffer and turned into a
//! continuous curve: each waypoint acts as the control point of a quadratic
//! segment ending at the midpoint to the next waypoint, and a final straight
//! segment reaches the last waypoint exactly.

use tracepad_core::constants::{WAYPOINT_CAPACITY, WAYPOINT_MIN_SPACING};
use tracepad_core::Point;

/// Why a waypoint was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Coordinates were NaN or infinite.
    NotFinite,
    /// Closer to the previous waypoint than the spacing threshold.
    TooClose,
    /// The buffer already holds its capacity.
    Full,
}

/// Ordered, capacity-bounded sequence of accepted waypoints.
#[derive(Debug, Clone)]
pub struct WaypointBuffer {
    points: Vec<Point>,
    min_spacing: f64,
    capacity: usize,
}

impl Default for WaypointBuffer {
    fn default() -> Self {
        Self::new(WAYPOINT_MIN_SPACING, WAYPOINT_CAPACITY)
    }
}

impl WaypointBuffer {
    /// Creates an empty buffer. A point is accepted only when it lies
    /// strictly farther than `min_spacing` from the last accepted one.
    pub fn new(min_spacing: f64, capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            min_spacing,
            capacity,
        }
    }

    /// Tries to append `point`, returning the reason when it is dropped.
    pub fn add(&mut self, point: Point) -> Result<(), Rejection> {
        if !point.is_finite() {
            return Err(Rejection::NotFinite);
        }
        if self.points.len() >= self.capacity {
            return Err(Rejection::Full);
        }
        if let Some(last) = self.points.last() {
            if point.distance_to(last) <= self.min_spacing {
                return Err(Rejection::TooClose);
            }
        }
        self.points.push(point);
        Ok(())
    }

    /// Accepted waypoints in order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn min_spacing(&self) -> f64 {
        self.min_spacing
    }

    /// Drops all waypoints.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// One piece of a smoothed curve, continuing from the previous end point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveSegment {
    Quadratic { control: Point, end: Point },
    Line { end: Point },
}

impl CurveSegment {
    /// Where this segment ends.
    pub fn end(&self) -> Point {
        match self {
            CurveSegment::Quadratic { end, .. } | CurveSegment::Line { end } => *end,
        }
    }
}

/// A smoothed curve through a list of waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothCurve {
    pub start: Point,
    pub segments: Vec<CurveSegment>,
}

impl SmoothCurve {
    /// Builds the midpoint-smoothed curve. Needs at least two points.
    pub fn through(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let last = rest.last()?;
        let mut segments: Vec<CurveSegment> = points
            .windows(2)
            .map(|pair| CurveSegment::Quadratic {
                control: pair[0],
                end: pair[0].midpoint(&pair[1]),
            })
            .collect();
        segments.push(CurveSegment::Line { end: *last });
        Some(Self {
            start: *first,
            segments,
        })
    }

    /// Final point of the curve.
    pub fn end(&self) -> Point {
        self.segments.last().map_or(self.start, CurveSegment::end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_point_always_accepted() {
        let mut buffer = WaypointBuffer::default();
        assert_eq!(buffer.add(Point::new(0.0, 0.0)), Ok(()));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_spacing_is_strict() {
        let mut buffer = WaypointBuffer::default();
        buffer.add(Point::new(0.0, 0.0)).unwrap();
        assert_eq!(buffer.add(Point::new(12.0, 0.0)), Err(Rejection::TooClose));
        assert_eq!(buffer.add(Point::new(12.5, 0.0)), Ok(()));
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut buffer = WaypointBuffer::new(12.0, 3);
        for i in 0..3 {
            buffer.add(Point::new(i as f64 * 20.0, 0.0)).unwrap();
        }
        assert_eq!(buffer.add(Point::new(100.0, 0.0)), Err(Rejection::Full));
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_nan_rejected() {
        let mut buffer = WaypointBuffer::default();
        assert_eq!(
            buffer.add(Point::new(f64::NAN, 0.0)),
            Err(Rejection::NotFinite)
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_curve_needs_two_points() {
        assert!(SmoothCurve::through(&[]).is_none());
        assert!(SmoothCurve::through(&[Point::new(1.0, 1.0)]).is_none());
    }

    #[test]
    fn test_curve_ends_on_last_waypoint() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
        ];
        let curve = SmoothCurve::through(&points).unwrap();
        assert_eq!(curve.start, Point::new(0.0, 0.0));
        assert_eq!(
            curve.segments,
            vec![
                CurveSegment::Quadratic {
                    control: Point::new(0.0, 0.0),
                    end: Point::new(5.0, 0.0),
                },
                CurveSegment::Quadratic {
                    control: Point::new(10.0, 0.0),
                    end: Point::new(15.0, 0.0),
                },
                CurveSegment::Line {
                    end: Point::new(20.0, 0.0),
                },
            ]
        );
        assert_eq!(curve.end(), Point::new(20.0, 0.0));
    }
}
