//! Pointer events consumed from the host.

use serde::{Deserialize, Serialize};

use crate::engine::StrokeOutcome;

/// Phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// Device the pointer event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    #[default]
    Mouse,
    Touch,
}

/// A pointer event in device coordinates, relative to the displayed canvas'
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub source: InputSource,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        Self::mouse(PointerKind::Down, x, y)
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::mouse(PointerKind::Move, x, y)
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::mouse(PointerKind::Up, x, y)
    }

    fn mouse(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            source: InputSource::Mouse,
        }
    }

    /// Same event, reported as coming from a touch screen.
    pub fn from_touch(self) -> Self {
        Self {
            source: InputSource::Touch,
            ..self
        }
    }
}

/// What the core did with a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerResponse {
    pub outcome: StrokeOutcome,
    /// The host should suppress its default handling (page scrolling) for
    /// this event.
    pub suppress_default: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_defaults_to_mouse() {
        let event: PointerEvent =
            serde_json::from_str(r#"{"kind": "move", "x": 3.5, "y": -1}"#).unwrap();
        assert_eq!(event, PointerEvent::moved(3.5, -1.0));
    }

    #[test]
    fn test_touch_source_round_trips() {
        let event = PointerEvent::down(1.0, 2.0).from_touch();
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""source":"touch""#));
        assert_eq!(serde_json::from_str::<PointerEvent>(&json).unwrap(), event);
    }
}
