//! The three raster layers of a session.

use serde::{Deserialize, Serialize};
use tracepad_core::SurfaceError;

use crate::surface::RasterSurface;

/// Names one of the session's layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerId {
    /// Loaded image content; pans and zooms with the view.
    Background,
    /// Committed ink; the only undo-tracked layer.
    Strokes,
    /// Waypoint markers; cleared on every curve commit.
    Guides,
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Background => write!(f, "background"),
            Self::Strokes => write!(f, "strokes"),
            Self::Guides => write!(f, "guides"),
        }
    }
}

/// Background, committed strokes and guide markers, all the same size.
#[derive(Debug)]
pub struct Layers {
    pub(crate) background: RasterSurface,
    pub(crate) strokes: RasterSurface,
    pub(crate) guides: RasterSurface,
    background_loaded: bool,
}

impl Layers {
    /// Allocates three transparent layers.
    pub fn new(width: f64, height: f64, scale: f64) -> Result<Self, SurfaceError> {
        Ok(Self {
            background: RasterSurface::new(width, height, scale)?,
            strokes: RasterSurface::new(width, height, scale)?,
            guides: RasterSurface::new(width, height, scale)?,
            background_loaded: false,
        })
    }

    pub fn get(&self, id: LayerId) -> &RasterSurface {
        match id {
            LayerId::Background => &self.background,
            LayerId::Strokes => &self.strokes,
            LayerId::Guides => &self.guides,
        }
    }

    pub fn background(&self) -> &RasterSurface {
        &self.background
    }

    pub fn strokes(&self) -> &RasterSurface {
        &self.strokes
    }

    pub fn guides(&self) -> &RasterSurface {
        &self.guides
    }

    /// True once an image has been loaded into the background.
    pub fn has_background(&self) -> bool {
        self.background_loaded
    }

    pub(crate) fn mark_background_loaded(&mut self) {
        self.background_loaded = true;
    }
}
