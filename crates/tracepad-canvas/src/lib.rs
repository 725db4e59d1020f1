//! # Tracepad Canvas
//!
//! Layered raster drawing core: three same-sized pixel layers, a view
//! transform with pan, zoom and rotation, a mode-driven stroke engine, a
//! bounded undo history and a fixed-rate compositor.
//!
//! ## Core Components
//!
//! ### Surfaces
//! - **RasterSurface**: pixel buffer at logical size times device pixel ratio
//! - **Layers**: `background`, `strokes` and `guides`
//! - **Snapshot**: PNG-encoded copy of a surface, used by the history
//!
//! ### Input
//! - **ViewTransform**: device to logical mapping and its inverse
//! - **StrokeEngine**: free brush, waypoint extrapolation and pan modes
//! - **WaypointBuffer** / **SmoothCurve**: spaced points and the midpoint
//!   quadratic curve through them
//!
//! ### History
//! - **History**: bounded snapshot stack that never drops below one entry
//! - **RestoreRegister**: the single restore allowed to land after an undo
//!
//! ### Output
//! - **Compositor**: background under the view scope, ink under the page scope
//! - **RenderLoop**: background task that recomposes at a fixed frame rate
//!
//! ## Architecture
//!
//! ```text
//! Session (command surface)
//!   ├── Layers (background, strokes, guides)
//!   ├── ViewTransform
//!   ├── StrokeEngine ── WaypointBuffer
//!   ├── History + RestoreRegister
//!   └── Compositor ◄── RenderLoop (tokio task)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tracepad_canvas::{DrawMode, PointerEvent, Session, SessionOptions};
//!
//! let mut session = Session::new(SessionOptions::default())?;
//! session.set_mode(DrawMode::FreeBrush);
//! session.handle_pointer(PointerEvent::down(100.0, 100.0));
//! session.handle_pointer(PointerEvent::up(100.0, 100.0));
//! let png = session.export_composite()?;
//! ```

pub mod assets;
pub mod compositor;
pub mod driver;
pub mod engine;
pub mod history;
pub mod input;
pub mod layers;
pub mod render_loop;
pub mod restore;
pub mod session;
pub mod surface;
pub mod transform;
pub mod waypoints;

pub use assets::decode_image;
pub use compositor::Compositor;
pub use driver::{load_image, spawn_undo, undo};
pub use engine::{BrushStyle, DrawMode, GuideStyle, StrokeEngine, StrokeOutcome};
pub use history::History;
pub use input::{InputSource, PointerEvent, PointerKind, PointerResponse};
pub use layers::{LayerId, Layers};
pub use render_loop::RenderLoop;
pub use restore::{RestoreOutcome, RestoreRegister, RestoreTicket};
pub use session::{Session, SessionOptions};
pub use surface::{RasterSurface, Snapshot};
pub use transform::ViewTransform;
pub use waypoints::{CurveSegment, Rejection, SmoothCurve, WaypointBuffer};
