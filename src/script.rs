//! Scripted sessions.
//!
//! A script is a JSON array of steps, each an object tagged by `op`:
//!
//! ```json
//! [
//!   { "op": "load_image", "layer": "background", "path": "photo.png" },
//!   { "op": "set_mode", "mode": "free-brush" },
//!   { "op": "stroke", "points": [[100, 100], [140, 120], [180, 150]] },
//!   { "op": "undo" },
//!   { "op": "wait_frames", "frames": 2 }
//! ]
//! ```
//!
//! Steps run in order against one shared session. Image paths are resolved
//! relative to the script file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracepad_canvas::{driver, DrawMode, LayerId, PointerEvent, RenderLoop, RestoreOutcome, Session};
use tracepad_core::{Rgba, ThreadSafe};

/// One scripted command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    /// A raw pointer event in device coordinates.
    Pointer(PointerEvent),
    /// Press at the first point, move through the rest, release at the last.
    Stroke { points: Vec<[f64; 2]> },
    SetMode { mode: DrawMode },
    ToggleMove,
    SetColor { color: Rgba },
    SetZoom { zoom: f64 },
    CycleZoom,
    SetAngle { degrees: f64 },
    RotateBy { degrees: f64 },
    ResetView,
    SetOpacity { percent: u8 },
    SetDisplaySize { width: f64, height: f64 },
    ClearWaypoints,
    /// Turn the collected waypoints into a curve on the strokes layer.
    Commit,
    Undo,
    LoadImage { layer: LayerId, path: PathBuf },
    /// Wait for the render loop to produce this many more frames.
    WaitFrames { frames: u64 },
}

/// Summary of a finished script.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScriptReport {
    pub steps: usize,
    pub undos_applied: usize,
    pub failed_loads: usize,
    pub history_len: usize,
    pub mode: DrawMode,
    pub zoom: f64,
    pub angle: f64,
    pub pan: (f64, f64),
    pub waypoints: usize,
    pub frames: u64,
}

/// Reads a script file.
pub fn load_script(path: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid script {}", path.display()))
}

/// Runs `steps` against `session`.
///
/// A failed image load is logged and counted; the target layer keeps its
/// previous contents and the script carries on. `wait_frames` is skipped
/// when no render loop is given.
pub async fn run_script(
    session: &ThreadSafe<Session>,
    render: Option<&RenderLoop>,
    steps: &[ScriptStep],
    base_dir: &Path,
) -> anyhow::Result<ScriptReport> {
    let mut report = ScriptReport::default();

    for (index, step) in steps.iter().enumerate() {
        tracing::debug!(index, ?step, "Running script step");
        match step {
            ScriptStep::Pointer(event) => {
                session.lock().handle_pointer(*event);
            }
            ScriptStep::Stroke { points } => stroke(session, points),
            ScriptStep::SetMode { mode } => session.lock().set_mode(*mode),
            ScriptStep::ToggleMove => {
                session.lock().toggle_move();
            }
            ScriptStep::SetColor { color } => session.lock().set_brush_color(*color),
            ScriptStep::SetZoom { zoom } => {
                session.lock().set_zoom(*zoom);
            }
            ScriptStep::CycleZoom => {
                session.lock().cycle_zoom();
            }
            ScriptStep::SetAngle { degrees } => session.lock().set_angle(*degrees),
            ScriptStep::RotateBy { degrees } => session.lock().rotate_by(*degrees),
            ScriptStep::ResetView => session.lock().reset_view(),
            ScriptStep::SetOpacity { percent } => session.lock().set_opacity(*percent),
            ScriptStep::SetDisplaySize { width, height } => {
                session.lock().set_display_size(*width, *height)
            }
            ScriptStep::ClearWaypoints => session.lock().clear_waypoints(),
            ScriptStep::Commit => {
                session.lock().commit_extrapolation();
            }
            ScriptStep::Undo => {
                if driver::undo(session).await == RestoreOutcome::Applied {
                    report.undos_applied += 1;
                }
            }
            ScriptStep::LoadImage { layer, path } => {
                let path = base_dir.join(path);
                let loaded = match tokio::fs::read(&path).await {
                    Ok(bytes) => driver::load_image(session, *layer, bytes)
                        .await
                        .map_err(anyhow::Error::from),
                    Err(e) => Err(e.into()),
                };
                if let Err(e) = loaded {
                    tracing::warn!(layer = %layer, "Could not load {}: {}", path.display(), e);
                    report.failed_loads += 1;
                }
            }
            ScriptStep::WaitFrames { frames } => {
                if let Some(render) = render {
                    render.wait_for_frames(*frames).await;
                }
            }
        }
        report.steps += 1;
    }

    let session = session.lock();
    let view = session.view();
    report.history_len = session.history_len();
    report.mode = session.mode();
    report.zoom = view.zoom();
    report.angle = view.angle();
    report.pan = view.pan();
    report.waypoints = session.waypoints().len();
    report.frames = render.map_or(0, RenderLoop::frame_count);
    Ok(report)
}

fn stroke(session: &ThreadSafe<Session>, points: &[[f64; 2]]) {
    let Some(([first_x, first_y], rest)) = points.split_first() else {
        return;
    };
    let mut session = session.lock();
    session.handle_pointer(PointerEvent::down(*first_x, *first_y));
    for [x, y] in rest {
        session.handle_pointer(PointerEvent::moved(*x, *y));
    }
    let [last_x, last_y] = points.last().copied().unwrap_or([*first_x, *first_y]);
    session.handle_pointer(PointerEvent::up(last_x, last_y));
}
