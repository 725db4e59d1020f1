//! Drawing session: the command surface exposed to the host.
//!
//! A [`Session`] owns the layers, view transform, stroke engine, history and
//! restore register, and turns host commands into engine calls plus history
//! bookkeeping. Every method is synchronous; [`crate::driver`] adds the
//! asynchronous undo and image-load paths on top.

use tiny_skia::Pixmap;
use tracing::Span;
use tracepad_core::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, HISTORY_CAPACITY, MAX_ZOOM, MIN_ZOOM, TEMPLATE_INSET,
    WAYPOINT_CAPACITY, WAYPOINT_MIN_SPACING, ZOOM_LEVELS,
};
use tracepad_core::{AssetError, Point, Result, Rgba};
use uuid::Uuid;

use crate::assets::decode_image;
use crate::compositor::Compositor;
use crate::engine::{BrushStyle, DrawMode, GuideStyle, StrokeEngine, StrokeOutcome};
use crate::history::History;
use crate::input::{InputSource, PointerEvent, PointerKind, PointerResponse};
use crate::layers::{LayerId, Layers};
use crate::restore::{RestoreOutcome, RestoreRegister, RestoreTicket};
use crate::surface::RasterSurface;
use crate::transform::ViewTransform;
use crate::waypoints::WaypointBuffer;

/// Everything needed to start a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
    pub clear_color: Rgba,
    /// Draw the faint reference circle onto the initial strokes state.
    pub template_guide: bool,
    pub brush: BrushStyle,
    pub guides: GuideStyle,
    pub waypoint_spacing: f64,
    pub waypoint_capacity: usize,
    pub history_capacity: usize,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_levels: Vec<f64>,
    /// Ink opacity in percent.
    pub opacity: u8,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            device_pixel_ratio: 1.0,
            clear_color: Rgba::WHITE,
            template_guide: true,
            brush: BrushStyle::default(),
            guides: GuideStyle::default(),
            waypoint_spacing: WAYPOINT_MIN_SPACING,
            waypoint_capacity: WAYPOINT_CAPACITY,
            history_capacity: HISTORY_CAPACITY,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_levels: ZOOM_LEVELS.to_vec(),
            opacity: 100,
        }
    }
}

/// One drawing session.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    span: Span,
    options: SessionOptions,
    view: ViewTransform,
    layers: Layers,
    engine: StrokeEngine,
    history: History,
    restore: RestoreRegister,
    compositor: Compositor,
    opacity: u8,
}

impl Session {
    /// Allocates the layers, draws the initial template and records it as the
    /// history floor.
    pub fn new(options: SessionOptions) -> Result<Self> {
        let id = Uuid::new_v4();
        let span = tracing::info_span!("session", %id);
        let _guard = span.clone().entered();

        let mut layers = Layers::new(options.width, options.height, options.device_pixel_ratio)?;
        if options.template_guide {
            let center = Point::new(options.width / 2.0, options.height / 2.0);
            let radius = options.width.min(options.height) / 2.0 - TEMPLATE_INSET;
            if radius > 0.0 {
                layers
                    .strokes
                    .stroke_circle(center, radius, Rgba::BLACK.with_alpha(0.2), 1.0);
            }
        }

        let mut history = History::new(options.history_capacity);
        history.record(&layers.strokes)?;

        let view = ViewTransform::new(options.width, options.height)
            .with_zoom_limits(options.min_zoom, options.max_zoom);
        let engine = StrokeEngine::new(
            options.brush,
            options.guides,
            WaypointBuffer::new(options.waypoint_spacing, options.waypoint_capacity),
        );

        tracing::info!(
            width = options.width,
            height = options.height,
            dpr = options.device_pixel_ratio,
            "Session started"
        );

        Ok(Self {
            id,
            span: span.clone(),
            view,
            layers,
            engine,
            history,
            restore: RestoreRegister::new(),
            compositor: Compositor::new(options.clear_color),
            opacity: options.opacity.min(100),
            options,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn layers(&self) -> &Layers {
        &self.layers
    }

    pub fn mode(&self) -> DrawMode {
        self.engine.mode()
    }

    pub fn waypoints(&self) -> &[Point] {
        self.engine.waypoints().points()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    pub fn brush_color(&self) -> Rgba {
        self.engine.brush().color
    }

    /// True while an undo is waiting for its snapshot to be decoded.
    pub fn restore_pending(&self) -> bool {
        self.restore.is_pending()
    }

    // -- input -----------------------------------------------------------

    /// Applies one pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerResponse {
        let _guard = self.span.clone().entered();
        if self.engine.mode() == DrawMode::FreeBrush {
            self.settle_pending_restore();
        }
        let outcome = match event.kind {
            PointerKind::Down => {
                self.engine
                    .pointer_down(event.x, event.y, &mut self.layers, &mut self.view)
            }
            PointerKind::Move => {
                self.engine
                    .pointer_move(event.x, event.y, &mut self.layers, &mut self.view)
            }
            PointerKind::Up => self.engine.pointer_up(),
        };
        self.apply_outcome(outcome);
        PointerResponse {
            outcome,
            suppress_default: event.source == InputSource::Touch,
        }
    }

    fn apply_outcome(&mut self, outcome: StrokeOutcome) {
        if outcome == StrokeOutcome::Commit {
            self.commit();
        }
    }

    /// Records the current strokes surface. An encode failure loses this
    /// history step but leaves the session usable.
    fn commit(&mut self) {
        match self.history.record(&self.layers.strokes) {
            Ok(()) => tracing::debug!(len = self.history.len(), "Committed strokes"),
            Err(e) => tracing::warn!("Failed to record history snapshot: {}", e),
        }
    }

    // -- commands --------------------------------------------------------

    pub fn set_mode(&mut self, mode: DrawMode) {
        let _guard = self.span.clone().entered();
        self.settle_pending_restore();
        let outcome = self.engine.set_mode(mode);
        self.apply_outcome(outcome);
    }

    /// Enters pan mode, or leaves it for the previously active mode.
    pub fn toggle_move(&mut self) -> DrawMode {
        let _guard = self.span.clone().entered();
        self.settle_pending_restore();
        let outcome = self.engine.toggle_move();
        self.apply_outcome(outcome);
        self.engine.mode()
    }

    pub fn set_brush_color(&mut self, color: Rgba) {
        self.engine.set_color(color);
    }

    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.view.set_zoom(zoom)
    }

    pub fn cycle_zoom(&mut self) -> f64 {
        self.view.cycle_zoom(&self.options.zoom_levels)
    }

    /// Zoom back to 1.0 and pan back to the origin.
    pub fn reset_view(&mut self) {
        self.view.reset_view();
    }

    pub fn set_angle(&mut self, degrees: f64) {
        self.view.set_angle(degrees);
    }

    pub fn rotate_by(&mut self, delta: f64) {
        self.view.rotate_by(delta);
    }

    pub fn set_display_size(&mut self, width: f64, height: f64) {
        self.view.set_display_size(width, height);
    }

    /// Sets ink opacity in percent, clamped to 100.
    pub fn set_opacity(&mut self, percent: u8) {
        self.opacity = percent.min(100);
    }

    pub fn clear_waypoints(&mut self) {
        self.engine.clear_waypoints(&mut self.layers);
    }

    /// Materializes the waypoint curve onto strokes. Returns false (and
    /// changes nothing) with fewer than two waypoints.
    pub fn commit_extrapolation(&mut self) -> bool {
        let _guard = self.span.clone().entered();
        if self.engine.waypoints().len() < 2 {
            tracing::debug!("Extrapolation commit ignored");
            return false;
        }
        self.settle_pending_restore();
        let outcome = self.engine.commit_extrapolation(&mut self.layers);
        self.apply_outcome(outcome);
        outcome == StrokeOutcome::Commit
    }

    // -- undo ------------------------------------------------------------

    /// Pops the newest history entry and schedules the previous state for
    /// restore. Returns the ticket to decode, or `None` at the history floor.
    ///
    /// The strokes surface is not touched until the ticket is completed with
    /// [`Session::complete_restore`] or settled by the next mutation.
    pub fn undo(&mut self) -> Option<RestoreTicket> {
        let _guard = self.span.clone().entered();
        let outcome = self.engine.end_stroke();
        self.apply_outcome(outcome);
        let Some(snapshot) = self.history.undo() else {
            tracing::debug!("Undo at history floor");
            return None;
        };
        let ticket = self.restore.schedule(snapshot);
        tracing::debug!(
            generation = ticket.generation(),
            remaining = self.history.len(),
            "Undo scheduled"
        );
        Some(ticket)
    }

    /// Applies a decoded restore if it is still the pending one.
    pub fn complete_restore(
        &mut self,
        generation: u64,
        decoded: std::result::Result<Pixmap, AssetError>,
    ) -> RestoreOutcome {
        let _guard = self.span.clone().entered();
        if self.restore.take_if_current(generation).is_none() {
            tracing::debug!(generation, "Stale restore discarded");
            return RestoreOutcome::Superseded;
        }
        self.apply_restore(decoded)
    }

    /// A failed restore re-records the unchanged strokes so the newest
    /// history entry matches what is on screen again.
    fn apply_restore(&mut self, decoded: std::result::Result<Pixmap, AssetError>) -> RestoreOutcome {
        let applied = match decoded {
            Ok(pixmap) => self
                .layers
                .strokes
                .replace_pixels(pixmap)
                .map_err(tracepad_core::Error::from),
            Err(e) => Err(e.into()),
        };
        match applied {
            Ok(()) => RestoreOutcome::Applied,
            Err(e) => {
                tracing::warn!("Restore failed, strokes left unchanged: {}", e);
                self.commit();
                RestoreOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Finishes any pending restore synchronously. Called before every
    /// mutation of the strokes surface.
    pub fn settle_pending_restore(&mut self) -> Option<RestoreOutcome> {
        let _guard = self.span.clone().entered();
        let ticket = self.restore.take_pending()?;
        Some(self.apply_restore(ticket.decode()))
    }

    /// Undo and restore in one synchronous step.
    pub fn undo_now(&mut self) -> RestoreOutcome {
        match self.undo() {
            Some(_) => self
                .settle_pending_restore()
                .unwrap_or(RestoreOutcome::Superseded),
            None => RestoreOutcome::NothingToUndo,
        }
    }

    // -- assets ----------------------------------------------------------

    /// Replaces the background with `image`, aspect-fit inside the canvas.
    pub fn load_background(&mut self, image: &Pixmap) {
        let _guard = self.span.clone().entered();
        self.layers.background.clear();
        self.layers.background.draw_image_contained(image);
        self.layers.mark_background_loaded();
        tracing::info!(
            width = image.width(),
            height = image.height(),
            "Background loaded"
        );
    }

    /// Replaces the strokes contents with `image`, aspect-fit inside the
    /// canvas, and records a history snapshot.
    pub fn load_strokes(&mut self, image: &Pixmap) {
        let _guard = self.span.clone().entered();
        self.settle_pending_restore();
        self.layers.strokes.clear();
        self.layers.strokes.draw_image_contained(image);
        self.commit();
        tracing::info!(
            width = image.width(),
            height = image.height(),
            "Image loaded onto strokes"
        );
    }

    /// Decodes `bytes` and loads the image into `target`. On decode failure
    /// the layer keeps its previous contents and the error is returned.
    pub fn load_image_bytes(&mut self, target: LayerId, bytes: &[u8]) -> Result<()> {
        let image = decode_image(bytes)?;
        self.load_image(target, &image)
    }

    /// Loads a decoded image into `target`. Only background and strokes
    /// accept images.
    pub fn load_image(&mut self, target: LayerId, image: &Pixmap) -> Result<()> {
        match target {
            LayerId::Background => self.load_background(image),
            LayerId::Strokes => self.load_strokes(image),
            LayerId::Guides => {
                return Err(tracepad_core::Error::other(
                    "Images cannot be loaded onto the guides layer",
                ))
            }
        }
        Ok(())
    }

    // -- output ----------------------------------------------------------

    /// A display surface matching this session's size and pixel ratio.
    pub fn new_display_surface(&self) -> Result<RasterSurface> {
        Ok(RasterSurface::new(
            self.options.width,
            self.options.height,
            self.options.device_pixel_ratio,
        )?)
    }

    /// Redraws `display` from the current layers and view.
    pub fn compose_into(&self, display: &mut RasterSurface) {
        self.compositor.compose(
            &self.layers,
            &self.view,
            self.opacity as f32 / 100.0,
            display,
        );
    }

    /// PNG of the full composite as currently displayed.
    pub fn export_composite(&self) -> Result<Vec<u8>> {
        let mut display = self.new_display_surface()?;
        self.compose_into(&mut display);
        Ok(display.encode_png()?)
    }

    /// PNG of the committed strokes layer alone.
    pub fn export_strokes(&self) -> Result<Vec<u8>> {
        Ok(self.layers.strokes.encode_png()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_session() -> Session {
        Session::new(SessionOptions {
            width: 200.0,
            height: 150.0,
            template_guide: false,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_initial_history_floor() {
        let mut session = blank_session();
        assert_eq!(session.history_len(), 1);
        assert_eq!(session.undo_now(), RestoreOutcome::NothingToUndo);
        assert_eq!(session.history_len(), 1);
    }

    #[test]
    fn test_template_guide_is_drawn() {
        let session = Session::new(SessionOptions::default()).unwrap();
        assert!(!session.layers().strokes().is_blank());
        // Radius 290 about (400, 300) passes through (400, 10).
        let px = session.layers().strokes().pixel_at(Point::new(400.0, 10.0)).unwrap();
        assert!(px.a > 0 && px.a <= 60);
    }

    #[test]
    fn test_touch_asks_host_to_suppress_default() {
        let mut session = blank_session();
        let response = session.handle_pointer(PointerEvent::down(10.0, 10.0).from_touch());
        assert!(response.suppress_default);
        let response = session.handle_pointer(PointerEvent::up(10.0, 10.0));
        assert!(!response.suppress_default);
    }

    #[test]
    fn test_undo_is_deferred_until_completed() {
        let mut session = blank_session();
        session.set_mode(DrawMode::FreeBrush);
        session.handle_pointer(PointerEvent::down(50.0, 50.0));
        session.handle_pointer(PointerEvent::up(50.0, 50.0));
        assert_eq!(session.history_len(), 2);

        let ticket = session.undo().unwrap();
        assert!(session.restore_pending());
        assert!(!session.layers().strokes().is_blank());

        let outcome = session.complete_restore(ticket.generation(), ticket.decode());
        assert_eq!(outcome, RestoreOutcome::Applied);
        assert!(session.layers().strokes().is_blank());
    }

    #[test]
    fn test_failed_decode_leaves_strokes() {
        let mut session = blank_session();
        session.set_mode(DrawMode::FreeBrush);
        session.handle_pointer(PointerEvent::down(50.0, 50.0));
        session.handle_pointer(PointerEvent::up(50.0, 50.0));
        let ticket = session.undo().unwrap();
        let outcome = session.complete_restore(
            ticket.generation(),
            Err(AssetError::Decode {
                reason: "truncated".into(),
            }),
        );
        assert!(matches!(outcome, RestoreOutcome::Failed { .. }));
        assert!(!session.layers().strokes().is_blank());
    }

    #[test]
    fn test_failed_restore_keeps_history_in_step() {
        let mut session = blank_session();
        session.set_mode(DrawMode::FreeBrush);
        session.handle_pointer(PointerEvent::down(50.0, 50.0));
        session.handle_pointer(PointerEvent::up(50.0, 50.0));
        assert_eq!(session.history_len(), 2);

        let ticket = session.undo().unwrap();
        assert_eq!(session.history_len(), 1);
        session.complete_restore(
            ticket.generation(),
            Err(AssetError::Decode {
                reason: "truncated".into(),
            }),
        );
        assert_eq!(session.history_len(), 2);

        // The next undo goes back to the blank floor instead of skipping it.
        assert_eq!(session.undo_now(), RestoreOutcome::Applied);
        assert!(session.layers().strokes().is_blank());
        assert_eq!(session.history_len(), 1);
    }

    #[test]
    fn test_opacity_is_clamped() {
        let mut session = blank_session();
        session.set_opacity(250);
        assert_eq!(session.opacity(), 100);
    }

    #[test]
    fn test_guides_reject_images() {
        let mut session = blank_session();
        let image = Pixmap::new(2, 2).unwrap();
        assert!(session.load_image(LayerId::Guides, &image).is_err());
    }
}
