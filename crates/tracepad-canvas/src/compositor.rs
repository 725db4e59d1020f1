//! Per-frame compositing of the layers onto the display surface.
//!
//! Two nested transform scopes are applied around the canvas center:
//!
//! ```text
//! outer: translate(center + pan) . scale(zoom)       -> background
//! inner: outer . rotate(angle)                       -> strokes, then guides
//! ```
//!
//! The background pans and zooms with the view but never rotates; the ink
//! rotates with the page. Pointer mapping inverts the inner scope exactly.

use tracepad_core::Rgba;

use crate::layers::Layers;
use crate::surface::RasterSurface;
use crate::transform::ViewTransform;

/// Composes layers into a display surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compositor {
    clear_color: Rgba,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(Rgba::WHITE)
    }
}

impl Compositor {
    pub fn new(clear_color: Rgba) -> Self {
        Self { clear_color }
    }

    pub fn clear_color(&self) -> Rgba {
        self.clear_color
    }

    /// Redraws `display` from scratch. `ink_opacity` (0.0..=1.0) applies to
    /// the strokes and guides layers.
    pub fn compose(
        &self,
        layers: &Layers,
        view: &ViewTransform,
        ink_opacity: f32,
        display: &mut RasterSurface,
    ) {
        display.fill(self.clear_color);

        if layers.has_background() {
            layers
                .background()
                .composite_into(display, view.view_transform(), 1.0);
        }

        let page = view.page_transform();
        layers.strokes().composite_into(display, page, ink_opacity);
        layers.guides().composite_into(display, page, ink_opacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracepad_core::Point;

    #[test]
    fn test_empty_layers_show_clear_color() {
        let layers = Layers::new(50.0, 50.0, 1.0).unwrap();
        let mut display = RasterSurface::new(50.0, 50.0, 1.0).unwrap();
        Compositor::new(Rgba::rgb(10, 20, 30)).compose(
            &layers,
            &ViewTransform::new(50.0, 50.0),
            1.0,
            &mut display,
        );
        assert_eq!(
            display.pixel_at(Point::new(25.0, 25.0)),
            Some(Rgba::rgb(10, 20, 30))
        );
    }

    #[test]
    fn test_unloaded_background_is_skipped() {
        let mut layers = Layers::new(50.0, 50.0, 1.0).unwrap();
        layers.background.fill(Rgba::RED);
        let mut display = RasterSurface::new(50.0, 50.0, 1.0).unwrap();
        Compositor::default().compose(&layers, &ViewTransform::new(50.0, 50.0), 1.0, &mut display);
        assert_eq!(display.pixel_at(Point::new(5.0, 5.0)), Some(Rgba::WHITE));
    }

    #[test]
    fn test_ink_is_rotated_with_page() {
        let mut layers = Layers::new(100.0, 100.0, 1.0).unwrap();
        layers.strokes.fill_circle(Point::new(80.0, 50.0), 4.0, Rgba::RED);
        let mut view = ViewTransform::new(100.0, 100.0);
        view.set_angle(90.0);
        let mut display = RasterSurface::new(100.0, 100.0, 1.0).unwrap();
        Compositor::default().compose(&layers, &view, 1.0, &mut display);
        // (80, 50) is 30 right of center; a quarter turn puts it 30 below.
        let turned = display.pixel_at(Point::new(50.0, 80.0)).unwrap();
        assert!(turned.r > 240 && turned.g < 15 && turned.b < 15, "{turned}");
        assert_eq!(display.pixel_at(Point::new(80.0, 50.0)), Some(Rgba::WHITE));
    }
}
