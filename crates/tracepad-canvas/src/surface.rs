//! Raster surfaces: owned pixel buffers with drawing primitives.
//!
//! A surface has a fixed logical size and an internal device-pixel-ratio. All
//! primitives take logical coordinates; the ratio is applied internally so
//! callers never see scaled coordinates.

use std::sync::Arc;

use tiny_skia::{
    BlendMode, Color, FillRule, FilterQuality, LineCap, Paint, PathBuilder, Pixmap, PixmapPaint,
    Stroke, Transform,
};
use tracepad_core::{AssetError, Point, Rgba, SurfaceError};

/// Serialized contents of a surface.
///
/// The blob is a PNG so it can be handed to the host as-is. Cloning is cheap;
/// the bytes are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    png: Arc<[u8]>,
    width: u32,
    height: u32,
}

impl Snapshot {
    /// Wraps an already-encoded PNG blob.
    pub fn from_png(png: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            png: png.into(),
            width,
            height,
        }
    }

    /// The encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }

    /// Pixel size of the encoded image.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Decodes the blob back into a pixel buffer.
    pub fn decode(&self) -> Result<Pixmap, AssetError> {
        Pixmap::decode_png(&self.png).map_err(|e| AssetError::Decode {
            reason: e.to_string(),
        })
    }
}

pub(crate) fn paint_for(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// An owned pixel buffer addressed in logical coordinates.
pub struct RasterSurface {
    pixmap: Pixmap,
    width: f64,
    height: f64,
    scale: f64,
    path: Option<PathBuilder>,
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("scale", &self.scale)
            .field("pixels", &(self.pixmap.width(), self.pixmap.height()))
            .field("open_path", &self.path.is_some())
            .finish()
    }
}

impl RasterSurface {
    /// Allocates a transparent surface of `width` x `height` logical units,
    /// backed by `ceil(size * scale)` pixels.
    pub fn new(width: f64, height: f64, scale: f64) -> Result<Self, SurfaceError> {
        let invalid = || SurfaceError::InvalidDimensions {
            width,
            height,
            scale,
        };
        if !(width.is_finite() && height.is_finite() && scale.is_finite())
            || width <= 0.0
            || height <= 0.0
            || scale <= 0.0
        {
            return Err(invalid());
        }
        let px_w = (width * scale).ceil() as u32;
        let px_h = (height * scale).ceil() as u32;
        let pixmap = Pixmap::new(px_w, px_h).ok_or_else(invalid)?;
        Ok(Self {
            pixmap,
            width,
            height,
            scale,
            path: None,
        })
    }

    /// Logical width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Logical height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Device pixel ratio.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Size of the backing pixel buffer.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    /// The backing pixel buffer.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    fn base_transform(&self) -> Transform {
        Transform::from_scale(self.scale as f32, self.scale as f32)
    }

    /// Makes every pixel transparent and drops any open path.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
        self.path = None;
    }

    /// Replaces every pixel with `color`.
    pub fn fill(&mut self, color: Rgba) {
        self.pixmap
            .fill(Color::from_rgba8(color.r, color.g, color.b, color.a));
    }

    /// Strokes the outline of a circle.
    pub fn stroke_circle(&mut self, center: Point, radius: f64, color: Rgba, line_width: f64) {
        let (cx, cy) = center.to_f32();
        let Some(path) = PathBuilder::from_circle(cx, cy, radius as f32) else {
            return;
        };
        let stroke = Stroke {
            width: line_width as f32,
            ..Default::default()
        };
        let transform = self.base_transform();
        self.pixmap
            .stroke_path(&path, &paint_for(color), &stroke, transform, None);
    }

    /// Fills a disc.
    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        let (cx, cy) = center.to_f32();
        let Some(path) = PathBuilder::from_circle(cx, cy, radius as f32) else {
            return;
        };
        let transform = self.base_transform();
        self.pixmap.fill_path(
            &path,
            &paint_for(color),
            FillRule::Winding,
            transform,
            None,
        );
    }

    /// Strokes a horizontal and a vertical line through `center`, each
    /// reaching `arm_length` to either side.
    pub fn stroke_crosshair(&mut self, center: Point, arm_length: f64, color: Rgba, line_width: f64) {
        let (cx, cy) = center.to_f32();
        let arm = arm_length as f32;
        let mut pb = PathBuilder::new();
        pb.move_to(cx - arm, cy);
        pb.line_to(cx + arm, cy);
        pb.move_to(cx, cy - arm);
        pb.line_to(cx, cy + arm);
        let Some(path) = pb.finish() else {
            return;
        };
        let stroke = Stroke {
            width: line_width as f32,
            ..Default::default()
        };
        let transform = self.base_transform();
        self.pixmap
            .stroke_path(&path, &paint_for(color), &stroke, transform, None);
    }

    /// Starts a new open path at `start`, discarding any previous one.
    pub fn begin_path(&mut self, start: Point) {
        let mut pb = PathBuilder::new();
        let (x, y) = start.to_f32();
        pb.move_to(x, y);
        self.path = Some(pb);
    }

    /// True while a path has been started and not yet stroked.
    pub fn has_open_path(&self) -> bool {
        self.path.is_some()
    }

    /// Continues the open path with a quadratic curve. Ignored without an
    /// open path.
    pub fn quadratic_curve_segment(&mut self, control: Point, endpoint: Point) {
        if let Some(pb) = self.path.as_mut() {
            let (cx, cy) = control.to_f32();
            let (x, y) = endpoint.to_f32();
            pb.quad_to(cx, cy, x, y);
        }
    }

    /// Continues the open path with a straight segment. Ignored without an
    /// open path.
    pub fn line_segment(&mut self, endpoint: Point) {
        if let Some(pb) = self.path.as_mut() {
            let (x, y) = endpoint.to_f32();
            pb.line_to(x, y);
        }
    }

    /// Strokes and closes out the open path with round caps. Returns whether
    /// anything was drawn.
    pub fn stroke_path(&mut self, color: Rgba, line_width: f64) -> bool {
        let Some(path) = self.path.take().and_then(PathBuilder::finish) else {
            return false;
        };
        let stroke = Stroke {
            width: line_width as f32,
            line_cap: LineCap::Round,
            ..Default::default()
        };
        let transform = self.base_transform();
        self.pixmap
            .stroke_path(&path, &paint_for(color), &stroke, transform, None);
        true
    }

    /// Draws `image` scaled to fit inside the logical bounds, centered, with
    /// its aspect ratio preserved.
    pub fn draw_image_contained(&mut self, image: &Pixmap) {
        let (iw, ih) = (image.width() as f64, image.height() as f64);
        let fit = (self.width / iw).min(self.height / ih);
        let x = (self.width - iw * fit) / 2.0;
        let y = (self.height - ih * fit) / 2.0;
        let transform = self
            .base_transform()
            .pre_translate(x as f32, y as f32)
            .pre_scale(fit as f32, fit as f32);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, image.as_ref(), &paint, transform, None);
    }

    /// Draws this surface onto `target`. `transform` maps this surface's
    /// logical coordinates to the target's logical coordinates.
    pub fn composite_into(&self, target: &mut RasterSurface, transform: Transform, opacity: f32) {
        let to_target = Transform::from_scale(target.scale as f32, target.scale as f32)
            .pre_concat(transform)
            .pre_scale(1.0 / self.scale as f32, 1.0 / self.scale as f32);
        let quality = if to_target.has_scale() || to_target.has_skew() {
            FilterQuality::Bilinear
        } else {
            FilterQuality::Nearest
        };
        let paint = PixmapPaint {
            opacity: opacity.clamp(0.0, 1.0),
            blend_mode: BlendMode::SourceOver,
            quality,
        };
        target
            .pixmap
            .draw_pixmap(0, 0, self.pixmap.as_ref(), &paint, to_target, None);
    }

    /// Encodes the current contents as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        self.pixmap.encode_png().map_err(|e| SurfaceError::Encode {
            reason: e.to_string(),
        })
    }

    /// Serializes the current contents.
    pub fn snapshot(&self) -> Result<Snapshot, SurfaceError> {
        let (w, h) = self.pixel_size();
        Ok(Snapshot::from_png(self.encode_png()?, w, h))
    }

    /// Replaces the contents with a decoded snapshot. Previous pixels are not
    /// blended with, and any open path is dropped.
    pub fn restore(&mut self, snapshot: &Snapshot) -> tracepad_core::Result<()> {
        let pixmap = snapshot.decode()?;
        self.replace_pixels(pixmap)?;
        Ok(())
    }

    /// Swaps in an already decoded pixel buffer of the same pixel size.
    pub fn replace_pixels(&mut self, pixmap: Pixmap) -> Result<(), SurfaceError> {
        if pixmap.width() != self.pixmap.width() || pixmap.height() != self.pixmap.height() {
            return Err(SurfaceError::SizeMismatch {
                expected_width: self.pixmap.width(),
                expected_height: self.pixmap.height(),
                actual_width: pixmap.width(),
                actual_height: pixmap.height(),
            });
        }
        self.pixmap = pixmap;
        self.path = None;
        Ok(())
    }

    /// Straight-alpha color of the pixel under a logical point.
    pub fn pixel_at(&self, point: Point) -> Option<Rgba> {
        if !point.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let x = (point.x * self.scale).floor() as u32;
        let y = (point.y * self.scale).floor() as u32;
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba::new(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    /// Number of pixels with any coverage.
    pub fn painted_pixels(&self) -> usize {
        self.pixmap.pixels().iter().filter(|p| p.alpha() > 0).count()
    }
}
