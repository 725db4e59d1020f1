//! Decoding external images into pixel buffers.

use tiny_skia::{IntSize, Pixmap};
use tracepad_core::AssetError;

/// Decodes any image format the `image` crate understands into a
/// premultiplied pixel buffer.
pub fn decode_image(bytes: &[u8]) -> Result<Pixmap, AssetError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| AssetError::Decode {
        reason: e.to_string(),
    })?;
    let rgba = decoded.into_rgba8();
    let (width, height) = rgba.dimensions();
    let size = IntSize::from_wh(width, height).ok_or(AssetError::Empty { width, height })?;

    let mut data = rgba.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a < 255 {
            for c in &mut px[..3] {
                *c = ((*c as u16 * a + 127) / 255) as u8;
            }
        }
    }

    Pixmap::from_vec(data, size).ok_or_else(|| AssetError::Decode {
        reason: format!("pixel buffer does not match {width}x{height}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba as ImageRgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let img = RgbaImage::from_pixel(4, 2, ImageRgba([10, 20, 30, 255]));
        let pixmap = decode_image(&png_bytes(&img)).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (4, 2));
        let px = pixmap.pixel(3, 1).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (10, 20, 30, 255));
    }

    #[test]
    fn test_decode_premultiplies() {
        let img = RgbaImage::from_pixel(1, 1, ImageRgba([255, 0, 0, 128]));
        let pixmap = decode_image(&png_bytes(&img)).unwrap();
        let px = pixmap.pixel(0, 0).unwrap();
        assert_eq!(px.alpha(), 128);
        assert_eq!(px.red(), 128);
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }
}
