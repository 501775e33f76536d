use std::sync::Arc;

use crate::foundation::error::{EditorError, EditorResult};

pub mod color;
pub mod decode;
pub mod load;

/// Decoded raster image, immutable once built.
///
/// Pixels are premultiplied RGBA8, row-major and tightly packed, which is the layout the
/// rasterizer consumes directly. Cloning shares the pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Image {
    /// Build an image from straight-alpha RGBA8 pixels.
    pub fn from_rgba8(width: u32, height: u32, mut rgba8: Vec<u8>) -> EditorResult<Self> {
        check_len(rgba8.len(), width, height)?;
        decode::premultiply_rgba8_in_place(&mut rgba8);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8),
        })
    }

    /// Build an image from pixels that are already premultiplied.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> EditorResult<Self> {
        check_len(rgba8_premul.len(), width, height)?;
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Decode PNG/JPEG/... bytes (format sniffed from content).
    pub fn decode(bytes: &[u8]) -> EditorResult<Self> {
        decode::decode_image(bytes)
    }

    pub fn from_dynamic(img: &image::DynamicImage) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut raw = rgba.into_raw();
        decode::premultiply_rgba8_in_place(&mut raw);
        Self {
            width,
            height,
            rgba8_premul: Arc::new(raw),
        }
    }

    /// Straight-alpha RGBA of the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba8_premul.get(i..i + 4)?;
        Some(decode::unpremultiply_px([px[0], px[1], px[2], px[3]]))
    }

    pub fn to_rgba_image(&self) -> EditorResult<image::RgbaImage> {
        let mut raw = self.rgba8_premul.as_ref().clone();
        decode::unpremultiply_rgba8_in_place(&mut raw);
        image::RgbaImage::from_raw(self.width, self.height, raw)
            .ok_or_else(|| EditorError::validation("image byte length mismatch"))
    }
}

fn check_len(len: usize, width: u32, height: u32) -> EditorResult<()> {
    let expected = width as usize * height as usize * 4;
    if len != expected {
        return Err(EditorError::validation(format!(
            "expected {expected} rgba8 bytes for {width}x{height}, got {len}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba8_premultiplies_and_pixel_round_trips_opaque() {
        let img = Image::from_rgba8(2, 1, vec![10, 20, 30, 255, 200, 100, 50, 0]).unwrap();
        assert_eq!(img.rgba8_premul.as_slice(), &[10, 20, 30, 255, 0, 0, 0, 0]);
        assert_eq!(img.pixel(0, 0), Some([10, 20, 30, 255]));
        assert_eq!(img.pixel(1, 0), Some([0, 0, 0, 0]));
        assert_eq!(img.pixel(2, 0), None);
    }

    #[test]
    fn rejects_length_mismatch() {
        assert!(Image::from_rgba8(2, 2, vec![0; 4]).is_err());
        assert!(Image::from_premul_rgba8(1, 1, vec![0; 3]).is_err());
    }
}
