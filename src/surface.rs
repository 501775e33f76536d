use std::io::Cursor;

use anyhow::Context as _;

use crate::{
    assets::{Image, decode},
    foundation::error::{EditorError, EditorResult},
    render::cpu::{premul_bytes_to_pixmap, surface_dims},
};

/// Mutable premultiplied RGBA8 pixel buffer owned by an [`crate::Editor`].
pub struct Surface {
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Surface {
    /// Fully transparent surface.
    pub fn new(width: u32, height: u32) -> EditorResult<Self> {
        let (w, h) = surface_dims(width, height)?;
        Ok(Self {
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Surface holding exactly the pixels of `image`.
    pub fn from_image(image: &Image) -> EditorResult<Self> {
        let pixmap = premul_bytes_to_pixmap(&image.rgba8_premul, image.width, image.height)?;
        Ok(Self { pixmap })
    }

    pub(crate) fn from_pixmap(pixmap: vello_cpu::Pixmap) -> Self {
        Self { pixmap }
    }

    pub fn width(&self) -> u32 {
        u32::from(self.pixmap.width())
    }

    pub fn height(&self) -> u32 {
        u32::from(self.pixmap.height())
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn premul_data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn premul_data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    pub(crate) fn pixmap(&self) -> &vello_cpu::Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA of the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let i = (y as usize * self.width() as usize + x as usize) * 4;
        let px = self.premul_data().get(i..i + 4)?;
        Some(decode::unpremultiply_px([px[0], px[1], px[2], px[3]]))
    }

    pub fn to_image(&self) -> Image {
        Image {
            width: self.width(),
            height: self.height(),
            rgba8_premul: std::sync::Arc::new(self.premul_data().to_vec()),
        }
    }

    /// Straight-alpha copy of the pixels.
    pub fn to_rgba_image(&self) -> EditorResult<image::RgbaImage> {
        let mut raw = self.premul_data().to_vec();
        decode::unpremultiply_rgba8_in_place(&mut raw);
        image::RgbaImage::from_raw(self.width(), self.height(), raw)
            .ok_or_else(|| EditorError::validation("surface byte length mismatch"))
    }

    pub fn encode_png(&self) -> EditorResult<Vec<u8>> {
        encode_png(self.to_rgba_image()?)
    }
}

pub(crate) fn encode_png(rgba: image::RgbaImage) -> EditorResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(rgba)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}
