use std::sync::Arc;

use crate::{
    assets::{
        Image,
        color::Color,
        load::{ImageSource, load_image},
    },
    foundation::error::EditorResult,
    render::{
        composite::{self, Extent},
        cpu,
    },
    surface::Surface,
    text::{
        TextOptions,
        font::FontSpec,
        fonts::FontBook,
        layout::{TextBrushRgba8, TextLayoutEngine},
    },
};

/// Owns one drawing surface and applies chainable edits to it.
///
/// ```no_run
/// use easy_img::{Editor, Font, TextOptions};
///
/// # fn main() -> easy_img::EditorResult<()> {
/// let avatar = Editor::open("avatar.png")?;
/// let mut card = Editor::open("background.png")?;
/// card.paste(&avatar, 10, 10)?
///     .text((120.0, 60.0), "Hello", &TextOptions::default().font(Font::poppins(24, "bold")))?
///     .resize(400, 200)?;
/// # Ok(())
/// # }
/// ```
pub struct Editor {
    surface: Surface,
    fonts: Option<Arc<FontBook>>,
    text_engine: Option<TextLayoutEngine>,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}

impl Editor {
    /// Surface sized to `image`, holding its pixels unscaled at (0, 0).
    pub fn new(image: &Image) -> EditorResult<Self> {
        Ok(Self::from_surface(Surface::from_image(image)?))
    }

    /// Load `source` (path, `file://` URI or `http(s)` URL), blocking until decoded.
    pub fn open(source: impl Into<ImageSource>) -> EditorResult<Self> {
        let image = load_image(source)?;
        Self::new(&image)
    }

    /// Fully transparent `width` x `height` surface.
    pub fn blank(width: u32, height: u32) -> EditorResult<Self> {
        Ok(Self::from_surface(Surface::new(width, height)?))
    }

    fn from_surface(surface: Surface) -> Self {
        Self {
            surface,
            fonts: None,
            text_engine: None,
        }
    }

    /// Use `fonts` instead of [`FontBook::shared`] for [`Editor::text`].
    pub fn with_fonts(mut self, fonts: Arc<FontBook>) -> Self {
        self.fonts = Some(fonts);
        self
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn into_surface(self) -> Surface {
        self.surface
    }

    pub fn to_image(&self) -> Image {
        self.surface.to_image()
    }

    /// Replace the surface with a `width` x `height` one holding the current content scaled to
    /// fit. Resizing to the current dimensions leaves the pixels untouched.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn resize(&mut self, width: u32, height: u32) -> EditorResult<&mut Self> {
        let (w, h) = cpu::surface_dims(width, height)?;
        if self.surface.dimensions() == (width, height) {
            return Ok(self);
        }
        let scaled = cpu::scale_pixmap(self.surface.pixmap(), w, h)?;
        self.surface = Surface::from_pixmap(scaled);
        Ok(self)
    }

    /// Erase everything outside the circle inscribed in the surface.
    pub fn circle_crop(&mut self) -> EditorResult<&mut Self> {
        let (w, h) = (self.surface.pixmap().width(), self.surface.pixmap().height());
        let mask = cpu::circle_mask(w, h);
        composite::mask_in_place(self.surface.premul_data_mut(), mask.data_as_u8_slice())?;
        tracing::debug!(width = w, height = h, "circle crop");
        Ok(self)
    }

    /// Draw `other`'s surface with its top-left corner at `(x, y)`.
    pub fn paste(&mut self, other: &Editor, x: i32, y: i32) -> EditorResult<&mut Self> {
        let dst_extent = Extent {
            width: self.width(),
            height: self.height(),
        };
        let src_extent = Extent {
            width: other.width(),
            height: other.height(),
        };
        composite::over_at(
            self.surface.premul_data_mut(),
            dst_extent,
            other.surface.premul_data(),
            src_extent,
            x,
            y,
        )?;
        tracing::debug!(
            x,
            y,
            src_width = src_extent.width,
            src_height = src_extent.height,
            "paste"
        );
        Ok(self)
    }

    /// Draw one line of `text` with its alphabetic baseline at `position.1`, anchored
    /// horizontally at `position.0` according to `options.align`.
    #[tracing::instrument(level = "debug", skip(self, options), fields(font = %options.font))]
    pub fn text(
        &mut self,
        position: (f64, f64),
        text: &str,
        options: &TextOptions,
    ) -> EditorResult<&mut Self> {
        let color = Color::parse(&options.color)?;
        let spec = FontSpec::parse(&options.font)?;
        if text.is_empty() {
            return Ok(self);
        }

        let fonts = self.fonts.get_or_insert_with(FontBook::shared).clone();
        let engine = self.text_engine.get_or_insert_with(TextLayoutEngine::new);
        let line = engine.shape_line(&fonts, &spec, text, TextBrushRgba8::from(color))?;

        let origin = kurbo::Point::new(
            position.0 + options.align.offset(f64::from(line.width)),
            position.1 - f64::from(line.baseline),
        );
        let (w, h) = (self.surface.pixmap().width(), self.surface.pixmap().height());
        let layer = cpu::text_layer(w, h, &line, origin);
        composite::over_in_place(self.surface.premul_data_mut(), layer.data_as_u8_slice())?;
        Ok(self)
    }
}
