use std::collections::HashMap;

use usvg::fontdb;

use crate::{
    assets::color::Color,
    foundation::error::{EditorError, EditorResult},
    text::{
        font::{FontSpec, FontStyle},
        fonts::FontBook,
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Color> for TextBrushRgba8 {
    fn from(c: Color) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

struct LoadedFace {
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

/// A single shaped line ready for rasterization.
pub(crate) struct ShapedLine {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
    pub(crate) font: vello_cpu::peniko::FontData,
    /// Advance width of the line in pixels.
    pub(crate) width: f32,
    /// Distance from the layout top to the alphabetic baseline.
    pub(crate) baseline: f32,
}

/// Stateful helper for building Parley text layouts from faces picked out of a [`FontBook`].
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    faces: HashMap<fontdb::ID, LoadedFace>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: HashMap::new(),
        }
    }

    /// Shape `text` as one unwrapped line.
    pub(crate) fn shape_line(
        &mut self,
        fonts: &FontBook,
        spec: &FontSpec,
        text: &str,
        brush: TextBrushRgba8,
    ) -> EditorResult<ShapedLine> {
        if !spec.size_px.is_finite() || spec.size_px <= 0.0 {
            return Err(EditorError::text("font size must be finite and > 0"));
        }

        let resolved = fonts.resolve(spec)?;
        let face = self.load_face(fonts, resolved.id)?;
        let family_name = face.family_name.clone();
        let font = face.font.clone();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(spec.size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(spec.weight)),
        ));
        if spec.style != FontStyle::Normal {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let width = layout.width();
        let baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline)
            .unwrap_or(0.0);

        Ok(ShapedLine {
            layout,
            font,
            width,
            baseline,
        })
    }

    fn load_face(&mut self, fonts: &FontBook, id: fontdb::ID) -> EditorResult<&LoadedFace> {
        if !self.faces.contains_key(&id) {
            let (bytes, index) = fonts.face_data(id)?;

            let families = self
                .font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
            let family_id = families
                .first()
                .map(|(family_id, _)| *family_id)
                .ok_or_else(|| EditorError::text("no font families registered from font bytes"))?;
            let family_name = self
                .font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| EditorError::text("registered font family has no name"))?
                .to_string();

            let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), index);
            self.faces.insert(id, LoadedFace { family_name, font });
        }

        self.faces
            .get(&id)
            .ok_or_else(|| EditorError::text("font face cache miss"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black() -> TextBrushRgba8 {
        Color::BLACK.into()
    }

    #[test]
    fn rejects_non_positive_size() {
        let mut engine = TextLayoutEngine::new();
        let spec = FontSpec {
            size_px: 0.0,
            ..FontSpec::parse("10px serif").unwrap()
        };
        assert!(
            engine
                .shape_line(&FontBook::empty(), &spec, "x", black())
                .is_err()
        );
    }

    #[test]
    fn empty_book_is_a_text_error() {
        let mut engine = TextLayoutEngine::new();
        let spec = FontSpec::parse("10px serif").unwrap();
        let err = engine
            .shape_line(&FontBook::empty(), &spec, "x", black())
            .err()
            .unwrap();
        assert!(matches!(err, EditorError::Text(_)));
    }

    #[test]
    fn wider_text_has_wider_layout() {
        let fonts = FontBook::shared();
        if fonts.face_count() == 0 {
            return;
        }
        let mut engine = TextLayoutEngine::new();
        let spec = FontSpec::parse("20px sans-serif").unwrap();
        let short = engine.shape_line(&fonts, &spec, "ab", black()).unwrap();
        let long = engine.shape_line(&fonts, &spec, "abababab", black()).unwrap();
        assert!(long.width > short.width);
        assert!(short.baseline > 0.0);
    }
}
