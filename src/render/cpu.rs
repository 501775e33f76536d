use std::sync::Arc;

use kurbo::Shape as _;

use crate::{
    foundation::error::{EditorError, EditorResult},
    text::layout::ShapedLine,
};

/// Largest side length the rasterizer can address.
pub const MAX_SIDE: u32 = u16::MAX as u32;

/// Validate surface dimensions and narrow them to the rasterizer's `u16` range.
pub(crate) fn surface_dims(width: u32, height: u32) -> EditorResult<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(EditorError::validation(format!(
            "surface dimensions must be positive, got {width}x{height}"
        )));
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| EditorError::validation(format!("surface width {width} exceeds {MAX_SIDE}")))?;
    let h: u16 = height.try_into().map_err(|_| {
        EditorError::validation(format!("surface height {height} exceeds {MAX_SIDE}"))
    })?;
    Ok((w, h))
}

pub(crate) fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> EditorResult<vello_cpu::Pixmap> {
    let (w, h) = surface_dims(width, height)?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(EditorError::validation("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn image_paint(pixmap: &vello_cpu::Pixmap) -> EditorResult<vello_cpu::Image> {
    let copy = premul_bytes_to_pixmap(
        pixmap.data_as_u8_slice(),
        u32::from(pixmap.width()),
        u32::from(pixmap.height()),
    )?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(copy)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Draw all of `src` scaled into a new `width` x `height` pixmap.
pub(crate) fn scale_pixmap(
    src: &vello_cpu::Pixmap,
    width: u16,
    height: u16,
) -> EditorResult<vello_cpu::Pixmap> {
    let (sw, sh) = (f64::from(src.width()), f64::from(src.height()));
    let paint = image_paint(src)?;

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(vello_cpu::kurbo::Affine::scale_non_uniform(
        f64::from(width) / sw,
        f64::from(height) / sh,
    ));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, sw, sh));
    ctx.flush();

    let mut out = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut out);
    Ok(out)
}

/// Flattening tolerance for the crop circle, in pixels.
const CIRCLE_TOLERANCE: f64 = 0.01;

/// Coverage mask of the circle inscribed in a `width` x `height` surface.
pub(crate) fn circle_mask(width: u16, height: u16) -> vello_cpu::Pixmap {
    let (w, h) = (f64::from(width), f64::from(height));
    let circle = kurbo::Circle::new((w / 2.0, h / 2.0), w.min(h) / 2.0);

    let mut outline = kurbo::BezPath::new();
    kurbo::flatten(
        circle.path_elements(CIRCLE_TOLERANCE),
        CIRCLE_TOLERANCE,
        |el| outline.push(el),
    );

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
    ctx.fill_path(&bezpath_to_cpu(&outline));
    ctx.flush();

    let mut out = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut out);
    out
}

/// Rasterize a shaped line on a transparent `width` x `height` layer, with the layout's
/// top-left corner at `origin`.
pub(crate) fn text_layer(
    width: u16,
    height: u16,
    line: &ShapedLine,
    origin: kurbo::Point,
) -> vello_cpu::Pixmap {
    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));

    for layout_line in line.layout.lines() {
        for item in layout_line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&line.font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.flush();

    let mut out = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut out);
    out
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(p: &vello_cpu::Pixmap, x: usize, y: usize) -> u8 {
        let w = usize::from(p.width());
        p.data_as_u8_slice()[(y * w + x) * 4 + 3]
    }

    #[test]
    fn surface_dims_bounds() {
        assert_eq!(surface_dims(1, 1).unwrap(), (1, 1));
        assert_eq!(surface_dims(MAX_SIDE, 2).unwrap(), (u16::MAX, 2));
        assert!(surface_dims(0, 5).is_err());
        assert!(surface_dims(5, 0).is_err());
        assert!(surface_dims(MAX_SIDE + 1, 5).is_err());
    }

    #[test]
    fn premul_bytes_round_trip_through_pixmap() {
        let bytes = vec![10, 20, 30, 255, 0, 0, 0, 0, 5, 6, 7, 8];
        let p = premul_bytes_to_pixmap(&bytes, 3, 1).unwrap();
        assert_eq!(p.data_as_u8_slice(), bytes.as_slice());
        assert!(premul_bytes_to_pixmap(&bytes, 2, 1).is_err());
    }

    #[test]
    fn circle_mask_is_opaque_in_center_and_clear_in_corners() {
        let m = circle_mask(40, 20);
        assert_eq!(alpha_at(&m, 20, 10), 255);
        assert_eq!(alpha_at(&m, 0, 0), 0);
        assert_eq!(alpha_at(&m, 39, 19), 0);
        // radius 10 around (20, 10): x = 5 is well outside.
        assert_eq!(alpha_at(&m, 5, 10), 0);
    }

    #[test]
    fn circle_mask_coverage_on_tiny_surfaces() {
        // Inscribed circle covers pi/4 of a square, about 200/255.
        let m = circle_mask(2, 2);
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let a = alpha_at(&m, x, y);
            assert!((188..=212).contains(&a), "pixel ({x},{y}) alpha {a}");
        }

        let a = alpha_at(&circle_mask(1, 1), 0, 0);
        assert!((185..=212).contains(&a), "1x1 alpha {a}");
    }

    #[test]
    fn scale_pixmap_produces_target_size() {
        let src = premul_bytes_to_pixmap(&[255, 0, 0, 255].repeat(16), 4, 4).unwrap();
        let out = scale_pixmap(&src, 9, 3).unwrap();
        assert_eq!((out.width(), out.height()), (9, 3));
        assert!(out.data_as_u8_slice().chunks_exact(4).any(|px| px[0] > 200 && px[3] > 200));
    }
}
