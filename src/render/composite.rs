use crate::foundation::error::{EditorError, EditorResult};

pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over of one pixel.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    match sa {
        0 => return dst,
        255 => return src,
        _ => {}
    }

    let inv = 255u16 - u16::from(sa);
    std::array::from_fn(|i| add_sat_u8(src[i], mul_div255(u16::from(dst[i]), inv)))
}

pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> EditorResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(EditorError::validation(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Size of a tightly packed RGBA8 buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    fn byte_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Source-over `src` onto `dst` with its top-left corner at `(x, y)`.
///
/// The source rectangle is intersected with the destination; destination pixels outside that
/// intersection are left untouched.
pub fn over_at(
    dst: &mut [u8],
    dst_extent: Extent,
    src: &[u8],
    src_extent: Extent,
    x: i32,
    y: i32,
) -> EditorResult<()> {
    if dst.len() != dst_extent.byte_len() || src.len() != src_extent.byte_len() {
        return Err(EditorError::validation(
            "over_at buffer length does not match its extent",
        ));
    }

    let x0 = i64::from(x).max(0);
    let y0 = i64::from(y).max(0);
    let x1 = (i64::from(x) + i64::from(src_extent.width)).min(i64::from(dst_extent.width));
    let y1 = (i64::from(y) + i64::from(src_extent.height)).min(i64::from(dst_extent.height));
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let dst_stride = dst_extent.width as usize * 4;
    let src_stride = src_extent.width as usize * 4;
    for dy in y0..y1 {
        let sy = (dy - i64::from(y)) as usize;
        let sx0 = (x0 - i64::from(x)) as usize;
        let cols = (x1 - x0) as usize;

        let d_start = dy as usize * dst_stride + x0 as usize * 4;
        let s_start = sy * src_stride + sx0 * 4;
        let d_row = &mut dst[d_start..d_start + cols * 4];
        let s_row = &src[s_start..s_start + cols * 4];
        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Destination-in: scale every `dst` pixel by the alpha of the matching `mask` pixel.
pub fn mask_in_place(dst: &mut [u8], mask: &[u8]) -> EditorResult<()> {
    if dst.len() != mask.len() || !dst.len().is_multiple_of(4) {
        return Err(EditorError::validation(
            "mask_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, m) in dst.chunks_exact_mut(4).zip(mask.chunks_exact(4)) {
        match m[3] {
            255 => {}
            0 => d.copy_from_slice(&[0, 0, 0, 0]),
            ma => {
                for c in d.iter_mut() {
                    *c = mul_div255(u16::from(*c), u16::from(ma));
                }
            }
        }
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_blends_partial_alpha() {
        let dst = [0, 0, 255, 255];
        let src = [128, 0, 0, 128];
        assert_eq!(over(dst, src), [128, 0, 127, 255]);
    }

    #[test]
    fn over_src_alpha_0_is_noop() {
        let dst = [10, 20, 30, 40];
        let src = [255, 255, 255, 0];
        assert_eq!(over(dst, src), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        let dst = [0, 0, 0, 255];
        let src = [255, 0, 0, 255];
        assert_eq!(over(dst, src), src);
    }

    #[test]
    fn over_dst_transparent_returns_src() {
        let dst = [0, 0, 0, 0];
        let src = [100, 110, 120, 200];
        assert_eq!(over(dst, src), src);
    }

    #[test]
    fn over_in_place_rejects_mismatched_lengths() {
        let mut dst = vec![0u8; 8];
        let src = vec![0u8; 4];
        assert!(over_in_place(&mut dst, &src).is_err());
    }

    fn solid(extent: Extent, px: [u8; 4]) -> Vec<u8> {
        px.repeat((extent.width * extent.height) as usize)
    }

    #[test]
    fn over_at_touches_only_the_intersection() {
        let de = Extent {
            width: 4,
            height: 3,
        };
        let se = Extent {
            width: 2,
            height: 2,
        };
        let mut dst = solid(de, [0, 0, 255, 255]);
        let src = solid(se, [255, 0, 0, 255]);

        over_at(&mut dst, de, &src, se, 3, -1).unwrap();

        for y in 0..3u32 {
            for x in 0..4u32 {
                let i = ((y * 4 + x) * 4) as usize;
                let expected = if x == 3 && y == 0 {
                    [255, 0, 0, 255]
                } else {
                    [0, 0, 255, 255]
                };
                assert_eq!(&dst[i..i + 4], &expected, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn over_at_fully_outside_is_noop() {
        let de = Extent {
            width: 2,
            height: 2,
        };
        let se = Extent {
            width: 2,
            height: 2,
        };
        let mut dst = solid(de, [1, 2, 3, 255]);
        let before = dst.clone();
        let src = solid(se, [255, 255, 255, 255]);
        over_at(&mut dst, de, &src, se, 2, 0).unwrap();
        over_at(&mut dst, de, &src, se, -2, 0).unwrap();
        over_at(&mut dst, de, &src, se, i32::MAX, i32::MIN).unwrap();
        assert_eq!(dst, before);
    }

    #[test]
    fn mask_in_place_keeps_clears_and_scales() {
        let mut dst = vec![200, 100, 50, 255, 200, 100, 50, 255, 200, 100, 50, 255];
        let mask = vec![0, 0, 0, 255, 0, 0, 0, 0, 0, 0, 0, 128];
        mask_in_place(&mut dst, &mask).unwrap();
        assert_eq!(&dst[0..4], &[200, 100, 50, 255]);
        assert_eq!(&dst[4..8], &[0, 0, 0, 0]);
        assert_eq!(&dst[8..12], &[100, 50, 25, 128]);
    }
}
