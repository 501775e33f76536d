use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{EditorError, EditorResult};

/// Straight-alpha RGBA8 color parsed from a CSS color string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a CSS named color, `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(..)`, `rgba(..)`,
    /// `hsl(..)` or `hsla(..)`. Case-insensitive.
    pub fn parse(s: &str) -> EditorResult<Self> {
        let s = s.trim().to_ascii_lowercase();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = functional_args(&s, "rgba").or_else(|| functional_args(&s, "rgb")) {
            return parse_rgb_args(&args);
        }
        if let Some(args) = functional_args(&s, "hsla").or_else(|| functional_args(&s, "hsl")) {
            return parse_hsl_args(&args);
        }
        named(&s).ok_or_else(|| EditorError::text(format!("unknown color \"{s}\"")))
    }
}

impl FromStr for Color {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn functional_args(s: &str, name: &str) -> Option<Vec<String>> {
    let inner = s.strip_prefix(name)?.trim_start().strip_prefix('(')?;
    let inner = inner.strip_suffix(')')?;
    Some(
        inner
            .split([',', ' ', '/'])
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .collect(),
    )
}

fn parse_hex(s: &str) -> EditorResult<Color> {
    fn nibble(c: u8) -> EditorResult<u8> {
        (c as char)
            .to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| EditorError::text(format!("invalid hex digit '{}'", c as char)))
    }

    let b = s.as_bytes();
    let expand = |i: usize| -> EditorResult<u8> { Ok(nibble(b[i])? * 17) };
    let pair = |i: usize| -> EditorResult<u8> { Ok(nibble(b[i])? * 16 + nibble(b[i + 1])?) };

    match b.len() {
        3 => Ok(Color::rgb(expand(0)?, expand(1)?, expand(2)?)),
        4 => Ok(Color::rgba(expand(0)?, expand(1)?, expand(2)?, expand(3)?)),
        6 => Ok(Color::rgb(pair(0)?, pair(2)?, pair(4)?)),
        8 => Ok(Color::rgba(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
        _ => Err(EditorError::text(
            "hex color must be #RGB, #RGBA, #RRGGBB or #RRGGBBAA",
        )),
    }
}

fn parse_channel(s: &str) -> EditorResult<u8> {
    let v = if let Some(pct) = s.strip_suffix('%') {
        parse_f64(pct)? / 100.0 * 255.0
    } else {
        parse_f64(s)?
    };
    Ok(v.clamp(0.0, 255.0).round() as u8)
}

fn parse_alpha(s: Option<&String>) -> EditorResult<u8> {
    let Some(s) = s else {
        return Ok(255);
    };
    let v = if let Some(pct) = s.strip_suffix('%') {
        parse_f64(pct)? / 100.0
    } else {
        parse_f64(s)?
    };
    Ok((v.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn parse_f64(s: &str) -> EditorResult<f64> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| EditorError::text(format!("invalid color component \"{s}\"")))
}

fn parse_rgb_args(args: &[String]) -> EditorResult<Color> {
    if args.len() != 3 && args.len() != 4 {
        return Err(EditorError::text("rgb()/rgba() takes 3 or 4 components"));
    }
    Ok(Color::rgba(
        parse_channel(&args[0])?,
        parse_channel(&args[1])?,
        parse_channel(&args[2])?,
        parse_alpha(args.get(3))?,
    ))
}

fn parse_hsl_args(args: &[String]) -> EditorResult<Color> {
    if args.len() != 3 && args.len() != 4 {
        return Err(EditorError::text("hsl()/hsla() takes 3 or 4 components"));
    }
    let h = parse_f64(args[0].trim_end_matches("deg"))?;
    let pct = |s: &str| -> EditorResult<f64> { Ok(parse_f64(s.trim_end_matches('%'))? / 100.0) };
    let (r, g, b) = hsl_to_rgb(h, pct(&args[1])?, pct(&args[2])?);
    let to_u8 = |x: f64| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
    Ok(Color::rgba(to_u8(r), to_u8(g), to_u8(b), parse_alpha(args.get(3))?))
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return (l, l, l);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

/// CSS named colors (all 148 plus `transparent`), via the rasterizer's color crate.
fn named(s: &str) -> Option<Color> {
    if !s.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    let parsed = vello_cpu::peniko::color::parse_color(s).ok()?;
    let rgba = parsed
        .to_alpha_color::<vello_cpu::peniko::color::Srgb>()
        .to_rgba8();
    Some(Color::rgba(rgba.r, rgba.g, rgba.b, rgba.a))
}
