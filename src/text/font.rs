use std::fmt;

use crate::foundation::error::{EditorError, EditorResult};

/// Two-valued weight selector for [`Font`] descriptors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Regular,
    Bold,
}

impl Variant {
    /// `"bold"` selects [`Variant::Bold`]; every other name falls back to [`Variant::Regular`].
    pub fn from_name(name: &str) -> Self {
        if name == "bold" {
            Self::Bold
        } else {
            Self::Regular
        }
    }

    pub fn weight_keyword(self) -> &'static str {
        match self {
            Self::Regular => "normal",
            Self::Bold => "bold",
        }
    }
}

impl From<&str> for Variant {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

/// Font descriptor builders for the `font` text option.
pub struct Font;

impl Font {
    pub const POPPINS: &'static str = "Poppins";

    /// `"<normal|bold> <size>px Poppins"`.
    pub fn poppins(size: u32, variant: impl Into<Variant>) -> String {
        Self::descriptor(size, variant, Self::POPPINS)
    }

    pub fn descriptor(size: u32, variant: impl Into<Variant>, family: &str) -> String {
        format!("{} {size}px {family}", variant.into().weight_keyword())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontFamily {
    Named(String),
    Serif,
    SansSerif,
    Monospace,
    Cursive,
    Fantasy,
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::Serif => f.write_str("serif"),
            Self::SansSerif => f.write_str("sans-serif"),
            Self::Monospace => f.write_str("monospace"),
            Self::Cursive => f.write_str("cursive"),
            Self::Fantasy => f.write_str("fantasy"),
        }
    }
}

/// Parsed canvas-style font descriptor, e.g. `"bold 16px Poppins"` or
/// `"italic 300 12px 'Open Sans', sans-serif"`.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub style: FontStyle,
    /// CSS numeric weight, 1..=1000.
    pub weight: u16,
    pub size_px: f32,
    pub families: Vec<FontFamily>,
}

impl FontSpec {
    pub fn parse(descriptor: &str) -> EditorResult<Self> {
        let tokens: Vec<&str> = descriptor.split_whitespace().collect();
        let size_idx = tokens
            .iter()
            .position(|t| parse_size(t).is_some())
            .ok_or_else(|| {
                EditorError::text(format!("font descriptor \"{descriptor}\" has no size"))
            })?;

        let mut style = FontStyle::Normal;
        let mut weight = 400u16;
        for token in &tokens[..size_idx] {
            match token.to_ascii_lowercase().as_str() {
                "normal" | "small-caps" => {}
                "italic" => style = FontStyle::Italic,
                "oblique" => style = FontStyle::Oblique,
                "bold" => weight = 700,
                "bolder" => weight = 700,
                "lighter" => weight = 300,
                other => match other.parse::<u16>() {
                    Ok(w) if (1..=1000).contains(&w) => weight = w,
                    _ => {
                        return Err(EditorError::text(format!(
                            "unexpected \"{token}\" in font descriptor \"{descriptor}\""
                        )));
                    }
                },
            }
        }

        let size_px = parse_size(tokens[size_idx]).unwrap_or_default();
        let families = tokens[size_idx + 1..]
            .join(" ")
            .split(',')
            .map(|f| f.trim().trim_matches(['"', '\'']).trim())
            .filter(|f| !f.is_empty())
            .map(parse_family)
            .collect::<Vec<_>>();
        if families.is_empty() {
            return Err(EditorError::text(format!(
                "font descriptor \"{descriptor}\" has no family"
            )));
        }

        Ok(Self {
            style,
            weight,
            size_px,
            families,
        })
    }
}

fn parse_size(token: &str) -> Option<f32> {
    // "16px/1.2" carries a line height we do not use.
    let token = token.split('/').next()?;
    let (num, scale) = if let Some(n) = token.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = token.strip_suffix("pt") {
        (n, 4.0 / 3.0)
    } else {
        return None;
    };
    let v = num.parse::<f32>().ok()? * scale;
    (v.is_finite() && v > 0.0).then_some(v)
}

fn parse_family(name: &str) -> FontFamily {
    match name.to_ascii_lowercase().as_str() {
        "serif" => FontFamily::Serif,
        "sans-serif" => FontFamily::SansSerif,
        "monospace" => FontFamily::Monospace,
        "cursive" => FontFamily::Cursive,
        "fantasy" => FontFamily::Fantasy,
        _ => FontFamily::Named(name.to_string()),
    }
}
