pub mod font;
pub mod fonts;
pub(crate) mod layout;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{EditorError, EditorResult};

/// Horizontal anchoring of a text line relative to its `x` position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Start,
    End,
    Left,
    Right,
    Center,
}

impl TextAlign {
    /// Horizontal shift applied to a line of `width` pixels (left-to-right text).
    pub fn offset(self, width: f64) -> f64 {
        match self {
            Self::Start | Self::Left => 0.0,
            Self::End | Self::Right => -width,
            Self::Center => -width / 2.0,
        }
    }
}

impl std::str::FromStr for TextAlign {
    type Err = EditorError;

    fn from_str(s: &str) -> EditorResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "center" => Ok(Self::Center),
            other => Err(EditorError::text(format!("unknown text align \"{other}\""))),
        }
    }
}

/// Paint settings for [`crate::Editor::text`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// CSS color string.
    pub color: String,
    /// Font descriptor, see [`font::FontSpec`].
    pub font: String,
    pub align: TextAlign,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            color: "black".to_string(),
            font: "30px sans-serif".to_string(),
            align: TextAlign::Start,
        }
    }
}

impl TextOptions {
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}
