use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    assets::load::ImageSource,
    editor::Editor,
    foundation::error::{EditorError, EditorResult},
    text::TextOptions,
};

/// One step of an edit script, as read from JSON:
///
/// ```json
/// [
///   {"op": "resize", "width": 256, "height": 256},
///   {"op": "circle_crop"},
///   {"op": "paste", "source": "badge.png", "x": 200, "y": 200},
///   {"op": "text", "x": 128, "y": 240, "text": "Hi", "align": "center", "color": "#fff"}
/// ]
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    Resize {
        width: u32,
        height: u32,
    },
    CircleCrop,
    Paste {
        source: String,
        x: i32,
        y: i32,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        #[serde(flatten)]
        options: TextOptions,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditScript {
    pub ops: Vec<EditOp>,
}

impl EditScript {
    pub fn from_json(json: &str) -> EditorResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| EditorError::validation(format!("invalid edit script: {e}")))
    }

    pub fn read(path: &Path) -> EditorResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read edit script '{}'", path.display()))?;
        Self::from_json(&json)
    }

    /// Apply every op in order. Relative paste sources resolve against `base_dir`.
    pub fn apply(&self, editor: &mut Editor, base_dir: &Path) -> EditorResult<()> {
        for (i, op) in self.ops.iter().enumerate() {
            tracing::debug!(step = i, ?op, "apply edit op");
            match op {
                EditOp::Resize { width, height } => {
                    editor.resize(*width, *height)?;
                }
                EditOp::CircleCrop => {
                    editor.circle_crop()?;
                }
                EditOp::Paste { source, x, y } => {
                    let other = Editor::open(resolve_source(source, base_dir))?;
                    editor.paste(&other, *x, *y)?;
                }
                EditOp::Text {
                    x,
                    y,
                    text,
                    options,
                } => {
                    editor.text((*x, *y), text, options)?;
                }
            }
        }
        Ok(())
    }
}

fn resolve_source(source: &str, base_dir: &Path) -> ImageSource {
    match ImageSource::from_uri(source) {
        ImageSource::File(p) if p.is_relative() => ImageSource::File(base_dir.join(p)),
        other => other,
    }
}
