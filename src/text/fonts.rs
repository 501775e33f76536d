use std::{
    path::Path,
    sync::{Arc, OnceLock},
};

use usvg::fontdb;

use crate::{
    foundation::error::{EditorError, EditorResult},
    text::font::{FontFamily, FontSpec, FontStyle},
};

/// Extra font directories, separated like `PATH`.
pub const FONT_DIRS_ENV: &str = "EASY_IMG_FONT_DIRS";

/// Font faces available to the text operation.
pub struct FontBook {
    db: fontdb::Database,
}

/// A face picked by [`FontBook::resolve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedFace {
    pub id: fontdb::ID,
    pub family: String,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.face_count())
            .finish()
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::empty()
    }
}

impl FontBook {
    pub fn empty() -> Self {
        Self {
            db: fontdb::Database::new(),
        }
    }

    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Self { db }
    }

    /// System fonts plus every font file in the directories named by [`FONT_DIRS_ENV`].
    pub fn from_env() -> Self {
        let mut book = Self::system();
        if let Some(dirs) = std::env::var_os(FONT_DIRS_ENV) {
            for dir in std::env::split_paths(&dirs) {
                let n = book.load_font_dir(&dir);
                tracing::debug!(dir = %dir.display(), faces = n, "loaded font dir");
            }
        }
        book
    }

    /// Process-wide book built from [`FontBook::from_env`] on first use.
    pub fn shared() -> Arc<FontBook> {
        static SHARED: OnceLock<Arc<FontBook>> = OnceLock::new();
        SHARED
            .get_or_init(|| Arc::new(FontBook::from_env()))
            .clone()
    }

    /// Load `.ttf`/`.otf`/`.ttc` files directly inside `dir`; returns the number of faces added.
    pub fn load_font_dir(&mut self, dir: &Path) -> usize {
        let before = self.db.len();
        let Ok(rd) = std::fs::read_dir(dir) else {
            return 0;
        };

        for entry in rd.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
                continue;
            };
            let ext = ext.to_ascii_lowercase();
            if ext != "ttf" && ext != "otf" && ext != "ttc" {
                continue;
            }
            if let Err(e) = self.db.load_font_file(&path) {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
            }
        }
        self.db.len() - before
    }

    pub fn load_font_file(&mut self, path: &Path) -> EditorResult<()> {
        self.db
            .load_font_file(path)
            .map_err(|e| EditorError::text(format!("load font '{}': {e}", path.display())))
    }

    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Pick the best face for `spec`: requested families in order, then generic fallbacks,
    /// then any face at all.
    pub fn resolve(&self, spec: &FontSpec) -> EditorResult<ResolvedFace> {
        let mut families = Vec::<fontdb::Family<'_>>::new();
        for family in &spec.families {
            families.push(match family {
                FontFamily::Serif => fontdb::Family::Serif,
                FontFamily::SansSerif => fontdb::Family::SansSerif,
                FontFamily::Cursive => fontdb::Family::Cursive,
                FontFamily::Fantasy => fontdb::Family::Fantasy,
                FontFamily::Monospace => fontdb::Family::Monospace,
                FontFamily::Named(s) => fontdb::Family::Name(s),
            });
        }
        families.push(fontdb::Family::SansSerif);
        families.push(fontdb::Family::Serif);
        families.push(fontdb::Family::Monospace);

        let style = match spec.style {
            FontStyle::Normal => fontdb::Style::Normal,
            FontStyle::Italic => fontdb::Style::Italic,
            FontStyle::Oblique => fontdb::Style::Oblique,
        };

        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight(spec.weight),
            stretch: fontdb::Stretch::Normal,
            style,
        };

        let id = self
            .db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|f| f.id))
            .ok_or_else(|| EditorError::text("no font faces available"))?;
        let family = self
            .db
            .face(id)
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_default();

        Ok(ResolvedFace { id, family })
    }

    /// Raw bytes and collection index of a face.
    pub(crate) fn face_data(&self, id: fontdb::ID) -> EditorResult<(Vec<u8>, u32)> {
        self.db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| EditorError::text("font face data is unavailable"))
    }
}
