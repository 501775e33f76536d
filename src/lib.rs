#![forbid(unsafe_code)]
//! Chainable image editing on a CPU raster surface.
//!
//! Load an image into an [`Editor`], apply [`Editor::resize`], [`Editor::circle_crop`],
//! [`Editor::paste`] and [`Editor::text`], then write the result with
//! [`save_surface_to_file`].

pub mod assets;
pub mod editor;
pub mod foundation;
pub mod render;
pub mod save;
pub mod script;
pub mod surface;
pub mod text;

pub use assets::{
    Image,
    color::Color,
    load::{ImageSource, load_image, load_image_async},
};
pub use editor::Editor;
pub use foundation::error::{EditorError, EditorResult};
pub use save::{save_surface_to_file, save_surface_to_file_blocking};
pub use script::{EditOp, EditScript};
pub use surface::Surface;
pub use text::{
    TextAlign, TextOptions,
    font::{Font, FontFamily, FontSpec, FontStyle, Variant},
    fonts::{FONT_DIRS_ENV, FontBook, ResolvedFace},
};
