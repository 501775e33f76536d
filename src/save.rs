use std::{future::Future, path::Path};

use anyhow::Context as _;

use crate::{
    foundation::error::EditorResult,
    surface::{Surface, encode_png},
};

/// Write `surface` to `path` as PNG, creating or truncating the file.
///
/// The pixels are captured when this function is called; later edits to the surface do not
/// affect the file. The returned future resolves once the file is written (or writing failed),
/// and is `'static`, so it can be handed to `tokio::spawn` when the caller does not care.
pub fn save_surface_to_file(
    surface: &Surface,
    path: &Path,
) -> impl Future<Output = EditorResult<()>> + Send + 'static + use<> {
    let snapshot = surface.to_rgba_image();
    let path = path.to_path_buf();

    async move {
        let snapshot = snapshot?;
        let (width, height) = snapshot.dimensions();
        let bytes = tokio::task::spawn_blocking(move || encode_png(snapshot))
            .await
            .context("join png encode task")??;
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("write png '{}'", path.display()))?;
        tracing::info!(path = %path.display(), width, height, "wrote PNG file");
        Ok(())
    }
}

/// Blocking counterpart of [`save_surface_to_file`].
pub fn save_surface_to_file_blocking(surface: &Surface, path: impl AsRef<Path>) -> EditorResult<()> {
    let path = path.as_ref();
    let bytes = surface.encode_png()?;
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
    tracing::info!(
        path = %path.display(),
        width = surface.width(),
        height = surface.height(),
        "wrote PNG file"
    );
    Ok(())
}
