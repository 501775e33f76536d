use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    assets::{Image, decode::decode_image},
    foundation::error::{EditorError, EditorResult},
};

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Local file path.
    File(PathBuf),
    /// `http://` or `https://` URL.
    Url(String),
}

impl ImageSource {
    /// Classify a resource string.
    ///
    /// - `http://...` / `https://...` - URL
    /// - `file:///path/to/image.png` - file path
    /// - anything else - file path
    pub fn from_uri(uri: &str) -> Self {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            Self::Url(uri.to_string())
        } else if let Some(path) = uri.strip_prefix("file://") {
            Self::File(PathBuf::from(path))
        } else {
            Self::File(PathBuf::from(uri))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::File(p) => p.display().to_string(),
            Self::Url(u) => u.clone(),
        }
    }
}

impl From<&str> for ImageSource {
    fn from(s: &str) -> Self {
        Self::from_uri(s)
    }
}

impl From<String> for ImageSource {
    fn from(s: String) -> Self {
        Self::from_uri(&s)
    }
}

impl From<&String> for ImageSource {
    fn from(s: &String) -> Self {
        Self::from_uri(s)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

/// Load and decode an image, blocking until the pixels are available.
///
/// URL sources use a blocking HTTP client and must not be loaded from inside an async runtime;
/// use [`load_image_async`] there.
pub fn load_image(source: impl Into<ImageSource>) -> EditorResult<Image> {
    let source = source.into();
    let bytes = match &source {
        ImageSource::File(path) => read_file(path)?,
        ImageSource::Url(url) => fetch_blocking(url)?,
    };
    let image = decode_image(&bytes)?;
    tracing::debug!(
        source = %source.describe(),
        width = image.width,
        height = image.height,
        "loaded image"
    );
    Ok(image)
}

/// Load and decode an image without blocking the calling task.
///
/// Resolves once decoding has finished, so the returned dimensions are always valid.
pub async fn load_image_async(source: impl Into<ImageSource>) -> EditorResult<Image> {
    let source = source.into();
    let bytes = match &source {
        ImageSource::File(path) => tokio::fs::read(path)
            .await
            .map_err(|e| EditorError::load(format!("read '{}': {e}", path.display())))?,
        ImageSource::Url(url) => fetch_async(url).await?,
    };
    let image = tokio::task::spawn_blocking(move || decode_image(&bytes))
        .await
        .context("join image decode task")??;
    tracing::debug!(
        source = %source.describe(),
        width = image.width,
        height = image.height,
        "loaded image"
    );
    Ok(image)
}

fn read_file(path: &Path) -> EditorResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| EditorError::load(format!("read '{}': {e}", path.display())))
}

fn fetch_blocking(url: &str) -> EditorResult<Vec<u8>> {
    let response = reqwest::blocking::get(url)
        .map_err(|e| EditorError::load(format!("fetch '{url}': {e}")))?;
    let status = response.status();
    if !status.is_success() {
        return Err(EditorError::load(format!("fetch '{url}': HTTP {status}")));
    }
    let body = response
        .bytes()
        .map_err(|e| EditorError::load(format!("read body of '{url}': {e}")))?;
    Ok(body.to_vec())
}

async fn fetch_async(url: &str) -> EditorResult<Vec<u8>> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| EditorError::load(format!("fetch '{url}': {e}")))?;
    let status = response.status();
    if !status.is_success() {
        return Err(EditorError::load(format!("fetch '{url}': HTTP {status}")));
    }
    let body = response
        .bytes()
        .await
        .map_err(|e| EditorError::load(format!("read body of '{url}': {e}")))?;
    Ok(body.to_vec())
}
