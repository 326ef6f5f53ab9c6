//! Dataset download.
//!
//! Fetches a dataset's CSV export over HTTP and stores it on disk so the
//! rest of the pipeline only ever reads local files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::SourceError;
use crate::dataset::DatasetDefinition;
use crate::progress::ProgressCallback;

/// Downloads `url` into `dest`, creating parent directories as needed.
///
/// Progress is reported in bytes. The total is only set when the server
/// sends a `Content-Length`.
///
/// # Errors
///
/// Returns [`SourceError`] if the request fails, the server responds with an
/// error status, or the file cannot be written.
pub async fn download_csv(
    url: &str,
    dest: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<PathBuf, SourceError> {
    log::info!("Downloading {url}");

    let mut response = reqwest::get(url).await?.error_for_status()?;
    if let Some(total) = response.content_length() {
        progress.set_total(total);
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        progress.inc(chunk.len() as u64);
        bytes.extend_from_slice(&chunk);
    }
    progress.finish(format!("downloaded {} bytes", bytes.len()));

    log::debug!("Downloaded {} bytes from {url}", bytes.len());

    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(dest, &bytes).await?;

    log::info!("Saved {} bytes to {}", bytes.len(), dest.display());
    Ok(dest.to_path_buf())
}

/// Downloads the CSV export of a dataset definition.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the definition has no `download_url`,
/// or any error from [`download_csv`].
pub async fn download_dataset(
    dataset: &DatasetDefinition,
    dest: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<PathBuf, SourceError> {
    let Some(url) = dataset.download_url.as_deref() else {
        return Err(SourceError::Config {
            message: format!("dataset '{}' has no download_url", dataset.id),
        });
    };
    download_csv(url, dest, progress).await
}
