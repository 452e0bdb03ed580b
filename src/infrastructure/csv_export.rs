// Saving downloaded event CSVs to disk
use bytes::Bytes;
use std::fmt::Display;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No event details available for download")]
    NothingDownloaded,

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn download_filename(sensor_id: impl Display, event_id: impl Display) -> String {
    format!("event_{}_{}.csv", sensor_id, event_id)
}

/// Write the blob to `dir/event_{sensor}_{event}.csv` and return the path
pub async fn save_event_csv(
    dir: &Path,
    sensor_id: impl Display,
    event_id: impl Display,
    blob: Option<&Bytes>,
) -> Result<PathBuf, ExportError> {
    let blob = blob.ok_or(ExportError::NothingDownloaded)?;
    let path = dir.join(download_filename(sensor_id, event_id));

    tokio::fs::write(&path, blob)
        .await
        .map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

    tracing::info!("Saved {} bytes to {}", blob.len(), path.display());
    Ok(path)
}
