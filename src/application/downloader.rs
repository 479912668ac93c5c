use std::path::Path;

use futures::TryStreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use crate::{
    api::GalleryClient,
    domain::{AppError, DownloadOutcome, Interrupted},
    utils::{error_chain, staging_path},
};

/// Streams single images to disk.
///
/// A file's presence at its target path is the completion marker: an existing
/// target is never re-fetched. This only avoids repeating finished work; it
/// makes no claim that the local copy matches the remote one. Bytes land in a
/// `<name>.part` staging file and are renamed onto the target once complete,
/// so the target is either absent or fully written.
#[derive(Clone)]
pub struct Downloader {
    client: GalleryClient,
    chunk_size: usize,
}

impl Downloader {
    pub fn new(client: GalleryClient, chunk_size: usize) -> Self {
        Self { client, chunk_size }
    }

    /// Download `url` to `target` unless it is already there.
    ///
    /// Per-image failures come back as [`DownloadOutcome::Failed`] with the
    /// partial file removed. Only cancellation through `cancel` is an error.
    pub async fn download(
        &self,
        url: &str,
        target: &Path,
        cancel: &CancellationToken,
    ) -> Result<DownloadOutcome, Interrupted> {
        match tokio::fs::try_exists(target).await {
            Ok(true) => {
                tracing::info!("file exists: {}", target.display());
                return Ok(DownloadOutcome::AlreadyPresent(target.to_path_buf()));
            }
            Ok(false) => {}
            Err(e) => {
                let error = AppError::Io(format!("Failed to check {}: {}", target.display(), e));
                tracing::error!("download of {} failed: {}", url, error);
                return Ok(DownloadOutcome::Failed {
                    url: url.to_string(),
                    error,
                });
            }
        }

        let staging = staging_path(target);
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.fetch_to(url, &staging) => Some(result),
        };

        let Some(result) = result else {
            remove_partial(&staging).await;
            tracing::warn!("download of {} interrupted, partial file removed", url);
            return Err(Interrupted);
        };

        let result = match result {
            Ok(written) => tokio::fs::rename(&staging, target)
                .await
                .map(|_| written)
                .map_err(|e| AppError::Io(format!("Failed to move file into place: {}", e))),
            Err(e) => Err(e),
        };

        match result {
            Ok(written) => {
                tracing::debug!("{}: {} bytes", url, written);
                Ok(DownloadOutcome::Completed(target.to_path_buf()))
            }
            Err(error) => {
                tracing::error!("download of {} failed: {}", url, error);
                remove_partial(&staging).await;
                Ok(DownloadOutcome::Failed {
                    url: url.to_string(),
                    error,
                })
            }
        }
    }

    /// Stream the body into `staging`, one flushed chunk at a time.
    /// Returns the number of bytes written.
    async fn fetch_to(&self, url: &str, staging: &Path) -> Result<u64, AppError> {
        let (total_size, stream) = self
            .client
            .download_file_stream(url)
            .await
            .map_err(|e| AppError::Api(error_chain(e)))?;
        let mut stream = std::pin::pin!(stream);

        let mut file = File::create(staging)
            .await
            .map_err(|e| AppError::Io(format!("Failed to create file: {}", e)))?;

        let mut written: u64 = 0;
        while let Some(bytes) = stream
            .try_next()
            .await
            .map_err(|e| AppError::Api(error_chain(e)))?
        {
            written += write_chunks(&mut file, &bytes, self.chunk_size)
                .await
                .map_err(|e| AppError::Io(format!("Write error: {}", e)))?;
        }

        file.sync_all()
            .await
            .map_err(|e| AppError::Io(format!("Failed to sync file: {}", e)))?;

        if let Some(expected) = total_size {
            if written != expected {
                return Err(AppError::Truncated { expected, written });
            }
        }

        Ok(written)
    }
}

/// Write `bytes` in `chunk_size` slices, flushing after each one. Empty input
/// (a keep-alive frame) writes nothing.
async fn write_chunks<W>(writer: &mut W, bytes: &[u8], chunk_size: usize) -> std::io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    for chunk in bytes.chunks(chunk_size) {
        writer.write_all(chunk).await?;
        writer.flush().await?;
        written += chunk.len() as u64;
    }
    Ok(written)
}

async fn remove_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!("removed partial file {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("failed to remove partial file {}: {}", path.display(), e),
    }
}
