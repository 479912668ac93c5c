use tokio_util::sync::CancellationToken;

use super::Downloader;
use crate::{
    api::GalleryClient,
    config::ScraperConfig,
    domain::{DownloadOutcome, Interrupted, RunError, RunSummary},
    utils::filename_from_url,
};

/// The outer loop: every listing page in the configured range, every preview
/// on each page, one request at a time.
pub struct ScrapeRun {
    config: ScraperConfig,
    client: GalleryClient,
    downloader: Downloader,
}

impl ScrapeRun {
    pub fn new(config: ScraperConfig) -> Result<Self, RunError> {
        let client = GalleryClient::new(&config).map_err(RunError::Client)?;
        let downloader = Downloader::new(client.clone(), config.chunk_size);
        Ok(Self {
            config,
            client,
            downloader,
        })
    }

    /// Listing failures and cancellation end the run; failed images do not.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<RunSummary, RunError> {
        let output_dir = &self.config.output_dir;
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| RunError::OutputDir {
                path: output_dir.clone(),
                source,
            })?;

        let (start, end) = (self.config.start_page, self.config.end_page);
        tracing::info!(
            "scraping pages {}..={} into {}",
            start,
            end,
            output_dir.display()
        );

        let mut summary = RunSummary::default();
        for page in start..=end {
            let image_urls = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Interrupted.into()),
                listing = self.client.fetch_listing(page) => {
                    listing.map_err(|source| RunError::Listing { page, source })?
                }
            };
            tracing::debug!("page {}: {} preview(s)", page, image_urls.len());

            for image_url in image_urls {
                let Some(filename) = filename_from_url(&image_url) else {
                    tracing::warn!("no file name in {}, skipping", image_url);
                    continue;
                };
                let target = output_dir.join(filename);

                let outcome = self.downloader.download(&image_url, &target, cancel).await?;
                if let Some(path) = outcome.path() {
                    tracing::info!("saved {}", path.display());
                }
                match outcome {
                    DownloadOutcome::AlreadyPresent(path) => {
                        tracing::debug!("page {}: already have {}", page, path.display());
                        summary.skipped += 1;
                    }
                    DownloadOutcome::Completed(_) => summary.downloaded += 1,
                    DownloadOutcome::Failed { url, error } => {
                        tracing::debug!("page {}: gave up on {} ({})", page, url, error);
                        summary.failed += 1;
                    }
                }
            }

            summary.pages += 1;
            println!("{}", progress_line(page, end));
        }

        tracing::info!(
            "done: {} page(s), {} downloaded, {} already present, {} failed",
            summary.pages,
            summary.downloaded,
            summary.skipped,
            summary.failed
        );
        Ok(summary)
    }
}

/// Console progress after a listing page is done: `<page> / <end>`.
fn progress_line(page: u32, end: u32) -> String {
    format!("{} / {}", page, end)
}
