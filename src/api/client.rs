use futures::Stream;
use futures::TryStreamExt;
use reqwest::Client;
use scraper::Selector;
use thiserror::Error;
use url::Url;

use super::listing::extract_preview_urls;
use crate::config::ScraperConfig;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed")]
    RequestError(#[from] reqwest::Error),

    #[error("{0} request returned an error status")]
    Status(&'static str, #[source] reqwest::Error),

    #[error("Invalid URL")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid preview selector {0:?}")]
    InvalidSelector(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// HTTP side of the scraper: listing pages in, image byte streams out.
/// Every request carries the configured user agent.
///
/// Listing requests go through a client without timeouts. Image downloads use
/// a second client whose connect and read timeouts only fire when the socket
/// goes quiet, so a slow but steady transfer is never cut off.
#[derive(Clone)]
pub struct GalleryClient {
    http: Client,
    download_http: Client,
    base_url: Url,
    tags: String,
    preview_selector: Selector,
}

impl GalleryClient {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        let download_http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.download_timeout())
            .read_timeout(config.download_timeout())
            .build()?;
        let preview_selector = Selector::parse(&config.preview_selector)
            .map_err(|_| ApiError::InvalidSelector(config.preview_selector.clone()))?;

        Ok(Self {
            http,
            download_http,
            base_url: directory_url(&config.base_url)?,
            tags: config.tags.clone(),
            preview_selector,
        })
    }

    /// `<base_url>/post?page=<page>&tags=<tags>`
    pub fn listing_url(&self, page: u32) -> Result<Url> {
        let mut url = self.base_url.join("post")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("tags", &self.tags);
        Ok(url)
    }

    /// Fetch one listing page and return the preview image URLs on it.
    /// No timeout is applied here.
    pub async fn fetch_listing(&self, page: u32) -> Result<Vec<String>> {
        let url = self.listing_url(page)?;
        tracing::debug!("fetching listing {}", url);

        let html = self
            .http
            .get(url.clone())
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::Status("Listing", e))?
            .text()
            .await?;

        Ok(extract_preview_urls(&html, &self.preview_selector, &url))
    }

    /// Start downloading `download_url` under the download timeouts.
    /// Returns (declared content length, body stream)
    pub async fn download_file_stream(
        &self,
        download_url: &str,
    ) -> Result<(Option<u64>, impl Stream<Item = Result<bytes::Bytes>>)> {
        let response = self
            .download_http
            .get(download_url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::Status("Download", e))?;

        let total_size = response.content_length();
        let stream = response.bytes_stream().map_err(ApiError::RequestError);

        Ok((total_size, stream))
    }
}

/// Parse `base` so that relative joins append to its path: `http://host/gallery`
/// becomes `http://host/gallery/`.
fn directory_url(base: &str) -> Result<Url> {
    let mut url = Url::parse(base)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
