use anyhow::{bail, Context, Result};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Everything a scrape run needs. Every key is optional in `config.toml`;
/// missing keys take the values below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Gallery root; listing pages live at `<base_url>/post?page=<n>&tags=<tags>`.
    /// A path without a trailing slash is treated as a directory.
    pub base_url: String,
    pub tags: String,
    /// First listing page (inclusive).
    pub start_page: u32,
    /// Last listing page (inclusive).
    pub end_page: u32,
    /// Directory images are saved into. Created if missing.
    pub output_dir: PathBuf,
    pub user_agent: String,
    /// CSS selector matching preview `<img>` elements on a listing page.
    pub preview_selector: String,
    /// Connect timeout and idle-read timeout for image downloads. A transfer
    /// that keeps delivering bytes is never cut off. Listing pages have none.
    pub download_timeout_secs: u64,
    /// Size of each write to disk while streaming an image.
    pub chunk_size: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "http://konachan.net".to_string(),
            tags: String::new(),
            start_page: 820,
            end_page: 8000,
            output_dir: PathBuf::from("data/anime"),
            user_agent: "Mozilla/5.0".to_string(),
            preview_selector: "img.preview".to_string(),
            download_timeout_secs: 60,
            chunk_size: 1024,
        }
    }
}

impl ScraperConfig {
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start_page > self.end_page {
            bail!(
                "start_page ({}) must not exceed end_page ({})",
                self.start_page,
                self.end_page
            );
        }
        if self.chunk_size == 0 {
            bail!("chunk_size must be greater than zero");
        }
        if self.download_timeout_secs == 0 {
            bail!("download_timeout_secs must be greater than zero");
        }
        Url::parse(&self.base_url).with_context(|| format!("invalid base_url: {}", self.base_url))?;
        if let Err(e) = Selector::parse(&self.preview_selector) {
            bail!("invalid preview_selector {:?}: {}", self.preview_selector, e);
        }
        Ok(())
    }
}

/// Load configuration from `path`, or the built-in defaults when no file is given.
pub fn load(path: Option<&Path>) -> Result<ScraperConfig> {
    let Some(path) = path else {
        return Ok(ScraperConfig::default());
    };

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let cfg: ScraperConfig = toml::from_str(&data)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}
