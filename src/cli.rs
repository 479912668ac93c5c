use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::{self, ScraperConfig};

/// Download every preview image from a range of gallery listing pages.
#[derive(Debug, Parser)]
#[command(name = "gallery-scraper")]
#[command(about = "Sequential gallery image scraper", long_about = None)]
pub struct Cli {
    /// TOML config file. Flags below override its values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// First listing page (inclusive).
    #[arg(long)]
    pub start: Option<u32>,

    /// Last listing page (inclusive).
    #[arg(long)]
    pub end: Option<u32>,

    /// Directory images are saved into.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Gallery root URL.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Value of the `tags` query parameter.
    #[arg(long)]
    pub tags: Option<String>,

    /// User-Agent header sent with every request.
    #[arg(long)]
    pub user_agent: Option<String>,
}

impl Cli {
    /// Resolve the effective configuration: file (or defaults), then flags.
    pub fn into_config(self) -> Result<ScraperConfig> {
        let mut cfg = config::load(self.config.as_deref())?;

        if let Some(start) = self.start {
            cfg.start_page = start;
        }
        if let Some(end) = self.end {
            cfg.end_page = end;
        }
        if let Some(dir) = self.output_dir {
            cfg.output_dir = dir;
        }
        if let Some(base_url) = self.base_url {
            cfg.base_url = base_url;
        }
        if let Some(tags) = self.tags {
            cfg.tags = tags;
        }
        if let Some(user_agent) = self.user_agent {
            cfg.user_agent = user_agent;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}
