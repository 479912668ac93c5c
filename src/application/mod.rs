pub mod downloader;
pub mod scrape_run;

pub use downloader::Downloader;
pub use scrape_run::ScrapeRun;
