mod api;
mod application;
mod cli;
mod config;
mod domain;
mod logging;
mod utils;

use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use crate::application::ScrapeRun;
use crate::cli::Cli;
use crate::domain::RunError;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let cfg = match Cli::parse().into_config() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("gallery-scraper error: {:#}", err);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!("effective config: {:?}", cfg);

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping");
            on_ctrl_c.cancel();
        }
    });

    let result = match ScrapeRun::new(cfg) {
        Ok(run) => run.run(&cancel).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(RunError::Interrupted(_)) => {
            eprintln!("gallery-scraper: interrupted");
            ExitCode::from(130)
        }
        Err(err) => {
            eprintln!("gallery-scraper error: {:#}", anyhow::Error::new(err));
            ExitCode::FAILURE
        }
    }
}
