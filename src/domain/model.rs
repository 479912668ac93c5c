use std::path::{Path, PathBuf};

use super::AppError;

/// Result of one `Downloader::download` call.
#[derive(Debug, Clone)]
pub enum DownloadOutcome {
    /// The target existed before the call; nothing was requested.
    AlreadyPresent(PathBuf),
    Completed(PathBuf),
    Failed { url: String, error: AppError },
}

impl DownloadOutcome {
    /// The freshly written file, if this call produced one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            DownloadOutcome::Completed(path) => Some(path),
            _ => None,
        }
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: u32,
    pub downloaded: u32,
    pub skipped: u32,
    pub failed: u32,
}
