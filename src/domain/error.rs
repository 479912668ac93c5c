use std::path::PathBuf;

use thiserror::Error;

use crate::api::ApiError;

/// Failure of a single image download. Always recoverable: the run moves on
/// to the next image.
#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Truncated body: expected {expected} bytes, got {written}")]
    Truncated { expected: u64, written: u64 },
}

/// The operator cancelled the run while a request was in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("interrupted by user")]
pub struct Interrupted;

/// Errors that abort the whole run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to set up HTTP client")]
    Client(#[source] ApiError),

    #[error("failed to create output directory {}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch listing page {page}")]
    Listing {
        page: u32,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}
