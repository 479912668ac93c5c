pub mod error;
pub mod model;

pub use error::{AppError, Interrupted, RunError};
pub use model::{DownloadOutcome, RunSummary};
