//! Output handler traits and types

use crate::crawler::CrawlParams;
use crate::record::ShopRecord;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("No records with a shop name to write")]
    NothingToWrite,

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Persists the records of a finished crawl
pub trait ResultWriter: Send + Sync {
    /// Writes `records` somewhere derived from `params` and returns the path
    fn write(&self, records: &[ShopRecord], params: &CrawlParams) -> OutputResult<PathBuf>;
}
