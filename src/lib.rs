//! Tabelog-Harvest: a polite restaurant-listing harvester
//!
//! This crate walks the paginated search results of a restaurant-listing site,
//! visits every listed restaurant, extracts a fixed set of fields, optionally
//! keeps only restaurants opened in a given year/month, and writes the result
//! to a spreadsheet-friendly CSV file.

pub mod area;
pub mod config;
pub mod crawler;
pub mod filter;
pub mod output;
pub mod record;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Tabelog-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Area selection error: {0}")]
    Area(#[from] area::AreaError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Crawl task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while fetching a single page
///
/// The retry wrapper decides what to do with each variant: network-layer
/// failures and page-shape anomalies are retried, everything else is not.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("Unexpected page shape at {url}: {message}")]
    Shape { url: String, message: String },

    #[error("Invalid request for {url}: {message}")]
    InvalidRequest { url: String, message: String },
}

impl FetchError {
    /// Returns true for failures of the network layer (timeouts, refused
    /// connections, non-2xx responses, truncated bodies)
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Connect { .. } | Self::Status { .. } | Self::Body { .. }
        )
    }

    /// Returns true when the page arrived but did not have the expected shape
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Shape { .. })
    }
}

// Re-export commonly used types
pub use config::Config;
pub use filter::{matches_opened_date, parse_opened_date};
pub use record::{ShopField, ShopRecord, NO_DATA};
pub use state::CrawlPhase;
pub use url::build_listing_url;
