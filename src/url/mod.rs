//! URL handling module for Tabelog-Harvest
//!
//! This module builds listing-page URLs from the area hierarchy and resolves
//! links found in fetched markup against the site origin.

mod listing;
mod resolve;

// Re-export main functions
pub use listing::{build_listing_url, LISTING_SEGMENT, NEW_OPENINGS_MARKER};
pub use resolve::resolve_href;

/// Default site origin
pub const DEFAULT_ORIGIN: &str = "https://tabelog.com";
