//! Crawler module for listing and detail page processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`PageFetcher`] seam
//! - Listing-page parsing and detail-page field extraction
//! - Retry with backoff for detail pages
//! - Overall crawl coordination and the spawned crawl task

mod coordinator;
mod events;
mod extractor;
mod fetcher;
mod listing;
mod request;
mod retry;
mod sleeper;

pub use coordinator::{
    spawn_crawl, start_crawl, CrawlHandle, CrawlOutcome, CrawlReport, Crawler, RunOutcome,
};
pub use events::{CrawlEvents, NoopEvents, TracingEvents};
pub use extractor::{check_page_shape, extract_shop, first_match, rules_for, Rule, TextMode};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use listing::{parse_listing, ListingEntry, ListingPage};
pub use request::{CrawlParams, CrawlRequest};
pub use retry::{fetch_shop_with_retry, RetryPolicy};
pub use sleeper::{Sleeper, TokioSleeper};
