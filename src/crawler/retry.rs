//! Retry wrapper for detail-page fetches
//!
//! | Failure | Action |
//! |---------|--------|
//! | Network (timeout, connect, non-2xx, body) | Retry, backoff doubles after each failure |
//! | Page shape anomaly | Retry, backoff stays constant |
//! | Anything else | Give up immediately |
//!
//! When attempts run out, or on an immediate give-up, the caller receives the
//! all-sentinel record for the URL instead of an error.

use crate::config::CrawlerConfig;
use crate::crawler::extractor::{check_page_shape, extract_shop};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::sleeper::Sleeper;
use crate::record::ShopRecord;
use crate::FetchError;
use std::time::Duration;

/// Attempt cap and initial backoff for detail fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Wait before the second attempt
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.max_retries, config.retry_wait())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

/// Fetches one detail page and extracts its record, retrying per `policy`
///
/// # Arguments
///
/// * `fetcher` - Source of page markup
/// * `sleeper` - Used for every backoff wait
/// * `url` - Detail page URL
/// * `policy` - Attempt cap and initial delay
///
/// # Returns
///
/// The extracted record, or [`ShopRecord::empty`] for `url` if every attempt
/// failed or the failure was not retryable.
pub async fn fetch_shop_with_retry(
    fetcher: &dyn PageFetcher,
    sleeper: &dyn Sleeper,
    url: &str,
    policy: &RetryPolicy,
) -> ShopRecord {
    let mut wait = policy.base_delay;

    for attempt in 1..=policy.max_attempts {
        let error = match fetch_detail(fetcher, url).await {
            Ok(record) => return record,
            Err(error) => error,
        };

        if !error.is_network() && !error.is_shape() {
            tracing::error!("Giving up on {} after unexpected error: {}", url, error);
            return ShopRecord::empty(url);
        }

        if attempt == policy.max_attempts {
            tracing::warn!(
                "Giving up on {} after {} attempts: {}",
                url,
                attempt,
                error
            );
            break;
        }

        tracing::warn!(
            attempt,
            max_attempts = policy.max_attempts,
            delay_ms = wait.as_millis() as u64,
            error = %error,
            "detail fetch failed, retrying after backoff"
        );
        sleeper.sleep(wait).await;

        // Shape anomalies keep the current delay
        if error.is_network() {
            wait = wait.saturating_mul(2);
        }
    }

    ShopRecord::empty(url)
}

/// One attempt: fetch, check the page shape, extract
async fn fetch_detail(fetcher: &dyn PageFetcher, url: &str) -> Result<ShopRecord, FetchError> {
    let body = fetcher.fetch(url).await?;

    check_page_shape(&body).map_err(|message| FetchError::Shape {
        url: url.to_string(),
        message,
    })?;

    Ok(extract_shop(&body, url))
}
