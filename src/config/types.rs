use crate::url::DEFAULT_ORIGIN;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Tabelog-Harvest
///
/// Every section is optional; missing sections fall back to the defaults the
/// site has been crawled with historically.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler timing and limit configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Attempts per detail page before giving up
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Initial backoff between detail attempts (seconds)
    #[serde(rename = "retry-wait-secs")]
    pub retry_wait_secs: u64,

    /// Delay between listing pages (milliseconds)
    #[serde(rename = "page-wait-ms")]
    pub page_wait_ms: u64,

    /// Delay after each detail fetch (milliseconds)
    #[serde(rename = "shop-wait-ms")]
    pub shop_wait_ms: u64,

    /// Page cap in capped mode
    #[serde(rename = "capped-pages")]
    pub capped_pages: u32,

    /// Page cap when capping is disabled
    #[serde(rename = "uncapped-pages")]
    pub uncapped_pages: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            max_retries: 3,
            retry_wait_secs: 5,
            page_wait_ms: 2000,
            shop_wait_ms: 500,
            capped_pages: 50,
            uncapped_pages: 999,
        }
    }
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_wait(&self) -> Duration {
        Duration::from_secs(self.retry_wait_secs)
    }

    pub fn page_wait(&self) -> Duration {
        Duration::from_millis(self.page_wait_ms)
    }

    pub fn shop_wait(&self) -> Duration {
        Duration::from_millis(self.shop_wait_ms)
    }

    /// Page cap for the given mode
    pub fn page_cap(&self, capped: bool) -> u32 {
        if capped {
            self.capped_pages
        } else {
            self.uncapped_pages
        }
    }
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin that listing paths and relative links are resolved against
    pub origin: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub name: String,

    /// Version of the crawler
    pub version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value as `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the spreadsheet is written to
    #[serde(rename = "save-path")]
    pub save_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save_path: ".".to_string(),
        }
    }
}
