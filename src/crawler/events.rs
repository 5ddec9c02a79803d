//! Crawl event callbacks
//!
//! A front end observes a crawl through four fire-and-forget callbacks. They
//! are invoked from the crawl task and must return quickly.

/// Receiver of crawl progress, status, log lines and completion
pub trait CrawlEvents: Send + Sync {
    /// Page-level progress: `current` of at most `total` pages
    fn on_progress(&self, _current: u32, _total: u32) {}

    /// Short, replaceable status line
    fn on_status(&self, _text: &str) {}

    /// Append-only log line
    fn on_log(&self, _text: &str) {}

    /// The crawl task is about to exit
    fn on_complete(&self) {}
}

/// Ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEvents;

impl CrawlEvents for NoopEvents {}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl CrawlEvents for TracingEvents {
    fn on_progress(&self, current: u32, total: u32) {
        tracing::debug!("Progress: page {}/{}", current, total);
    }

    fn on_status(&self, text: &str) {
        tracing::info!("{}", text);
    }

    fn on_log(&self, text: &str) {
        tracing::info!("{}", text);
    }

    fn on_complete(&self) {
        tracing::debug!("Crawl task finished");
    }
}
