//! Mutable run state owned by the crawl loop

use crate::record::ShopRecord;
use crate::state::CrawlPhase;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// State of one crawl run
///
/// Only the crawl loop mutates this. The cancellation token is the one piece
/// that outside callers touch, and they only ever cancel it.
#[derive(Debug)]
pub struct CrawlState {
    /// Listing URL about to be fetched, None once pagination ends
    pub current_url: Option<String>,

    /// Page number of `current_url`
    pub current_page: u32,

    /// Listing pages fully processed so far
    pub pages_scraped: u32,

    /// Records kept so far, in listing order
    pub records: Vec<ShopRecord>,

    cancel: CancellationToken,
    phase: watch::Sender<CrawlPhase>,
}

impl CrawlState {
    /// Creates the state for a run starting at `start_url`
    pub fn new(
        start_url: String,
        start_page: u32,
        cancel: CancellationToken,
        phase: watch::Sender<CrawlPhase>,
    ) -> Self {
        Self {
            current_url: Some(start_url),
            current_page: start_page,
            pages_scraped: 0,
            records: Vec::new(),
            cancel,
            phase,
        }
    }

    /// True once a stop has been requested from outside
    pub fn stop_requested(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Current phase as seen by observers
    pub fn phase(&self) -> CrawlPhase {
        *self.phase.borrow()
    }

    /// Moves to `next`, ignoring illegal transitions
    ///
    /// Returns true if the phase changed.
    pub fn transition(&mut self, next: CrawlPhase) -> bool {
        let current = self.phase();
        if !current.can_transition_to(next) {
            tracing::warn!("Ignoring invalid crawl transition: {} -> {}", current, next);
            return false;
        }
        if current != next {
            // send_replace keeps the value even when nobody is subscribed
            self.phase.send_replace(next);
        }
        true
    }
}
