//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the listing-page loop and its finishing step:
//! - Walking listing pages from the start page up to the page cap
//! - Fetching every detail page through the retry wrapper
//! - Applying the opening-date filter
//! - Honouring the cooperative stop signal between fetches
//! - Handing the collected records to the result writer

use crate::area::AreaCatalog;
use crate::config::Config;
use crate::crawler::events::CrawlEvents;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::listing::parse_listing;
use crate::crawler::request::{CrawlParams, CrawlRequest};
use crate::crawler::retry::{fetch_shop_with_retry, RetryPolicy};
use crate::crawler::sleeper::{Sleeper, TokioSleeper};
use crate::filter::matches_opened_date;
use crate::output::{CsvResultWriter, OutputError, ResultWriter};
use crate::record::ShopRecord;
use crate::state::{CompletionReason, CrawlPhase, CrawlState};
use crate::HarvestError;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Result of the page loop, before anything is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Terminal phase the loop ended in
    pub phase: CrawlPhase,

    /// Records kept, in listing order
    pub records: Vec<ShopRecord>,

    /// Listing pages fully processed
    pub pages_scraped: u32,

    /// Listing fetch error that ended the run, if any
    pub error: Option<String>,
}

/// What happened to the collected records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Records were written to this file
    Saved(PathBuf),

    /// Nothing worth writing was collected
    NoData,

    /// The run was stopped; nothing was written
    Stopped,

    /// The writer failed
    SaveFailed(String),
}

/// Summary of a finished crawl task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub phase: CrawlPhase,
    pub pages_scraped: u32,
    pub records_collected: usize,
    pub error: Option<String>,
    pub outcome: RunOutcome,
}

/// Main crawler structure
pub struct Crawler {
    fetcher: Arc<dyn PageFetcher>,
    sleeper: Arc<dyn Sleeper>,
    origin: String,
    page_wait: Duration,
    shop_wait: Duration,
    retry: RetryPolicy,
}

impl Crawler {
    /// Creates a crawler with explicit fetcher and sleeper
    ///
    /// Timings, retry policy and origin come from `config`.
    pub fn new(fetcher: Arc<dyn PageFetcher>, sleeper: Arc<dyn Sleeper>, config: &Config) -> Self {
        Self {
            fetcher,
            sleeper,
            origin: config.site.origin.trim_end_matches('/').to_string(),
            page_wait: config.crawler.page_wait(),
            shop_wait: config.crawler.shop_wait(),
            retry: RetryPolicy::from_config(&config.crawler),
        }
    }

    /// Creates a crawler that talks to the real site
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Crawler with an HTTP fetcher and real sleeps
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let fetcher = HttpFetcher::from_config(config)?;
        Ok(Self::new(Arc::new(fetcher), Arc::new(TokioSleeper), config))
    }

    /// Runs the listing-page loop
    ///
    /// Publishes `Running` and then exactly one terminal phase on `phase`.
    /// Never fails: a listing fetch error ends the loop in `Failed` with the
    /// records collected so far.
    pub async fn run(
        &self,
        request: &CrawlRequest,
        events: &dyn CrawlEvents,
        cancel: CancellationToken,
        phase: watch::Sender<CrawlPhase>,
    ) -> CrawlOutcome {
        let end_page = request.end_page();
        let start_url = request.start_url(&self.origin);
        let mut state = CrawlState::new(start_url.clone(), request.start_page, cancel, phase);
        state.transition(CrawlPhase::Running);

        tracing::info!(
            "Starting crawl at {} (pages {}..={})",
            start_url,
            request.start_page,
            end_page
        );
        events.on_status(&format!("Starting crawl: {}", start_url));
        events.on_log(&format!("URL: {}", start_url));

        let mut error = None;

        let terminal = loop {
            if state.stop_requested() {
                break CrawlPhase::Stopped;
            }
            let Some(url) = state.current_url.clone() else {
                break CrawlPhase::Completed(CompletionReason::NoMorePages);
            };
            if state.current_page > end_page {
                break CrawlPhase::Completed(CompletionReason::CapReached);
            }

            events.on_status(&format!(
                "Scraping page {}/{}",
                state.current_page, end_page
            ));
            events.on_progress(state.pages_scraped + 1, request.page_cap);
            events.on_log(&format!("Scraping page {}: {}", state.current_page, url));

            // Listing pages are not retried
            let body = match self.fetcher.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::error!("Listing fetch failed for {}: {}", url, e);
                    events.on_log(&format!("Error fetching listing page: {}", e));
                    error = Some(e.to_string());
                    break CrawlPhase::Failed;
                }
            };

            let listing = parse_listing(&body, &self.origin);
            if listing.entries.is_empty() {
                events.on_log("No restaurants on this page");
                break CrawlPhase::Completed(CompletionReason::NoEntries);
            }
            events.on_log(&format!("Found {} restaurants on page", listing.entries.len()));

            for (index, entry) in listing.entries.iter().enumerate() {
                if state.stop_requested() {
                    break;
                }

                let Some(detail_url) = entry.detail_url.as_deref() else {
                    tracing::warn!(
                        "Entry {} on page {} has no detail link, skipping",
                        index + 1,
                        state.current_page
                    );
                    events.on_log(&format!("  Entry {} has no detail link, skipped", index + 1));
                    continue;
                };

                let record = fetch_shop_with_retry(
                    self.fetcher.as_ref(),
                    self.sleeper.as_ref(),
                    detail_url,
                    &self.retry,
                )
                .await;

                if !request.filter_active() {
                    tracing::debug!("Collected {} ({})", record.name, detail_url);
                    state.records.push(record);
                } else if matches_opened_date(
                    &record.opened_date,
                    request.filter_year,
                    request.filter_month,
                ) {
                    events.on_log(&format!("  {} - added", record.name));
                    state.records.push(record);
                } else {
                    tracing::debug!(
                        "Filtered out {} (opened: {})",
                        record.name,
                        record.opened_date
                    );
                }

                self.sleeper.sleep(self.shop_wait).await;
            }

            if state.stop_requested() {
                break CrawlPhase::Stopped;
            }

            state.pages_scraped += 1;
            if state.pages_scraped >= request.page_cap {
                events.on_log(&format!(
                    "Reached the maximum of {} pages",
                    request.page_cap
                ));
                break CrawlPhase::Completed(CompletionReason::CapReached);
            }

            match listing.next_url {
                Some(next) => {
                    state.current_url = Some(next);
                    self.sleeper.sleep(self.page_wait).await;
                    state.current_page += 1;
                }
                None => {
                    state.current_url = None;
                    events.on_log("No next page");
                    break CrawlPhase::Completed(CompletionReason::NoMorePages);
                }
            }
        };

        state.transition(terminal);
        tracing::info!(
            "Crawl ended ({}): {} pages, {} records",
            terminal,
            state.pages_scraped,
            state.records.len()
        );

        CrawlOutcome {
            phase: terminal,
            records: std::mem::take(&mut state.records),
            pages_scraped: state.pages_scraped,
            error,
        }
    }

    /// Runs the loop, then writes or discards the records
    ///
    /// `on_complete` fires exactly once, after everything else.
    pub async fn run_to_completion(
        &self,
        request: &CrawlRequest,
        params: &CrawlParams,
        writer: &dyn ResultWriter,
        events: &dyn CrawlEvents,
        cancel: CancellationToken,
        phase: watch::Sender<CrawlPhase>,
    ) -> CrawlReport {
        let outcome = self.run(request, events, cancel, phase).await;
        let result = finish(&outcome, params, writer, events);
        events.on_complete();

        CrawlReport {
            phase: outcome.phase,
            pages_scraped: outcome.pages_scraped,
            records_collected: outcome.records.len(),
            error: outcome.error,
            outcome: result,
        }
    }
}

/// Decides what to do with the records of a finished loop
fn finish(
    outcome: &CrawlOutcome,
    params: &CrawlParams,
    writer: &dyn ResultWriter,
    events: &dyn CrawlEvents,
) -> RunOutcome {
    if outcome.phase == CrawlPhase::Stopped {
        events.on_log("Crawl stopped");
        events.on_status("Crawl stopped");
        return RunOutcome::Stopped;
    }

    if let Some(error) = &outcome.error {
        events.on_status(&format!("Error: {}", error));
    }

    if outcome.records.is_empty() {
        events.on_status("No data collected");
        events.on_log("No data collected");
        return RunOutcome::NoData;
    }

    events.on_status("Saving results...");
    events.on_log(&format!("Saving {} records...", outcome.records.len()));

    match writer.write(&outcome.records, params) {
        Ok(path) => {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let directory = path
                .parent()
                .map(|dir| dir.display().to_string())
                .unwrap_or_default();
            events.on_status("Crawl finished");
            events.on_log(&format!(
                "Crawl finished\nFile: {}\nSaved to: {}",
                file_name, directory
            ));
            RunOutcome::Saved(path)
        }
        Err(OutputError::NothingToWrite) => {
            events.on_status("No data collected");
            events.on_log("No record had a shop name, nothing written");
            RunOutcome::NoData
        }
        Err(e) => {
            tracing::error!("Failed to save results: {}", e);
            events.on_status("Failed to save the file");
            events.on_log(&format!("Failed to save the file: {}", e));
            RunOutcome::SaveFailed(e.to_string())
        }
    }
}

/// Handle to a crawl running on its own task
pub struct CrawlHandle {
    cancel: CancellationToken,
    phase: watch::Receiver<CrawlPhase>,
    join: JoinHandle<CrawlReport>,
}

impl CrawlHandle {
    /// Requests a cooperative stop
    ///
    /// The in-flight fetch, if any, is allowed to finish.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Token that stops the crawl when cancelled
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Latest published phase
    pub fn phase(&self) -> CrawlPhase {
        *self.phase.borrow()
    }

    /// Receiver for phase changes
    pub fn subscribe(&self) -> watch::Receiver<CrawlPhase> {
        self.phase.clone()
    }

    /// Waits for the crawl task to exit
    pub async fn wait(self) -> Result<CrawlReport, HarvestError> {
        Ok(self.join.await?)
    }
}

/// Spawns a crawl on its own tokio task
pub fn spawn_crawl(
    crawler: Arc<Crawler>,
    request: CrawlRequest,
    params: CrawlParams,
    writer: Arc<dyn ResultWriter>,
    events: Arc<dyn CrawlEvents>,
) -> CrawlHandle {
    let cancel = CancellationToken::new();
    let (phase_tx, phase_rx) = watch::channel(CrawlPhase::Idle);

    let task_cancel = cancel.clone();
    let join = tokio::spawn(async move {
        crawler
            .run_to_completion(
                &request,
                &params,
                writer.as_ref(),
                events.as_ref(),
                task_cancel,
                phase_tx,
            )
            .await
    });

    CrawlHandle {
        cancel,
        phase: phase_rx,
        join,
    }
}

/// Resolves `params` and starts a crawl against the real site
///
/// This is the main entry point for the command line.
///
/// # Returns
///
/// * `Ok(CrawlHandle)` - The crawl is running
/// * `Err(HarvestError)` - The area could not be resolved or the client built
pub fn start_crawl(
    config: &Config,
    catalog: &AreaCatalog,
    params: CrawlParams,
    events: Arc<dyn CrawlEvents>,
) -> Result<CrawlHandle, HarvestError> {
    let request = CrawlRequest::resolve(&params, catalog, &config.crawler)?;
    let crawler = Crawler::from_config(config)?;

    Ok(spawn_crawl(
        Arc::new(crawler),
        request,
        params,
        Arc::new(CsvResultWriter),
        events,
    ))
}
