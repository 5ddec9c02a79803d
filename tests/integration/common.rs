//! Shared fixtures for the integration tests

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tabelog_harvest::crawler::{CrawlEvents, PageFetcher, Sleeper};
use tabelog_harvest::FetchError;

/// Answers every request with a closure and records the URLs asked for
pub struct FnFetcher<F> {
    respond: F,
    calls: Mutex<Vec<String>>,
}

impl<F> FnFetcher<F>
where
    F: Fn(&str) -> Result<String, FetchError> + Send + Sync,
{
    pub fn new(respond: F) -> Self {
        Self {
            respond,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl<F> PageFetcher for FnFetcher<F>
where
    F: Fn(&str) -> Result<String, FetchError> + Send + Sync,
{
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        (self.respond)(url)
    }
}

/// Records requested waits without sleeping
#[derive(Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

/// Collects every callback for later assertions
#[derive(Default)]
pub struct RecordingEvents {
    pub progress: Mutex<Vec<(u32, u32)>>,
    pub statuses: Mutex<Vec<String>>,
    pub logs: Mutex<Vec<String>>,
    pub completions: Mutex<u32>,
}

impl CrawlEvents for RecordingEvents {
    fn on_progress(&self, current: u32, total: u32) {
        self.progress.lock().unwrap().push((current, total));
    }

    fn on_status(&self, text: &str) {
        self.statuses.lock().unwrap().push(text.to_string());
    }

    fn on_log(&self, text: &str) {
        self.logs.lock().unwrap().push(text.to_string());
    }

    fn on_complete(&self) {
        *self.completions.lock().unwrap() += 1;
    }
}

/// Listing markup with one entry per link and an optional next arrow
pub fn listing_html(links: &[&str], next: Option<&str>) -> String {
    let mut html = String::from("<html><body>");
    for link in links {
        html.push_str(&format!(
            r#"<div class="list-rst"><h3><a class="list-rst__rst-name-target" href="{}">shop</a></h3></div>"#,
            link
        ));
    }
    if let Some(next) = next {
        html.push_str(&format!(
            r#"<div class="c-pagination"><a class="c-pagination__arrow c-pagination__arrow--next" href="{}">次の20件</a></div>"#,
            next
        ));
    }
    html.push_str("</body></html>");
    html
}

/// Detail markup with a name, genre and opening date
pub fn detail_html(name: &str, genre: &str, opened: &str) -> String {
    format!(
        r#"<html><body>
            <h2 class="display-name"><span>{}</span></h2>
            <table class="rstinfo-table">
              <tr><th>ジャンル</th><td><span>{}</span></td></tr>
            </table>
            <p class="rstinfo-opened-date">{}</p>
        </body></html>"#,
        name, genre, opened
    )
}

pub fn timeout(url: &str) -> FetchError {
    FetchError::Timeout {
        url: url.to_string(),
    }
}
