//! Crawl-loop tests against scripted fetchers

use crate::common::{
    detail_html, listing_html, timeout, FnFetcher, RecordingEvents, RecordingSleeper,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tabelog_harvest::area::{AreaCatalog, AreaSelection};
use tabelog_harvest::config::Config;
use tabelog_harvest::crawler::{
    spawn_crawl, CrawlParams, CrawlRequest, Crawler, NoopEvents, PageFetcher, RunOutcome,
};
use tabelog_harvest::output::CsvResultWriter;
use tabelog_harvest::state::CompletionReason;
use tabelog_harvest::{CrawlPhase, FetchError};
use tempfile::TempDir;
use tokio::sync::{watch, Notify};
use tokio_util::sync::CancellationToken;

const START: &str = "https://tabelog.com/tokyo/";

fn tokyo() -> CrawlRequest {
    CrawlRequest {
        area_code: "tokyo".to_string(),
        ..CrawlRequest::default()
    }
}

/// Page 1 lists shops 1-3 and links to page 2, which lists shops 4-5
fn two_pages(url: &str) -> Result<String, FetchError> {
    match url {
        "https://tabelog.com/tokyo/" => Ok(listing_html(
            &["/tokyo/1/", "/tokyo/2/", "/tokyo/3/"],
            Some("/tokyo/rstLst/2/"),
        )),
        "https://tabelog.com/tokyo/rstLst/2/" => {
            Ok(listing_html(&["/tokyo/4/", "/tokyo/5/"], None))
        }
        other => Ok(detail_html(&shop_name(other), "ラーメン", "2024年6月1日")),
    }
}

fn shop_name(url: &str) -> String {
    let id = url.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    format!("店舗{}", id)
}

fn names(records: &[tabelog_harvest::ShopRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

#[tokio::test]
async fn test_two_pages_in_listing_order() {
    let fetcher = Arc::new(FnFetcher::new(two_pages));
    let sleeper = Arc::new(RecordingSleeper::default());
    let crawler = Crawler::new(fetcher.clone(), sleeper.clone(), &Config::default());
    let events = RecordingEvents::default();
    let (tx, rx) = watch::channel(CrawlPhase::Idle);

    let outcome = crawler
        .run(&tokyo(), &events, CancellationToken::new(), tx)
        .await;

    assert_eq!(
        names(&outcome.records),
        vec!["店舗1", "店舗2", "店舗3", "店舗4", "店舗5"]
    );
    assert_eq!(outcome.records[0].genre, "ラーメン");
    assert_eq!(outcome.records[0].detail_url, "https://tabelog.com/tokyo/1/");
    assert_eq!(outcome.pages_scraped, 2);
    assert_eq!(
        outcome.phase,
        CrawlPhase::Completed(CompletionReason::NoMorePages)
    );
    assert_eq!(*rx.borrow(), outcome.phase);

    assert_eq!(
        fetcher.calls(),
        vec![
            "https://tabelog.com/tokyo/",
            "https://tabelog.com/tokyo/1/",
            "https://tabelog.com/tokyo/2/",
            "https://tabelog.com/tokyo/3/",
            "https://tabelog.com/tokyo/rstLst/2/",
            "https://tabelog.com/tokyo/4/",
            "https://tabelog.com/tokyo/5/",
        ]
    );

    let shop = Duration::from_millis(500);
    let page = Duration::from_millis(2000);
    assert_eq!(sleeper.waits(), vec![shop, shop, shop, page, shop, shop]);
    assert_eq!(*events.progress.lock().unwrap(), vec![(1, 50), (2, 50)]);
}

#[tokio::test]
async fn test_stop_after_first_entry_fetches_nothing_more() {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let fetcher = Arc::new(FnFetcher::new(move |url: &str| {
        if url == "https://tabelog.com/tokyo/1/" {
            trigger.cancel();
        }
        two_pages(url)
    }));
    let crawler = Crawler::new(
        fetcher.clone(),
        Arc::new(RecordingSleeper::default()),
        &Config::default(),
    );
    let (tx, rx) = watch::channel(CrawlPhase::Idle);

    let outcome = crawler.run(&tokyo(), &NoopEvents, cancel, tx).await;

    assert_eq!(outcome.phase, CrawlPhase::Stopped);
    assert_eq!(*rx.borrow(), CrawlPhase::Stopped);
    assert_eq!(names(&outcome.records), vec!["店舗1"]);
    assert_eq!(outcome.pages_scraped, 0);
    assert_eq!(
        fetcher.calls(),
        vec!["https://tabelog.com/tokyo/", "https://tabelog.com/tokyo/1/"]
    );
}

#[tokio::test]
async fn test_stopped_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let fetcher = Arc::new(FnFetcher::new(move |url: &str| {
        if url == "https://tabelog.com/tokyo/2/" {
            trigger.cancel();
        }
        two_pages(url)
    }));
    let crawler = Crawler::new(
        fetcher,
        Arc::new(RecordingSleeper::default()),
        &Config::default(),
    );
    let events = RecordingEvents::default();
    let params = CrawlParams {
        save_path: dir.path().to_path_buf(),
        ..CrawlParams::default()
    };
    let (tx, _rx) = watch::channel(CrawlPhase::Idle);

    let report = crawler
        .run_to_completion(&tokyo(), &params, &CsvResultWriter, &events, cancel, tx)
        .await;

    assert_eq!(report.outcome, RunOutcome::Stopped);
    assert_eq!(report.records_collected, 2);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert!(events
        .statuses
        .lock()
        .unwrap()
        .contains(&"Crawl stopped".to_string()));
    assert_eq!(*events.completions.lock().unwrap(), 1);
}

/// Every listing page has one shop and a next arrow
fn endless(url: &str) -> Result<String, FetchError> {
    if url.contains("/shop/") {
        Ok(detail_html(&shop_name(url), "居酒屋", "2020年1月"))
    } else {
        Ok(listing_html(&["/shop/1/"], Some("/tokyo/rstLst/next/")))
    }
}

#[tokio::test]
async fn test_cap_stops_after_exactly_fifty_listing_pages() {
    let fetcher = Arc::new(FnFetcher::new(endless));
    let crawler = Crawler::new(
        fetcher.clone(),
        Arc::new(RecordingSleeper::default()),
        &Config::default(),
    );
    let (tx, _rx) = watch::channel(CrawlPhase::Idle);

    let outcome = crawler
        .run(&tokyo(), &NoopEvents, CancellationToken::new(), tx)
        .await;

    let listing_fetches = fetcher
        .calls()
        .iter()
        .filter(|url| !url.contains("/shop/"))
        .count();
    assert_eq!(listing_fetches, 50);
    assert_eq!(outcome.pages_scraped, 50);
    assert_eq!(outcome.records.len(), 50);
    assert_eq!(
        outcome.phase,
        CrawlPhase::Completed(CompletionReason::CapReached)
    );
}

#[tokio::test]
async fn test_uncapped_mode_uses_configured_cap() {
    let mut config = Config::default();
    config.crawler.uncapped_pages = 7;
    let params = CrawlParams {
        area: AreaSelection::from_names(Some("東京都"), None, None).unwrap(),
        start_page: 4,
        page_cap_enabled: false,
        ..CrawlParams::default()
    };
    let request = CrawlRequest::resolve(&params, &AreaCatalog::builtin(), &config.crawler).unwrap();
    assert_eq!(request.end_page(), 10);

    let fetcher = Arc::new(FnFetcher::new(endless));
    let crawler = Crawler::new(
        fetcher.clone(),
        Arc::new(RecordingSleeper::default()),
        &config,
    );
    let (tx, _rx) = watch::channel(CrawlPhase::Idle);

    let outcome = crawler
        .run(&request, &NoopEvents, CancellationToken::new(), tx)
        .await;

    let calls = fetcher.calls();
    assert_eq!(calls[0], "https://tabelog.com/tokyo/rstLst/4/");
    assert_eq!(calls.iter().filter(|url| !url.contains("/shop/")).count(), 7);
    assert_eq!(outcome.pages_scraped, 7);
}

#[tokio::test]
async fn test_year_filter_keeps_matching_shops() {
    let fetcher = Arc::new(FnFetcher::new(|url: &str| match url {
        "https://tabelog.com/tokyo/" => Ok(listing_html(
            &["/tokyo/1/", "/tokyo/2/", "/tokyo/3/", "/tokyo/4/"],
            None,
        )),
        "https://tabelog.com/tokyo/1/" => Ok(detail_html("店舗1", "和食", "2024年3月1日")),
        "https://tabelog.com/tokyo/2/" => Ok(detail_html("店舗2", "和食", "2023年3月1日")),
        "https://tabelog.com/tokyo/3/" => Ok(detail_html("店舗3", "和食", "2024年11月")),
        _ => Ok(detail_html("店舗4", "和食", "")),
    }));
    let crawler = Crawler::new(
        fetcher,
        Arc::new(RecordingSleeper::default()),
        &Config::default(),
    );
    let events = RecordingEvents::default();
    let request = CrawlRequest {
        filter_year: 2024,
        ..tokyo()
    };
    let (tx, _rx) = watch::channel(CrawlPhase::Idle);

    let outcome = crawler
        .run(&request, &events, CancellationToken::new(), tx)
        .await;

    assert_eq!(names(&outcome.records), vec!["店舗1", "店舗3"]);
    let logs = events.logs.lock().unwrap();
    assert!(logs.contains(&"  店舗1 - added".to_string()));
    assert!(!logs.iter().any(|line| line.contains("店舗2")));
}

#[tokio::test]
async fn test_entry_without_link_is_skipped() {
    let fetcher = Arc::new(FnFetcher::new(|url: &str| match url {
        "https://tabelog.com/tokyo/" => Ok(format!(
            r#"<div class="list-rst"><span>広告</span></div>{}"#,
            listing_html(&["/tokyo/9/"], None)
        )),
        other => Ok(detail_html(&shop_name(other), "カフェ", "")),
    }));
    let sleeper = Arc::new(RecordingSleeper::default());
    let crawler = Crawler::new(fetcher.clone(), sleeper.clone(), &Config::default());
    let (tx, _rx) = watch::channel(CrawlPhase::Idle);

    let outcome = crawler
        .run(&tokyo(), &NoopEvents, CancellationToken::new(), tx)
        .await;

    assert_eq!(names(&outcome.records), vec!["店舗9"]);
    assert_eq!(
        fetcher.calls(),
        vec!["https://tabelog.com/tokyo/", "https://tabelog.com/tokyo/9/"]
    );
    // Only the fetched entry is followed by a shop delay
    assert_eq!(sleeper.waits(), vec![Duration::from_millis(500)]);
}

#[tokio::test]
async fn test_listing_failure_keeps_earlier_records() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(FnFetcher::new(|url: &str| {
        if url == "https://tabelog.com/tokyo/rstLst/2/" {
            Err(timeout(url))
        } else {
            two_pages(url)
        }
    }));
    let crawler = Crawler::new(
        fetcher,
        Arc::new(RecordingSleeper::default()),
        &Config::default(),
    );
    let events = RecordingEvents::default();
    let params = CrawlParams {
        save_path: dir.path().to_path_buf(),
        area: AreaSelection::from_names(Some("東京都"), None, None).unwrap(),
        ..CrawlParams::default()
    };
    let (tx, _rx) = watch::channel(CrawlPhase::Idle);

    let report = crawler
        .run_to_completion(
            &tokyo(),
            &params,
            &CsvResultWriter,
            &events,
            CancellationToken::new(),
            tx,
        )
        .await;

    assert_eq!(report.phase, CrawlPhase::Failed);
    assert_eq!(report.pages_scraped, 1);
    assert_eq!(report.records_collected, 3);
    assert!(report.error.unwrap().contains("rstLst/2/"));

    let RunOutcome::Saved(path) = report.outcome else {
        panic!("expected the partial results to be saved");
    };
    assert!(path.exists());
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("東京都_scraped_data_"));

    assert!(events
        .statuses
        .lock()
        .unwrap()
        .iter()
        .any(|status| status.starts_with("Error:")));
}

#[tokio::test]
async fn test_unreachable_details_produce_no_file() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(FnFetcher::new(|url: &str| {
        if url == START {
            Ok(listing_html(&["/tokyo/1/"], None))
        } else {
            Err(timeout(url))
        }
    }));
    let sleeper = Arc::new(RecordingSleeper::default());
    let crawler = Crawler::new(fetcher.clone(), sleeper.clone(), &Config::default());
    let params = CrawlParams {
        save_path: dir.path().to_path_buf(),
        ..CrawlParams::default()
    };
    let (tx, _rx) = watch::channel(CrawlPhase::Idle);

    let report = crawler
        .run_to_completion(
            &tokyo(),
            &params,
            &CsvResultWriter,
            &NoopEvents,
            CancellationToken::new(),
            tx,
        )
        .await;

    // The sentinel record is collected but has no name to write
    assert_eq!(report.records_collected, 1);
    assert_eq!(report.outcome, RunOutcome::NoData);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    assert_eq!(fetcher.calls().len(), 4);
    assert_eq!(
        sleeper.waits(),
        vec![
            Duration::from_secs(5),
            Duration::from_secs(10),
            Duration::from_millis(500)
        ]
    );
}

/// Serves a three-shop listing; each detail fetch waits for a release
struct GatedFetcher {
    started: Notify,
    release: Notify,
}

#[async_trait]
impl PageFetcher for GatedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if url == START {
            return Ok(listing_html(&["/tokyo/1/", "/tokyo/2/", "/tokyo/3/"], None));
        }
        self.started.notify_one();
        self.release.notified().await;
        Ok(detail_html(&shop_name(url), "和食", ""))
    }
}

#[tokio::test]
async fn test_handle_stop_lets_in_flight_fetch_finish() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(GatedFetcher {
        started: Notify::new(),
        release: Notify::new(),
    });
    let crawler = Arc::new(Crawler::new(
        fetcher.clone(),
        Arc::new(RecordingSleeper::default()),
        &Config::default(),
    ));
    let events = Arc::new(RecordingEvents::default());
    let params = CrawlParams {
        save_path: dir.path().to_path_buf(),
        ..CrawlParams::default()
    };

    let handle = spawn_crawl(
        crawler,
        tokyo(),
        params,
        Arc::new(CsvResultWriter),
        events.clone(),
    );

    fetcher.started.notified().await;
    assert_eq!(handle.phase(), CrawlPhase::Running);
    handle.stop();
    fetcher.release.notify_one();

    let report = handle.wait().await.unwrap();
    assert_eq!(report.phase, CrawlPhase::Stopped);
    assert_eq!(report.records_collected, 1);
    assert_eq!(report.outcome, RunOutcome::Stopped);
    assert_eq!(*events.completions.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_spawned_crawl_publishes_terminal_phase() {
    let dir = TempDir::new().unwrap();
    let crawler = Arc::new(Crawler::new(
        Arc::new(FnFetcher::new(two_pages)),
        Arc::new(RecordingSleeper::default()),
        &Config::default(),
    ));
    let params = CrawlParams {
        save_path: dir.path().to_path_buf(),
        ..CrawlParams::default()
    };

    let handle = spawn_crawl(
        crawler,
        tokyo(),
        params,
        Arc::new(CsvResultWriter),
        Arc::new(NoopEvents),
    );
    let phase = handle.subscribe();

    let report = handle.wait().await.unwrap();
    assert_eq!(
        *phase.borrow(),
        CrawlPhase::Completed(CompletionReason::NoMorePages)
    );
    assert_eq!(report.records_collected, 5);
    assert!(matches!(report.outcome, RunOutcome::Saved(ref path) if path.exists()));
}
