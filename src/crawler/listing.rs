//! Listing-page parsing
//!
//! A listing page holds one `div.list-rst` container per restaurant and a
//! pagination arrow pointing at the next page.

use crate::url::resolve_href;
use scraper::{ElementRef, Html, Selector};

const ENTRY_SELECTOR: &str = "div.list-rst";

/// Detail-link selectors, tried in order
const DETAIL_LINK_SELECTORS: [&str; 2] = ["a.list-rst__rst-name-target", "a.list-rst__title-target"];

const NEXT_LINK_SELECTOR: &str = "a.c-pagination__arrow.c-pagination__arrow--next";

/// One restaurant entry on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Absolute detail-page URL, None if the entry had no usable link
    pub detail_url: Option<String>,
}

/// Everything the crawl loop needs from one listing page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingPage {
    /// Entries in document order
    pub entries: Vec<ListingEntry>,

    /// Absolute URL of the next listing page
    pub next_url: Option<String>,
}

/// Parses listing markup
///
/// # Arguments
///
/// * `html` - The listing page HTML
/// * `origin` - Site origin used to absolutise relative links
///
/// # Example
///
/// ```
/// use tabelog_harvest::crawler::parse_listing;
///
/// let html = r#"<div class="list-rst"><a class="list-rst__rst-name-target" href="/tokyo/1/">A</a></div>"#;
/// let page = parse_listing(html, "https://tabelog.com");
/// assert_eq!(page.entries.len(), 1);
/// assert_eq!(page.entries[0].detail_url.as_deref(), Some("https://tabelog.com/tokyo/1/"));
/// assert!(page.next_url.is_none());
/// ```
pub fn parse_listing(html: &str, origin: &str) -> ListingPage {
    let document = Html::parse_document(html);

    let entries = match Selector::parse(ENTRY_SELECTOR) {
        Ok(selector) => document
            .select(&selector)
            .map(|entry| ListingEntry {
                detail_url: detail_url(entry, origin),
            })
            .collect(),
        Err(_) => Vec::new(),
    };

    ListingPage {
        entries,
        next_url: next_url(&document, origin),
    }
}

/// Extracts the detail link of one entry, trying each selector in turn
fn detail_url(entry: ElementRef<'_>, origin: &str) -> Option<String> {
    DETAIL_LINK_SELECTORS.iter().find_map(|selector| {
        let selector = Selector::parse(selector).ok()?;
        let href = entry.select(&selector).next()?.value().attr("href")?;
        resolve_href(href, origin)
    })
}

/// Extracts the pagination "next" arrow
fn next_url(document: &Html, origin: &str) -> Option<String> {
    let selector = Selector::parse(NEXT_LINK_SELECTOR).ok()?;
    let href = document.select(&selector).next()?.value().attr("href")?;
    resolve_href(href, origin)
}
