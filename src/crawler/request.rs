//! Crawl parameters and the resolved request the loop runs on

use crate::area::{AreaCatalog, AreaError, AreaSelection, ResolvedArea};
use crate::config::CrawlerConfig;
use crate::url::build_listing_url;
use std::path::PathBuf;

/// Parameters as collected from the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlParams {
    /// Directory the spreadsheet is written to
    pub save_path: PathBuf,

    /// Area to crawl, by display name
    pub area: AreaSelection,

    /// First listing page (1-based)
    pub start_page: u32,

    /// Stop after the capped page count instead of the uncapped one
    pub page_cap_enabled: bool,

    /// Crawl the new-openings listing instead of the regular one
    pub new_openings_only: bool,

    /// Keep only restaurants opened in this year
    pub filter_year: Option<u32>,

    /// Narrow the year filter to this month
    pub filter_month: Option<u32>,
}

impl Default for CrawlParams {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from("."),
            area: AreaSelection::Nationwide,
            start_page: 1,
            page_cap_enabled: true,
            new_openings_only: false,
            filter_year: None,
            filter_month: None,
        }
    }
}

/// Immutable description of one crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// Prefecture code, empty for nationwide
    pub area_code: String,
    pub middle_code: Option<String>,
    pub small_code: Option<String>,
    pub start_page: u32,

    /// Maximum number of listing pages to process
    pub page_cap: u32,
    pub new_openings_only: bool,

    /// 0 means no filter
    pub filter_year: u32,

    /// 0 means the whole year
    pub filter_month: u32,
}

impl Default for CrawlRequest {
    fn default() -> Self {
        Self {
            area_code: String::new(),
            middle_code: None,
            small_code: None,
            start_page: 1,
            page_cap: CrawlerConfig::default().capped_pages,
            new_openings_only: false,
            filter_year: 0,
            filter_month: 0,
        }
    }
}

impl CrawlRequest {
    /// Resolves user parameters against the area catalog and page caps
    pub fn resolve(
        params: &CrawlParams,
        catalog: &AreaCatalog,
        crawler: &CrawlerConfig,
    ) -> Result<Self, AreaError> {
        let ResolvedArea {
            area_code,
            middle_code,
            small_code,
        } = catalog.resolve(&params.area)?;

        Ok(Self {
            area_code,
            middle_code,
            small_code,
            start_page: params.start_page.max(1),
            page_cap: crawler.page_cap(params.page_cap_enabled),
            new_openings_only: params.new_openings_only,
            filter_year: params.filter_year.unwrap_or(0),
            filter_month: params.filter_month.unwrap_or(0),
        })
    }

    /// Last page number the loop may visit
    pub fn end_page(&self) -> u32 {
        self.start_page
            .saturating_add(self.page_cap)
            .saturating_sub(1)
    }

    /// True when records must pass the opening-date filter
    pub fn filter_active(&self) -> bool {
        self.filter_year > 0
    }

    /// Listing URL of the start page
    pub fn start_url(&self, origin: &str) -> String {
        build_listing_url(
            origin,
            &self.area_code,
            self.middle_code.as_deref(),
            self.small_code.as_deref(),
            self.start_page,
            self.new_openings_only,
        )
    }
}
