//! Output filename generation

use crate::crawler::CrawlParams;
use chrono::NaiveDateTime;

/// Tag added when only new openings were crawled
pub const NEW_OPENINGS_TAG: &str = "ニューオープン";

/// Builds the output filename for a run
///
/// Pattern: `{areas}[_ニューオープン][_{Y}年{M}月 | _{Y}年]_scraped_data_{YYYYMMDD_HHMMSS}.csv`
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use tabelog_harvest::crawler::CrawlParams;
/// use tabelog_harvest::output::output_filename;
///
/// let at = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(9, 30, 0).unwrap();
/// assert_eq!(
///     output_filename(&CrawlParams::default(), at),
///     "全国_scraped_data_20240601_093000.csv"
/// );
/// ```
pub fn output_filename(params: &CrawlParams, timestamp: NaiveDateTime) -> String {
    let mut parts: Vec<String> = params
        .area
        .name_parts()
        .into_iter()
        .map(str::to_string)
        .collect();

    if params.new_openings_only {
        parts.push(NEW_OPENINGS_TAG.to_string());
    }

    match (params.filter_year, params.filter_month) {
        (Some(year), Some(month)) if year > 0 && month > 0 => {
            parts.push(format!("{}年{}月", year, month))
        }
        (Some(year), _) if year > 0 => parts.push(format!("{}年", year)),
        _ => {}
    }

    format!(
        "{}_scraped_data_{}.csv",
        parts.join("_"),
        timestamp.format("%Y%m%d_%H%M%S")
    )
}
