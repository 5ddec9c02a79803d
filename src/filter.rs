//! Opening-date filter
//!
//! Detail pages describe the opening date as free text, e.g.
//! `2024年6月12日オープン`. Only the year and month are used for filtering.
//! Full-width digits (`２０２４年６月`) are read the same as ASCII ones.

use crate::record::NO_DATA;
use regex::Regex;
use std::sync::LazyLock;

static OPENED_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9０-９]{4})年([0-9０-９]{1,2})月").expect("valid regex")
});

/// Extracts `(year, month)` from an opening-date text
///
/// Returns None for the sentinel, for empty text, and for text without a
/// `<year>年<month>月` pattern. Only the first match is used.
///
/// # Example
///
/// ```
/// use tabelog_harvest::filter::parse_opened_date;
///
/// assert_eq!(parse_opened_date("2024年6月オープン"), Some((2024, 6)));
/// assert_eq!(parse_opened_date("記載なし"), None);
/// ```
pub fn parse_opened_date(text: &str) -> Option<(u32, u32)> {
    if text.is_empty() || text == NO_DATA {
        return None;
    }

    let captures = OPENED_DATE_RE.captures(text)?;
    let year = parse_digits(captures.get(1)?.as_str())?;
    let month = parse_digits(captures.get(2)?.as_str())?;
    Some((year, month))
}

/// Parses a run of ASCII or full-width decimal digits
fn parse_digits(digits: &str) -> Option<u32> {
    digits.chars().try_fold(0u32, |acc, c| {
        let digit = match c {
            '0'..='9' => c as u32 - '0' as u32,
            '０'..='９' => c as u32 - '０' as u32,
            _ => return None,
        };
        acc.checked_mul(10)?.checked_add(digit)
    })
}

/// Tests an opening-date text against a year/month filter
///
/// A `filter_month` of 0 matches on the year alone. A `filter_year` of 0 means
/// "no filter" to the crawl loop, which does not call this function at all.
pub fn matches_opened_date(text: &str, filter_year: u32, filter_month: u32) -> bool {
    let Some((year, month)) = parse_opened_date(text) else {
        return false;
    };

    if filter_month == 0 {
        return year == filter_year;
    }

    year == filter_year && month == filter_month
}
