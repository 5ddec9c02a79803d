//! Listing-page URL construction
//!
//! Listing URLs are built from the area hierarchy (area, middle, small) and a
//! page number:
//!
//! | Mode | Page | Suffix |
//! |------|------|--------|
//! | normal | 1 | `/` |
//! | normal | n > 1 | `/rstLst/{n}/` |
//! | new openings | 1 | `/rstLst/cond16-00-00/` |
//! | new openings | n > 1 | `/rstLst/cond16-00-00/{n}/` |
//!
//! The suffix is appended to the origin followed by whichever codes are
//! non-empty, joined by `/`.

/// Path segment that introduces a paginated listing
pub const LISTING_SEGMENT: &str = "rstLst";

/// Marker selecting recently opened restaurants
pub const NEW_OPENINGS_MARKER: &str = "rstLst/cond16-00-00";

/// Builds the canonical listing-page URL
///
/// # Arguments
///
/// * `origin` - Site origin, e.g. `https://tabelog.com` (a trailing slash is ignored)
/// * `area_code` - Prefecture code; empty for a nationwide listing
/// * `middle_code` - Optional middle-area code
/// * `small_code` - Optional small-area code
/// * `page` - 1-based page number
/// * `new_openings_only` - Restrict the listing to new openings
///
/// # Example
///
/// ```
/// use tabelog_harvest::url::build_listing_url;
///
/// let url = build_listing_url("https://tabelog.com", "tokyo", Some("A1301"), Some("A130101"), 2, false);
/// assert_eq!(url, "https://tabelog.com/tokyo/A1301/A130101/rstLst/2/");
/// ```
pub fn build_listing_url(
    origin: &str,
    area_code: &str,
    middle_code: Option<&str>,
    small_code: Option<&str>,
    page: u32,
    new_openings_only: bool,
) -> String {
    let segments: Vec<&str> = [Some(area_code), middle_code, small_code]
        .into_iter()
        .flatten()
        .filter(|code| !code.is_empty())
        .collect();

    let mut url = origin.trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.push_str(segment);
    }

    if new_openings_only {
        url.push('/');
        url.push_str(NEW_OPENINGS_MARKER);
        if page > 1 {
            url.push_str(&format!("/{}", page));
        }
    } else if page > 1 {
        url.push_str(&format!("/{}/{}", LISTING_SEGMENT, page));
    }

    url.push('/');
    url
}
