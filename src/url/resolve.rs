//! Resolution of links found in listing markup

use url::Url;

/// Resolves a pagination or detail `href` to an absolute URL
///
/// Absolute http(s) links are returned unchanged. Relative links are joined
/// onto the site origin. Returns None for empty hrefs, fragment-only links,
/// non-HTTP schemes, and anything that fails to parse.
///
/// # Arguments
///
/// * `href` - The raw attribute value
/// * `origin` - The site origin used as the base for relative links
pub fn resolve_href(href: &str, origin: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let resolved = match Url::parse(href) {
        Ok(absolute) => absolute,
        Err(::url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(origin).ok()?;
            base.join(href).ok()?
        }
        Err(_) => return None,
    };

    if resolved.scheme() == "http" || resolved.scheme() == "https" {
        Some(resolved.to_string())
    } else {
        None
    }
}
