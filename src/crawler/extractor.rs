//! Detail-page field extraction
//!
//! Detail pages come in several template variants, so every field has an
//! ordered list of [`Rule`]s. Rules are tried in order and the first one that
//! yields non-empty text wins. A field no rule can fill gets [`NO_DATA`].

use crate::record::{ShopField, ShopRecord, NO_DATA};
use scraper::{ElementRef, Html, Selector};

/// How element text is turned into a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// All text, surrounding whitespace trimmed
    Trimmed,
    /// Every text node trimmed, empty ones dropped, the rest concatenated
    Stripped,
}

/// One independent strategy for locating a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Trimmed text of the first element matching a CSS selector
    Text(&'static str),

    /// Attribute of the first element matching a CSS selector
    Attr {
        selector: &'static str,
        attr: &'static str,
    },

    /// First heading whose text contains `label`, then the next value cell
    /// after it in document order
    Labeled {
        headings: &'static str,
        values: &'static str,
        label: &'static str,
        mode: TextMode,
    },
}

impl Rule {
    /// Applies the rule to a parsed document
    ///
    /// Returns None when the rule does not match or yields only whitespace.
    pub fn apply(&self, document: &Html) -> Option<String> {
        let value = match *self {
            Rule::Text(selector) => {
                let selector = Selector::parse(selector).ok()?;
                let element = document.select(&selector).next()?;
                element_text(element, TextMode::Trimmed)
            }
            Rule::Attr { selector, attr } => {
                let selector = Selector::parse(selector).ok()?;
                let element = document.select(&selector).next()?;
                element.value().attr(attr)?.trim().to_string()
            }
            Rule::Labeled {
                headings,
                values,
                label,
                mode,
            } => labeled_value(document, headings, values, label, mode)?,
        };

        Some(value).filter(|v| !v.is_empty())
    }
}

const NAME_RULES: &[Rule] = &[
    Rule::Text("h2.display-name"),
    Rule::Text("h2.rstdtl-header__rst-name"),
];

const GENRE_RULES: &[Rule] = &[Rule::Labeled {
    headings: "th",
    values: "td",
    label: "ジャンル",
    mode: TextMode::Stripped,
}];

const ADDRESS_RULES: &[Rule] = &[
    Rule::Text("p.rstinfo-table__address"),
    Rule::Text("p.rstinfo-table__address-text"),
];

const OPENED_DATE_RULES: &[Rule] = &[Rule::Text("p.rstinfo-opened-date")];

const PHONE_RULES: &[Rule] = &[
    Rule::Text("p.rstdtl-side-yoyaku__tel-number"),
    Rule::Text("strong.rstinfo-table__tel-num"),
];

const HOURS_RULES: &[Rule] = &[Rule::Labeled {
    headings: "th, dt",
    values: "td, dd",
    label: "営業時間",
    mode: TextMode::Trimmed,
}];

const SOCIAL_LINK_RULES: &[Rule] = &[Rule::Attr {
    selector: "a.rstinfo-sns-instagram",
    attr: "href",
}];

const SERVICE_RULES: &[Rule] = &[Rule::Labeled {
    headings: "th",
    values: "td",
    label: "サービス",
    mode: TextMode::Stripped,
}];

/// Extraction rules for a field, in priority order
///
/// The detail URL has no rules; it is always the URL the page came from.
pub fn rules_for(field: ShopField) -> &'static [Rule] {
    match field {
        ShopField::Name => NAME_RULES,
        ShopField::Genre => GENRE_RULES,
        ShopField::Address => ADDRESS_RULES,
        ShopField::OpenedDate => OPENED_DATE_RULES,
        ShopField::Phone => PHONE_RULES,
        ShopField::DetailUrl => &[],
        ShopField::Hours => HOURS_RULES,
        ShopField::SocialLink => SOCIAL_LINK_RULES,
        ShopField::Service => SERVICE_RULES,
    }
}

/// Returns the first non-empty value produced by `rules`
pub fn first_match(document: &Html, rules: &[Rule]) -> Option<String> {
    rules.iter().find_map(|rule| rule.apply(document))
}

/// Extracts a shop record from detail-page markup
///
/// Never fails: any input, including empty or malformed markup, produces a
/// record with every field filled, using [`NO_DATA`] where nothing matched.
///
/// # Arguments
///
/// * `markup` - The detail page HTML
/// * `source_url` - The URL the markup was fetched from
pub fn extract_shop(markup: &str, source_url: &str) -> ShopRecord {
    let document = Html::parse_document(markup);
    let field = |field: ShopField| {
        first_match(&document, rules_for(field)).unwrap_or_else(|| NO_DATA.to_string())
    };

    ShopRecord {
        name: field(ShopField::Name),
        genre: field(ShopField::Genre),
        address: field(ShopField::Address),
        opened_date: field(ShopField::OpenedDate),
        phone: field(ShopField::Phone),
        detail_url: source_url.to_string(),
        hours: field(ShopField::Hours),
        social_link: field(ShopField::SocialLink),
        service: field(ShopField::Service),
    }
}

/// Checks that fetched markup looks like a page at all
///
/// A body that parses to nothing but the implicit `html`/`head`/`body`
/// skeleton is a transient anomaly (truncated or placeholder response), not
/// a restaurant without data.
pub fn check_page_shape(markup: &str) -> Result<(), String> {
    let document = Html::parse_document(markup);
    let has_content = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .any(|element| !matches!(element.value().name(), "html" | "head" | "body"));

    if has_content {
        Ok(())
    } else {
        Err("document contains no elements".to_string())
    }
}

/// Finds the value cell that follows the first heading containing `label`
fn labeled_value(
    document: &Html,
    headings: &str,
    values: &str,
    label: &str,
    mode: TextMode,
) -> Option<String> {
    let heading_selector = Selector::parse(headings).ok()?;
    let value_selector = Selector::parse(values).ok()?;
    let combined = Selector::parse(&format!("{}, {}", headings, values)).ok()?;

    // Select yields elements in document order, so the value cell for a
    // heading is the next value-matching element after it.
    let mut cells = document.select(&combined);
    cells.find(|element| {
        heading_selector.matches(element) && element.text().collect::<String>().contains(label)
    })?;

    let value = cells.find(|element| value_selector.matches(element))?;
    Some(element_text(value, mode))
}

fn element_text(element: ElementRef<'_>, mode: TextMode) -> String {
    match mode {
        TextMode::Trimmed => element.text().collect::<String>().trim().to_string(),
        TextMode::Stripped => element
            .text()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect(),
    }
}
