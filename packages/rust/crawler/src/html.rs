//! Small helpers over `scraper` shared by the extractors.

use scraper::{ElementRef, Selector};

use tgcatalog_shared::{CatalogError, Result};

/// Compile a selector that is known to be valid at compile time.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

/// Collect and trim the text content of an element.
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Parse a member-count label. Any clean integer is accepted, including a
/// signed one; separators, decimals and suffixes are rejected.
pub(crate) fn parse_count(raw: &str, url: &str) -> Result<i64> {
    raw.trim().parse::<i64>().map_err(|e| {
        CatalogError::parse(format!("member count '{raw}' on {url} is not an integer: {e}"))
    })
}
