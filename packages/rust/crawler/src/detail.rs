//! Detail page extraction.

use scraper::Html;
use tracing::{info, warn};

use tgcatalog_shared::{CatalogError, DetailRecord, Result};

use crate::html::{parse_count, selector, text_of};

/// Deep-link scheme used by the "open in app" anchor.
pub const DEEP_LINK_PREFIX: &str = "tg://resolve?domain=";

/// Extract the channel record from a detail page.
///
/// Returns `Ok(None)` when the detail container or its app anchor is missing,
/// so the caller can skip the page. Once both are found, a missing header or
/// count label (or a malformed count) is an error.
pub fn extract_detail(doc: &Html, source_url: &str) -> Result<Option<DetailRecord>> {
    // Either class identifies the container; the first match in document order wins.
    let container_sel = selector("div.tg-channel-wrapper, div.is-detail");
    let anchor_sel = selector("a.app");
    let name_sel = selector("h1.tg-channel-header");
    let count_sel = selector("span.tg-user-count");

    let Some(container) = doc.select(&container_sel).next() else {
        warn!(url = source_url, "channel detail container not found");
        return Ok(None);
    };

    let Some(href) = container
        .select(&anchor_sel)
        .next()
        .and_then(|a| a.value().attr("href"))
    else {
        warn!(url = source_url, "channel app link not found inside detail container");
        return Ok(None);
    };

    let handle = canonical_handle(href);

    let name = container
        .select(&name_sel)
        .next()
        .map(text_of)
        .ok_or_else(|| CatalogError::missing("h1.tg-channel-header", source_url))?;

    let label = container
        .select(&count_sel)
        .next()
        .ok_or_else(|| CatalogError::missing("span.tg-user-count", source_url))?;
    let members = parse_count(&text_of(label), source_url)?;

    info!(%handle, "resolved channel handle");
    Ok(Some(DetailRecord {
        handle,
        name,
        members,
    }))
}

/// Rewrite a `tg://resolve?domain=<name>` deep link to `@<name>`.
///
/// Links without the deep-link prefix are returned unchanged.
pub fn canonical_handle(href: &str) -> String {
    match href.strip_prefix(DEEP_LINK_PREFIX) {
        Some(domain) => format!("@{domain}"),
        None => href.to_string(),
    }
}
