//! Listing page extraction.
//!
//! A listing page holds many abbreviated channel entries. Each entry has a
//! `div.tg-channel-link` block with the detail-page anchor, and its enclosing
//! `div` carries a `span.tg-user-count` label with the member count.

use scraper::{ElementRef, Html};
use tracing::debug;

use tgcatalog_shared::{CandidateLink, CatalogError, Result};

use crate::html::{parse_count, selector, text_of};

/// Extract the detail links on one listing page whose member count is
/// strictly greater than `minimum_members`.
///
/// Blocks without an anchor are skipped. A block whose count label is missing
/// or not a clean integer fails the whole page. Returned links are unique by
/// `href`, in page order.
pub fn extract_listing(
    doc: &Html,
    minimum_members: i64,
    page_url: &str,
) -> Result<Vec<CandidateLink>> {
    let block_sel = selector("div.tg-channel-link");
    let anchor_sel = selector("a");
    let count_sel = selector("span.tg-user-count");

    let blocks: Vec<ElementRef<'_>> = doc.select(&block_sel).collect();
    debug!(blocks = blocks.len(), url = page_url, "found channel link blocks");

    let mut links: Vec<CandidateLink> = Vec::new();

    for block in blocks {
        let Some(href) = block
            .select(&anchor_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            debug!(url = page_url, "channel block without a link, skipping");
            continue;
        };

        let container = block
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "div")
            .ok_or_else(|| CatalogError::missing("div enclosing div.tg-channel-link", page_url))?;

        let label = container
            .select(&count_sel)
            .next()
            .ok_or_else(|| CatalogError::missing("span.tg-user-count", page_url))?;

        let members = parse_count(&text_of(label), page_url)?;

        if members <= minimum_members {
            debug!(href, members, minimum_members, "below member threshold, skipping");
            continue;
        }

        if links.iter().any(|link| link.href == href) {
            continue;
        }

        debug!(href, members, "added channel link");
        links.push(CandidateLink {
            href: href.to_string(),
            members,
        });
    }

    debug!(links = links.len(), url = page_url, "links kept from page");
    Ok(links)
}
