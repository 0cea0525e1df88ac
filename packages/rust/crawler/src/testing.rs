//! In-memory test doubles and HTML builders.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use tgcatalog_shared::{CatalogError, Result};

use crate::fetch::PageFetcher;
use crate::progress::ProgressReporter;

/// Serves canned bodies keyed by absolute URL and records every request.
#[derive(Default)]
pub(crate) struct StaticFetcher {
    pages: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub(crate) fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| CatalogError::Network(format!("{url}: HTTP 404 Not Found")))
    }
}

/// Captures every observer callback for assertions.
#[derive(Default)]
pub(crate) struct RecordingProgress {
    /// `(page_num, new_links, total_links)` per listing page.
    pub(crate) listing: Mutex<Vec<(u32, usize, usize)>>,
    /// `(current, total)` per detail page.
    pub(crate) details: Mutex<Vec<(usize, usize)>>,
}

impl ProgressReporter for RecordingProgress {
    fn phase(&self, _name: &str) {}

    fn listing_page(&self, page_num: u32, new_links: usize, total_links: usize) {
        self.listing
            .lock()
            .unwrap()
            .push((page_num, new_links, total_links));
    }

    fn detail_visited(&self, _url: &str, current: usize, total: usize) {
        self.details.lock().unwrap().push((current, total));
    }
}

/// Build a listing page with one entry per `(href, members)` pair.
pub(crate) fn listing_html(entries: &[(&str, i64)]) -> String {
    let items: String = entries
        .iter()
        .map(|(href, members)| {
            format!(
                r#"<div class="tg-channel">
                    <div class="tg-channel-link"><a href="{href}">channel</a></div>
                    <span class="tg-user-count">{members}</span>
                </div>"#
            )
        })
        .collect();
    format!("<html><body><main>{items}</main></body></html>")
}

/// Build a detail page for a channel reachable at `tg://resolve?domain={domain}`.
pub(crate) fn detail_html(domain: &str, name: &str, members: i64) -> String {
    format!(
        r#"<html><body>
            <div class="tg-channel-wrapper is-detail">
                <a class="app" href="tg://resolve?domain={domain}">Open in Telegram</a>
                <h1 class="tg-channel-header"> {name} </h1>
                <span class="tg-user-count">{members}</span>
            </div>
        </body></html>"#
    )
}
